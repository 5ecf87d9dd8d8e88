use std::path::Path;

use image::{ImageFormat, Rgb};
use ndarray::Array3;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SpectraError};
use crate::frame::PlanarImage;

/// Load an image file as 8-bit RGB, values scaled to [0, 1].
///
/// Any input format the `image` crate reads is accepted; alpha is dropped
/// and grayscale is expanded to three channels.
pub fn load_rgb(path: &Path) -> Result<PlanarImage> {
    if !path.is_file() {
        return Err(SpectraError::FileNotFound(path.to_path_buf()));
    }
    let rgb = image::open(path)?.to_rgb8();
    let (w, h) = rgb.dimensions();
    if w == 0 || h == 0 {
        return Err(SpectraError::InvalidDimensions {
            width: w,
            height: h,
        });
    }

    let channels = COLOR_CHANNEL_COUNT as usize;
    let mut data = Array3::<f32>::zeros((channels, h as usize, w as usize));
    for (col, row, pixel) in rgb.enumerate_pixels() {
        for c in 0..channels {
            data[[c, row as usize, col as usize]] = pixel.0[c] as f32 / 255.0;
        }
    }
    Ok(PlanarImage::new(data))
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Save a three-channel image as 8-bit RGB PNG. Values are clamped and rounded.
pub fn save_rgb_png(image: &PlanarImage, path: &Path) -> Result<()> {
    if image.channels() != COLOR_CHANNEL_COUNT as usize {
        return Err(SpectraError::Config(format!(
            "expected {COLOR_CHANNEL_COUNT} channels, image has {}",
            image.channels()
        )));
    }
    let (h, w) = (image.height(), image.width());

    let mut img = image::RgbImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let r = to_byte(image.data[[0, row, col]]);
            let g = to_byte(image.data[[1, row, col]]);
            let b = to_byte(image.data[[2, row, col]]);
            img.put_pixel(col as u32, row as u32, Rgb([r, g, b]));
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
