use std::f32::consts::TAU;
use std::path::Path;

use ndarray::Array3;

use spectrascale_core::frame::PlanarImage;
use spectrascale_core::gpu::WorkerContext;
use spectrascale_core::io::save_rgb_png;
use spectrascale_core::plan::{DeviceProfile, Precision, TransformMode, TransformPlan, UpscaleRequest};

/// Smooth diagonal ramp, one channel offset per plane, values in [0.1, 0.9].
pub fn gradient_image(channels: usize, height: usize, width: usize) -> PlanarImage {
    let data = Array3::from_shape_fn((channels, height, width), |(c, y, x)| {
        let t = (x + y) as f32 / (width + height).max(1) as f32;
        0.1 + 0.8 * ((t + 0.15 * c as f32) % 1.0)
    });
    PlanarImage::new(data)
}

/// `0.5 + 0.25 cos(2 pi (fx x / w + fy y / h))`, same in every channel.
pub fn cosine_image(channels: usize, height: usize, width: usize, fx: u32, fy: u32) -> PlanarImage {
    let data = Array3::from_shape_fn((channels, height, width), |(_, y, x)| {
        0.5 + 0.25 * cosine_phase(x as f32 / width as f32, y as f32 / height as f32, fx, fy).cos()
    });
    PlanarImage::new(data)
}

/// Phase of the cosine pattern at normalised coordinates.
pub fn cosine_phase(u: f32, v: f32, fx: u32, fy: u32) -> f32 {
    TAU * (fx as f32 * u + fy as f32 * v)
}

/// Write an RGB gradient PNG and return its dimensions.
pub fn write_gradient_png(path: &Path, height: usize, width: usize) -> (usize, usize) {
    let image = gradient_image(3, height, width);
    save_rgb_png(&image, path).unwrap();
    (width, height)
}

pub fn request(width: u32, height: u32, upscale: f32, precision: Precision, mode: TransformMode) -> UpscaleRequest {
    UpscaleRequest {
        width,
        height,
        channels: 3,
        precision,
        upscale,
        mode,
    }
}

/// Plan against the device-independent profile.
pub fn plan(width: u32, height: u32, upscale: f32, mode: TransformMode) -> TransformPlan {
    TransformPlan::new(
        &request(width, height, upscale, Precision::Single, mode),
        &DeviceProfile::generic(),
    )
    .unwrap()
}

/// Open a GPU worker, or `None` (with a note on stderr) when no adapter is
/// available, so GPU tests pass on headless CI.
pub fn try_gpu(precision: Precision) -> Option<WorkerContext> {
    match WorkerContext::new(0, precision) {
        Ok(worker) => Some(worker),
        Err(e) => {
            eprintln!("skipping GPU test: {e}");
            None
        }
    }
}
