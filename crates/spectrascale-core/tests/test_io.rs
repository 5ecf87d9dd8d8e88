#[allow(dead_code)]
mod common;

use std::path::{Path, PathBuf};

use ndarray::Array3;

use spectrascale_core::error::SpectraError;
use spectrascale_core::frame::PlanarImage;
use spectrascale_core::io::{batch_file, default_output, load_rgb, save_rgb_png};

use common::gradient_image;

#[test]
fn test_png_round_trip() {
    let image = gradient_image(3, 10, 14);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("gradient.png");

    save_rgb_png(&image, &path).unwrap();
    let loaded = load_rgb(&path).unwrap();

    assert_eq!(loaded.data.dim(), (3, 10, 14));
    // 8-bit quantisation
    assert!(loaded.max_abs_diff(&image) <= 0.5 / 255.0 + 1e-6);
}

#[test]
fn test_save_clamps_out_of_range_values() {
    let mut data = Array3::<f32>::zeros((3, 2, 2));
    data[[0, 0, 0]] = 1.7;
    data[[1, 0, 1]] = -0.4;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clamped.png");

    save_rgb_png(&PlanarImage::new(data), &path).unwrap();
    let loaded = load_rgb(&path).unwrap();
    assert_eq!(loaded.data[[0, 0, 0]], 1.0);
    assert_eq!(loaded.data[[1, 0, 1]], 0.0);
}

#[test]
fn test_grayscale_input_expands_to_rgb() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.png");
    image::GrayImage::from_fn(4, 3, |x, _| image::Luma([(x * 60) as u8]))
        .save(&path)
        .unwrap();

    let loaded = load_rgb(&path).unwrap();
    assert_eq!(loaded.data.dim(), (3, 3, 4));
    assert_eq!(loaded.data[[0, 1, 2]], loaded.data[[2, 1, 2]]);
    assert_eq!(loaded.data[[1, 0, 3]], 180.0 / 255.0);
}

#[test]
fn test_missing_file() {
    let err = load_rgb(Path::new("/nonexistent/000001.png")).unwrap_err();
    assert!(matches!(err, SpectraError::FileNotFound(_)));
}

#[test]
fn test_save_requires_three_channels() {
    let dir = tempfile::tempdir().unwrap();
    let err = save_rgb_png(&gradient_image(1, 4, 4), &dir.path().join("mono.png")).unwrap_err();
    assert!(matches!(err, SpectraError::Config(_)));
}

#[test]
fn test_naming() {
    assert_eq!(batch_file(Path::new("frames"), 1), PathBuf::from("frames/000001.png"));
    assert_eq!(batch_file(Path::new("frames"), 123456), PathBuf::from("frames/123456.png"));
    assert_eq!(default_output(256, 512), PathBuf::from("256_512_upscaled.png"));
}
