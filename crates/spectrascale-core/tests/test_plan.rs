#[allow(dead_code)]
mod common;

use spectrascale_core::error::SpectraError;
use spectrascale_core::plan::{
    AxisWindow, DeviceProfile, Precision, TransformMode, TransformPlan, Vendor,
};

use common::{plan, request};

// ---------------------------------------------------------------------------
// Strides and sizes
// ---------------------------------------------------------------------------

#[test]
fn test_working_stride_is_upscaled_input() {
    for &(w, h, u) in &[(256, 256, 2.0), (300, 200, 1.5), (17, 9, 3.0), (64, 32, 1.0)] {
        let p = plan(w, h, u, TransformMode::Auto);
        assert_eq!(p.input_stride, [w, h]);
        assert_eq!(p.working_stride, [(w as f32 * u) as u32, (h as f32 * u) as u32]);
        assert_eq!(p.depth, 1);
        assert_eq!(p.channels, 3);
    }
}

#[test]
fn test_half_spectrum_widths() {
    let p = plan(255, 100, 2.0, TransformMode::Real);
    assert!(p.real_input);
    assert_eq!(p.input_spectrum_width(), 128);
    assert_eq!(p.spectrum_width(), 510 / 2 + 1);

    let p = plan(255, 100, 2.0, TransformMode::Complex);
    assert!(!p.real_input);
    assert_eq!(p.input_spectrum_width(), 255);
    assert_eq!(p.spectrum_width(), 510);
}

#[test]
fn test_buffer_sizes_real_single() {
    let p = plan(4, 4, 2.0, TransformMode::Real);
    let sizes = p.buffer_sizes();
    // 3 channels of 4x4 f32
    assert_eq!(sizes.input, 3 * 16 * 4);
    // 3 channels of 5x8 complex f32
    assert_eq!(sizes.working, 3 * 5 * 8 * 8);
    assert_eq!(sizes.scratch, sizes.working);
    // 3 channels of 8x8 f32
    assert_eq!(sizes.output, 3 * 64 * 4);
    assert!(sizes.output <= sizes.working);
    assert_eq!(sizes.device_total(), sizes.input + 2 * sizes.working);
}

#[test]
fn test_buffer_sizes_complex_double() {
    let r = request(6, 4, 2.0, Precision::Double, TransformMode::Complex);
    let p = TransformPlan::new(&r, &DeviceProfile::generic()).unwrap();
    let sizes = p.buffer_sizes();
    // (v, 0) pairs of f64
    assert_eq!(sizes.input, 3 * 24 * 2 * 8);
    assert_eq!(sizes.working, 3 * 12 * 8 * 16);
    assert_eq!(sizes.output, 3 * 96 * 8);
}

#[test]
fn test_buffer_sizes_half_storage() {
    let r = request(8, 8, 2.0, Precision::Half, TransformMode::Real);
    let p = TransformPlan::new(&r, &DeviceProfile::generic()).unwrap();
    let sizes = p.buffer_sizes();
    assert_eq!(p.complex_bytes, 8);
    assert_eq!(sizes.input, 3 * 64 * 2);
    assert_eq!(sizes.output, 3 * 256 * 2);
}

#[test]
fn test_gain_is_area_ratio() {
    assert_eq!(plan(10, 10, 2.0, TransformMode::Auto).gain(), 4.0);
    assert_eq!(plan(10, 10, 1.0, TransformMode::Auto).gain(), 1.0);
}

// ---------------------------------------------------------------------------
// Zero windows
// ---------------------------------------------------------------------------

#[test]
fn test_content_plus_zeros_is_extent() {
    for &(n, s) in &[(4, 8), (5, 10), (256, 512), (255, 510), (7, 7), (8, 8), (1, 3)] {
        for w in [AxisWindow::full(n, s), AxisWindow::half_spectrum(n, s)] {
            assert_eq!(w.content_count() + w.zero_count(), w.extent, "n={n} s={s}");
        }
    }
    let p = plan(30, 20, 1.5, TransformMode::Complex);
    let win = p.windows;
    assert_eq!(
        win.content_elements() + win.zero_elements(),
        win.total_elements()
    );
    assert_eq!(win.total_elements(), p.spectrum_plane());
}

#[test]
fn test_full_window_even_axis_drops_nyquist() {
    let w = AxisWindow::full(4, 8);
    assert_eq!((w.start, w.end, w.extent), (2, 7, 8));
    // Bins 0, 1 and 7 carry content.
    assert_eq!(w.content_count(), 3);
}

#[test]
fn test_full_window_odd_axis() {
    let w = AxisWindow::full(5, 10);
    assert_eq!((w.start, w.end), (3, 8));
    assert_eq!(w.content_count(), 5);
}

#[test]
fn test_half_spectrum_window() {
    let w = AxisWindow::half_spectrum(4, 8);
    assert_eq!((w.start, w.end, w.extent), (2, 5, 5));
    let w = AxisWindow::half_spectrum(5, 10);
    assert_eq!((w.start, w.end, w.extent), (3, 6, 6));
}

#[test]
fn test_unit_upscale_has_empty_windows() {
    for mode in [TransformMode::Real, TransformMode::Complex] {
        let p = plan(12, 7, 1.0, mode);
        assert!(p.windows.axes.iter().all(|a| a.is_empty()));
        assert_eq!(p.windows.zero_elements(), 0);
        assert!(p.shift.axes.iter().all(|a| a.is_identity()));
    }
}

#[test]
fn test_is_zero_matches_either_axis() {
    let p = plan(4, 4, 2.0, TransformMode::Complex);
    assert!(!p.windows.is_zero(0, 0));
    assert!(p.windows.is_zero(3, 0));
    assert!(p.windows.is_zero(0, 3));
    assert!(!p.windows.is_zero(7, 7));
}

// ---------------------------------------------------------------------------
// Mode selection
// ---------------------------------------------------------------------------

#[test]
fn test_auto_picks_real_when_row_fits() {
    // 16 KiB of workgroup memory holds 2048 complex f32 samples.
    assert!(plan(1024, 64, 2.0, TransformMode::Auto).real_input);
    assert!(!plan(2048, 64, 2.0, TransformMode::Auto).real_input);
}

#[test]
fn test_auto_with_double_halves_the_limit() {
    let r = request(1024, 64, 2.0, Precision::Double, TransformMode::Auto);
    let p = TransformPlan::new(&r, &DeviceProfile::generic()).unwrap();
    assert!(!p.real_input);
    let r = request(512, 64, 2.0, Precision::Double, TransformMode::Auto);
    let p = TransformPlan::new(&r, &DeviceProfile::generic()).unwrap();
    assert!(p.real_input);
}

#[test]
fn test_intel_scales_shared_memory_footprint() {
    let intel = DeviceProfile::generic().with_vendor(Vendor::Intel);
    let r = request(256, 64, 2.0, Precision::Single, TransformMode::Auto);
    assert!(TransformPlan::new(&r, &intel).unwrap().real_input);
    let r = request(300, 64, 2.0, Precision::Single, TransformMode::Auto);
    assert!(!TransformPlan::new(&r, &intel).unwrap().real_input);
    assert!(TransformPlan::new(&r, &DeviceProfile::generic()).unwrap().real_input);
}

#[test]
fn test_explicit_mode_overrides_auto() {
    assert!(plan(4096, 8, 2.0, TransformMode::Real).real_input);
    assert!(!plan(8, 8, 2.0, TransformMode::Complex).real_input);
}

#[test]
fn test_vendor_from_pci_id() {
    assert_eq!(Vendor::from_pci_id(0x10DE), Vendor::Nvidia);
    assert_eq!(Vendor::from_pci_id(0x8086), Vendor::Intel);
    assert_eq!(Vendor::from_pci_id(0x1002), Vendor::Amd);
    assert_eq!(Vendor::from_pci_id(0x1234), Vendor::Other(0x1234));
    assert_eq!(Vendor::Amd.warp_size(), 64);
    assert_eq!(Vendor::Nvidia.warp_size(), 32);
}

// ---------------------------------------------------------------------------
// Rejected requests
// ---------------------------------------------------------------------------

fn try_plan(w: u32, h: u32, u: f32) -> Result<TransformPlan, SpectraError> {
    TransformPlan::new(
        &request(w, h, u, Precision::Single, TransformMode::Auto),
        &DeviceProfile::generic(),
    )
}

#[test]
fn test_non_integer_upscale_rejected() {
    let err = try_plan(255, 100, 1.5).unwrap_err();
    assert!(matches!(err, SpectraError::InvalidUpscale { width: 255, .. }));
    assert!(err.to_string().contains("255x100"));
}

#[test]
fn test_upscale_below_one_rejected() {
    assert!(matches!(
        try_plan(100, 100, 0.5),
        Err(SpectraError::InvalidUpscale { .. })
    ));
    assert!(matches!(
        try_plan(100, 100, f32::NAN),
        Err(SpectraError::InvalidUpscale { .. })
    ));
}

#[test]
fn test_zero_dimensions_rejected() {
    assert!(matches!(
        try_plan(0, 10, 2.0),
        Err(SpectraError::InvalidDimensions { width: 0, height: 10 })
    ));
}

#[test]
fn test_transform_extent_limit() {
    let err = try_plan(40_000, 1, 2.0).unwrap_err();
    assert!(matches!(err, SpectraError::Config(_)));
}

#[test]
fn test_buffer_limit() {
    let r = request(4000, 4000, 2.0, Precision::Single, TransformMode::Complex);
    let err = TransformPlan::new(&r, &DeviceProfile::generic()).unwrap_err();
    assert!(matches!(err, SpectraError::Config(_)));
}

#[test]
fn test_precision_codes() {
    for p in Precision::ALL {
        assert_eq!(Precision::from_code(p.code()).unwrap(), p);
    }
    assert!(matches!(Precision::from_code(3), Err(SpectraError::Config(_))));
}
