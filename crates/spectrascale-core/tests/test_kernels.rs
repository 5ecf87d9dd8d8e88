#[allow(dead_code)]
mod common;

use approx::assert_abs_diff_eq;

use spectrascale_core::error::SpectraError;
use spectrascale_core::gpu::compiler::{capabilities, validate};
use spectrascale_core::gpu::fft::emit::{emit, grid, strategy};
use spectrascale_core::gpu::fft::lines::twiddles;
use spectrascale_core::gpu::fft::{FftConfig, LineKind, Strategy};
use spectrascale_core::kernel::{generate, KernelSource, KernelSpec};
use spectrascale_core::plan::{DeviceProfile, Precision, TransformMode, TransformPlan};

use common::request;

const MODES: [TransformMode; 2] = [TransformMode::Real, TransformMode::Complex];

fn plan_for(w: u32, h: u32, u: f32, precision: Precision, mode: TransformMode) -> TransformPlan {
    TransformPlan::new(&request(w, h, u, precision, mode), &DeviceProfile::generic()).unwrap()
}

fn assert_valid(source: &KernelSource, precision: Precision) {
    if let Err(e) = validate(source, capabilities(precision)) {
        panic!("{e}\n--- source ---\n{}", source.text);
    }
}

// ---------------------------------------------------------------------------
// Shift and sharpen kernels
// ---------------------------------------------------------------------------

#[test]
fn test_generation_is_deterministic() {
    let p = plan_for(30, 20, 2.0, Precision::Single, TransformMode::Real);
    let spec = KernelSpec::sharpen(&p, 0.2);
    assert_eq!(generate(&spec), generate(&spec));
    let spec = KernelSpec::shift(&p);
    assert_eq!(generate(&spec), generate(&spec));
}

#[test]
fn test_kernel_labels() {
    let p = plan_for(30, 20, 2.0, Precision::Half, TransformMode::Complex);
    assert_eq!(generate(&KernelSpec::shift(&p)).label, "shift_c2c_half");
    let p = plan_for(30, 20, 2.0, Precision::Single, TransformMode::Real);
    assert_eq!(generate(&KernelSpec::sharpen(&p, 0.1)).label, "sharpen_r2c_single");
}

#[test]
fn test_shift_kernels_validate() {
    for precision in Precision::ALL {
        for mode in MODES {
            for &(w, h, u) in &[(16, 16, 2.0), (15, 9, 2.0), (12, 8, 1.0)] {
                let p = plan_for(w, h, u, precision, mode);
                assert_valid(&generate(&KernelSpec::shift(&p)), precision);
            }
        }
    }
}

#[test]
fn test_sharpen_kernels_validate() {
    for precision in Precision::ALL {
        for mode in MODES {
            let p = plan_for(15, 9, 2.0, precision, mode);
            assert_valid(&generate(&KernelSpec::sharpen(&p, 0.2)), precision);
        }
    }
}

#[test]
fn test_half_kernels_enable_f16() {
    let p = plan_for(16, 16, 2.0, Precision::Half, TransformMode::Real);
    let sharpen = generate(&KernelSpec::sharpen(&p, 0.2));
    assert!(sharpen.text.starts_with("enable f16;"));
    // The shift moves compute-precision samples only.
    let shift = generate(&KernelSpec::shift(&p));
    assert!(!shift.text.contains("f16"));
}

#[test]
fn test_shift_kernel_embeds_rotation() {
    let p = plan_for(8, 8, 2.0, Precision::Single, TransformMode::Complex);
    let text = generate(&KernelSpec::shift(&p)).text;
    assert!(text.contains("const SPLIT_X: u32 = 4u;"));
    assert!(text.contains("const OFFSET_Y: u32 = 8u;"));

    let p = plan_for(8, 8, 2.0, Precision::Single, TransformMode::Real);
    let text = generate(&KernelSpec::shift(&p)).text;
    assert!(!text.contains("SPLIT_X"));
    assert!(text.contains("let x = id.x;"));
}

#[test]
fn test_invalid_source_reports_label() {
    let source = KernelSource {
        label: "broken".into(),
        text: "fn main() { let x: u32 = 1.5; }".into(),
    };
    match validate(&source, capabilities(Precision::Single)) {
        Err(SpectraError::Compile { label, diagnostic }) => {
            assert_eq!(label, "broken");
            assert!(!diagnostic.is_empty());
        }
        other => panic!("expected compile error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// FFT line passes
// ---------------------------------------------------------------------------

#[test]
fn test_fft_kernels_validate_both_strategies() {
    let profile = DeviceProfile::generic();
    for precision in Precision::ALL {
        for mode in MODES {
            for &(w, h) in &[(16u32, 16u32), (15, 9)] {
                let p = plan_for(w, h, 2.0, precision, mode);
                for config in [FftConfig::forward(&p), FftConfig::inverse(&p)] {
                    for pass in config.passes() {
                        let chosen = strategy(&pass, &profile);
                        assert_valid(&emit(&pass, chosen), precision);
                        if chosen != Strategy::Direct {
                            assert_valid(&emit(&pass, Strategy::Direct), precision);
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_strategy_selection() {
    let profile = DeviceProfile::generic();
    let p = plan_for(16, 16, 2.0, Precision::Single, TransformMode::Complex);
    let [rows, _] = FftConfig::forward(&p).passes();
    assert_eq!(strategy(&rows, &profile), Strategy::Workgroup { threads: 8 });
    assert_eq!(grid(&rows, Strategy::Workgroup { threads: 8 }), [16, 3, 1]);

    let p = plan_for(15, 9, 2.0, Precision::Single, TransformMode::Complex);
    let [rows, _] = FftConfig::forward(&p).passes();
    assert_eq!(strategy(&rows, &profile), Strategy::Direct);
    assert_eq!(grid(&rows, Strategy::Direct), [1, 9, 3]);

    // 1024 threads requested, capped by the device.
    let p = plan_for(2048, 4, 1.0, Precision::Single, TransformMode::Complex);
    let [rows, _] = FftConfig::forward(&p).passes();
    assert_eq!(strategy(&rows, &profile), Strategy::Workgroup { threads: 256 });

    // Too big for workgroup memory.
    let p = plan_for(4096, 4, 1.0, Precision::Single, TransformMode::Complex);
    let [rows, _] = FftConfig::forward(&p).passes();
    assert_eq!(strategy(&rows, &profile), Strategy::Direct);
}

#[test]
fn test_forward_passes_real_layout() {
    let p = plan_for(8, 6, 2.0, Precision::Single, TransformMode::Real);
    let [rows, columns] = FftConfig::forward(&p).passes();
    assert_eq!(rows.kind, LineKind::R2C);
    assert_eq!((rows.n, rows.lines), (8, 6));
    assert_eq!(rows.output_count(), 5);
    assert!(rows.src.real);
    assert_eq!(rows.dst.line_stride, p.spectrum_width());

    assert_eq!(columns.kind, LineKind::C2C);
    assert_eq!((columns.n, columns.lines), (6, 5));
    assert_eq!(columns.scale, 1.0);
}

#[test]
fn test_inverse_passes_skip_and_mask_zero_windows() {
    let p = plan_for(8, 8, 2.0, Precision::Single, TransformMode::Real);
    let [columns, rows] = FftConfig::inverse(&p).passes();
    assert_eq!(columns.skip, Some((4, 9)));
    assert_eq!(columns.lines, 4);
    assert_eq!(columns.mask, Some((4, 13)));
    assert_abs_diff_eq!(columns.scale, 1.0 / 16.0);

    assert_eq!(rows.kind, LineKind::C2R);
    assert_eq!((rows.n, rows.lines), (16, 16));
    assert_eq!(rows.input_count(), 9);
    assert_eq!(rows.mask, Some((4, 9)));
    assert!(rows.dst.real);

    let p = plan_for(8, 8, 2.0, Precision::Single, TransformMode::Complex);
    let [columns, rows] = FftConfig::inverse(&p).passes();
    assert_eq!(columns.skip, Some((4, 13)));
    assert_eq!(columns.lines, 7);
    assert_eq!(rows.kind, LineKind::C2C);
    assert!(!rows.dst.real);
}

#[test]
fn test_unit_upscale_inverse_has_no_windows() {
    let p = plan_for(8, 8, 1.0, Precision::Single, TransformMode::Complex);
    let [columns, rows] = FftConfig::inverse(&p).passes();
    assert_eq!(columns.skip, None);
    assert_eq!(columns.mask, None);
    assert_eq!(columns.lines, 8);
    assert_eq!(rows.mask, None);
}

#[test]
fn test_twiddles_are_roots_of_unity() {
    let t = twiddles(4, false);
    let expected = [1.0, 0.0, 0.0, -1.0, -1.0, 0.0, 0.0, 1.0];
    for (a, b) in t.iter().zip(expected) {
        assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
    }
    let inv = twiddles(4, true);
    assert_abs_diff_eq!(inv[3], 1.0, epsilon = 1e-12);
}
