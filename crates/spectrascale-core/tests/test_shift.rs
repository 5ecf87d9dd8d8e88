#[allow(dead_code)]
mod common;

use std::collections::HashSet;

use spectrascale_core::plan::{AxisShift, TransformMode, TransformPlan};

use common::plan;

fn assert_bijection(p: &TransformPlan) {
    let [ex, ey] = p.shift.extent();
    assert_eq!(ex, p.spectrum_width());
    assert_eq!(ey, p.output_height());

    let mut seen = HashSet::new();
    for y in 0..ey {
        for x in 0..ex {
            let (dx, dy) = p.shift.map(x, y);
            assert!(dx < ex && dy < ey, "({x},{y}) -> ({dx},{dy}) out of range");
            assert!(seen.insert((dx, dy)), "({dx},{dy}) written twice");
        }
    }
    assert_eq!(seen.len() as u64, ex as u64 * ey as u64);
}

/// Everything the forward transform produced must land outside the zero
/// windows, and everything it did not produce must land inside them.
fn assert_content_lands_outside_windows(p: &TransformPlan) {
    let [ex, ey] = p.shift.extent();
    let produced_x = p.input_spectrum_width();
    let produced_y = p.height;
    for y in 0..ey {
        for x in 0..ex {
            let (dx, dy) = p.shift.map(x, y);
            let produced = x < produced_x && y < produced_y;
            let nyquist_x = !p.windows.axes[0].is_empty() && x == p.width / 2 && p.width % 2 == 0;
            let nyquist_y = !p.windows.axes[1].is_empty() && y == p.height / 2 && p.height % 2 == 0;
            if produced && !nyquist_x && !nyquist_y {
                assert!(!p.windows.is_zero(dx, dy), "content ({x},{y}) lands in window at ({dx},{dy})");
            } else if !produced {
                assert!(p.windows.is_zero(dx, dy), "stale ({x},{y}) lands at content ({dx},{dy})");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Bijection
// ---------------------------------------------------------------------------

#[test]
fn test_shift_is_bijection_real_domain() {
    for &(w, h, u) in &[(8, 8, 2.0), (255, 101, 2.0), (30, 20, 1.5), (7, 5, 3.0), (16, 16, 1.0)] {
        let p = plan(w, h, u, TransformMode::Real);
        assert_eq!(p.shift.extent(), [p.output_width() / 2 + 1, p.output_height()]);
        assert_bijection(&p);
    }
}

#[test]
fn test_shift_is_bijection_complex_domain() {
    for &(w, h, u) in &[(8, 8, 2.0), (255, 101, 2.0), (30, 20, 1.5), (7, 5, 3.0), (16, 16, 1.0)] {
        let p = plan(w, h, u, TransformMode::Complex);
        assert_eq!(p.shift.extent(), [p.output_width(), p.output_height()]);
        assert_bijection(&p);
    }
}

#[test]
fn test_real_mode_leaves_x_axis_alone() {
    let p = plan(64, 48, 2.0, TransformMode::Real);
    assert!(p.shift.axes[0].is_identity());
    for x in 0..p.spectrum_width() {
        assert_eq!(p.shift.map(x, 0).0, x);
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

#[test]
fn test_content_and_stale_tail_placement() {
    for mode in [TransformMode::Real, TransformMode::Complex] {
        for &(w, h, u) in &[(8, 8, 2.0), (9, 7, 2.0), (30, 20, 1.5), (5, 4, 3.0)] {
            assert_content_lands_outside_windows(&plan(w, h, u, mode));
        }
    }
}

#[test]
fn test_negative_frequencies_move_to_top() {
    let s = AxisShift::centered(5, 10);
    // Bins 0..3 stay, bins 3 and 4 (frequencies -2, -1) go to 8 and 9.
    assert_eq!(s.map(0), 0);
    assert_eq!(s.map(2), 2);
    assert_eq!(s.map(3), 8);
    assert_eq!(s.map(4), 9);
    // The stale tail fills the gap.
    let tail: HashSet<u32> = (5..10).map(|i| s.map(i)).collect();
    assert_eq!(tail, (3..8).collect());
}

#[test]
fn test_identity_shift() {
    let s = AxisShift::identity(12);
    assert!((0..12).all(|i| s.map(i) == i));
}
