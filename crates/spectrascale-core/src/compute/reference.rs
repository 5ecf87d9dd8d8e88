//! Host implementation of the spectral upscale, stage for stage.
//!
//! Uses the same plan as the device path: the same half or full spectrum
//! layout, the same shift map, the same zero windows and the same sharpen
//! formula. Everything runs in f64.

use ndarray::{Array2, ArrayView2, Axis};
use num_complex::Complex;
use rayon::prelude::*;
use rustfft::FftPlanner;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::frame::PlanarImage;
use crate::kernel::sharpen::sharpen_taps;
use crate::plan::{ShiftMap, TransformPlan};

type Spectrum = Array2<Complex<f64>>;

/// Unnormalised forward transform of one `H x W` plane, placed in the low
/// corner of an `SH x spectrum_width` array. The rest is zero.
pub fn forward_spectrum(plane: ArrayView2<'_, f32>, plan: &TransformPlan) -> Spectrum {
    let (h, w) = (plan.height as usize, plan.width as usize);
    let kept = plan.input_spectrum_width() as usize;
    let mut planner = FftPlanner::<f64>::new();
    let row_fft = planner.plan_fft_forward(w);
    let col_fft = planner.plan_fft_forward(h);

    let mut rows = Array2::<Complex<f64>>::zeros((h, kept));
    let mut line = vec![Complex::new(0.0, 0.0); w];
    for (y, mut out) in rows.axis_iter_mut(Axis(0)).enumerate() {
        for (x, v) in line.iter_mut().enumerate() {
            *v = Complex::new(plane[[y, x]] as f64, 0.0);
        }
        row_fft.process(&mut line);
        for (x, o) in out.iter_mut().enumerate() {
            *o = line[x];
        }
    }

    let mut spectrum = Spectrum::zeros((plan.output_height() as usize, plan.spectrum_width() as usize));
    let mut column = vec![Complex::new(0.0, 0.0); h];
    for x in 0..kept {
        for (y, v) in column.iter_mut().enumerate() {
            *v = rows[[y, x]];
        }
        col_fft.process(&mut column);
        for (y, v) in column.iter().enumerate() {
            spectrum[[y, x]] = *v;
        }
    }
    spectrum
}

/// Out-of-place relocation of every element through `map`.
pub fn shift_spectrum(spectrum: &Spectrum, map: &ShiftMap) -> Spectrum {
    let mut out = Spectrum::zeros(spectrum.dim());
    for ((y, x), v) in spectrum.indexed_iter() {
        let (dx, dy) = map.map(x as u32, y as u32);
        out[[dy as usize, dx as usize]] = *v;
    }
    out
}

/// Normalised inverse of the padded spectrum. Elements inside a zero window
/// are ignored. Returns the per-pixel magnitude the sharpen stage reads.
pub fn inverse_magnitude(spectrum: &Spectrum, plan: &TransformPlan) -> Array2<f64> {
    let (sh, sw) = (plan.output_height() as usize, plan.output_width() as usize);
    let width = plan.spectrum_width() as usize;
    let windows = plan.windows;
    let mut planner = FftPlanner::<f64>::new();
    let col_fft = planner.plan_fft_inverse(sh);
    let row_fft = planner.plan_fft_inverse(sw);

    let mut columns = Spectrum::zeros((sh, width));
    let mut column = vec![Complex::new(0.0, 0.0); sh];
    for x in 0..width {
        if windows.axes[0].contains(x as u32) {
            continue;
        }
        for (y, v) in column.iter_mut().enumerate() {
            *v = if windows.axes[1].contains(y as u32) {
                Complex::new(0.0, 0.0)
            } else {
                spectrum[[y, x]]
            };
        }
        col_fft.process(&mut column);
        for (y, v) in column.iter().enumerate() {
            columns[[y, x]] = *v;
        }
    }

    let scale = 1.0 / (sw as f64 * sh as f64);
    let mut out = Array2::<f64>::zeros((sh, sw));
    let mut line = vec![Complex::new(0.0, 0.0); sw];
    let masked = |x: usize| windows.axes[0].contains(x as u32);
    for (y, mut dst) in out.axis_iter_mut(Axis(0)).enumerate() {
        for (x, v) in line.iter_mut().enumerate() {
            *v = if plan.real_input {
                // Rebuild the full row from the half spectrum.
                let (src, conj) = if x < width { (x, false) } else { (sw - x, true) };
                let value = if masked(src) {
                    Complex::new(0.0, 0.0)
                } else {
                    columns[[y, src]]
                };
                if conj {
                    value.conj()
                } else {
                    value
                }
            } else if masked(x) {
                Complex::new(0.0, 0.0)
            } else {
                columns[[y, x]]
            };
        }
        row_fft.process(&mut line);
        for (x, d) in dst.iter_mut().enumerate() {
            let v = line[x] * scale;
            *d = if plan.real_input { v.re.abs() } else { v.norm() };
        }
    }
    out
}

/// Edge-adaptive sharpen with clamped borders. `magnitude` is scaled by
/// `gain` and clamped to [0, 1] before the filter sees it.
pub fn sharpen(magnitude: &Array2<f64>, gain: f64, coefficient: f64, epsilon: f64) -> Array2<f64> {
    let (h, w) = magnitude.dim();
    let taps_at = |y: usize, x: usize| -> [f64; 9] {
        let ys = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let xs = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
        let mut taps = [0.0; 9];
        for (i, &yy) in ys.iter().enumerate() {
            for (j, &xx) in xs.iter().enumerate() {
                taps[i * 3 + j] = (magnitude[[yy, xx]] * gain).clamp(0.0, 1.0);
            }
        }
        taps
    };

    let mut out = Array2::<f64>::zeros((h, w));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(y, mut row)| {
                for (x, v) in row.iter_mut().enumerate() {
                    *v = sharpen_taps(&taps_at(y, x), coefficient, epsilon);
                }
            });
    } else {
        for ((y, x), v) in out.indexed_iter_mut() {
            *v = sharpen_taps(&taps_at(y, x), coefficient, epsilon);
        }
    }
    out
}

/// Run every stage on one plane.
pub fn upscale_plane(plane: ArrayView2<'_, f32>, plan: &TransformPlan, coefficient: f32) -> Array2<f64> {
    let spectrum = forward_spectrum(plane, plan);
    let shifted = shift_spectrum(&spectrum, &plan.shift);
    let magnitude = inverse_magnitude(&shifted, plan);
    sharpen(
        &magnitude,
        plan.gain(),
        coefficient as f64,
        plan.precision.storage_scalar().epsilon(),
    )
}

/// Run every stage on every channel, channels in parallel.
pub fn upscale_image(image: &PlanarImage, plan: &TransformPlan, coefficient: f32) -> PlanarImage {
    let planes: Vec<Array2<f64>> = (0..image.channels())
        .into_par_iter()
        .map(|c| upscale_plane(image.plane(c), plan, coefficient))
        .collect();

    let mut out = PlanarImage::zeros(
        image.channels(),
        plan.output_height() as usize,
        plan.output_width() as usize,
    );
    for (c, plane) in planes.iter().enumerate() {
        out.plane_mut(c)
            .zip_mut_with(plane, |o, &v| *o = v as f32);
    }
    out
}
