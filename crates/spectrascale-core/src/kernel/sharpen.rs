use num_traits::Float;

use crate::plan::ScalarType;

use super::writer::{vec2_of, Access, WgslWriter};
use super::KernelSpec;

/// Edge-adaptive sharpen of one pixel from its 3x3 neighbourhood.
///
/// `taps` are magnitudes already clamped to [0, 1], row-major:
///
/// ```text
/// 0 1 2
/// 3 4 5
/// 6 7 8
/// ```
///
/// This is the host mirror of the generated kernel and is what the CPU
/// reference uses.
pub fn sharpen_taps<T: Float>(taps: &[T; 9], coefficient: T, epsilon: T) -> T {
    let one = T::one();
    let two = one + one;
    let half = one / two;
    let four = two + two;

    let cross = [taps[1], taps[3], taps[4], taps[5], taps[7]];
    let corners = [taps[0], taps[2], taps[6], taps[8]];
    let cross_min = cross.iter().copied().fold(T::infinity(), T::min);
    let cross_max = cross.iter().copied().fold(T::neg_infinity(), T::max);
    let box_min = corners.iter().copied().fold(cross_min, T::min);
    let box_max = corners.iter().copied().fold(cross_max, T::max);

    let min_len = half * (cross_min + box_min);
    let max_len = half * (cross_max + box_max);
    let lo = min_len / (one - min_len).max(epsilon);
    let hi = (one - max_len) / max_len.max(epsilon);
    let amount = lo.min(hi).max(T::zero()).min(one);
    let weight = -coefficient * amount.sqrt();

    (taps[4] + weight * (taps[1] + taps[3] + taps[5] + taps[7])) / (one + four * weight)
}

pub(super) fn emit(spec: &KernelSpec, coefficient: f32, gain: f64) -> String {
    let compute = spec.precision.compute_scalar();
    let storage = spec.precision.storage_scalar();
    let scalar = storage.wgsl_name();
    let input = if spec.real_input {
        compute.wgsl_name().to_string()
    } else {
        vec2_of(compute)
    };
    let magnitude = if spec.real_input {
        "abs(v)"
    } else {
        "length(v)"
    };

    let mut w = WgslWriter::new();
    if storage == ScalarType::F16 {
        w.enable_f16();
    }
    w.comment("Edge-adaptive contrast sharpen over a clamped 3x3 neighbourhood.");
    w.const_u32("SIZE_X", spec.size[0]);
    w.const_u32("SIZE_Y", spec.size[1]);
    w.const_u32("IN_ROW", spec.input_stride[0]);
    w.const_u32("IN_PLANE", spec.input_stride[1]);
    w.const_u32("OUT_ROW", spec.output_stride[0]);
    w.const_u32("OUT_PLANE", spec.output_stride[1]);
    w.const_float("GAIN", storage, gain);
    w.const_float("SHARPNESS", storage, coefficient as f64);
    w.const_float("EPS", storage, storage.epsilon());
    w.const_float("ZERO", storage, 0.0);
    w.const_float("ONE", storage, 1.0);
    w.blank();

    w.storage(0, "src", Access::Read, &input);
    w.storage(1, "dst", Access::ReadWrite, scalar);
    w.blank();

    w.open(&format!("fn tap(x: u32, y: u32, z: u32) -> {scalar}"));
    w.line("let v = src[x + y * IN_ROW + z * IN_PLANE];");
    w.line(&format!(
        "return clamp({scalar}({magnitude}) * GAIN, ZERO, ONE);"
    ));
    w.close();
    w.blank();

    w.entry_point(spec.local_size, "@builtin(global_invocation_id) id: vec3<u32>");
    w.open("if (id.x >= SIZE_X || id.y >= SIZE_Y)");
    w.line("return;");
    w.close();
    w.lines(&[
        "let z = id.z;",
        "let xl = select(id.x, id.x - 1u, id.x > 0u);",
        "let xr = select(id.x, id.x + 1u, id.x + 1u < SIZE_X);",
        "let yu = select(id.y, id.y - 1u, id.y > 0u);",
        "let yd = select(id.y, id.y + 1u, id.y + 1u < SIZE_Y);",
        "",
        "let t0 = tap(xl, yu, z);",
        "let t1 = tap(id.x, yu, z);",
        "let t2 = tap(xr, yu, z);",
        "let t3 = tap(xl, id.y, z);",
        "let t4 = tap(id.x, id.y, z);",
        "let t5 = tap(xr, id.y, z);",
        "let t6 = tap(xl, yd, z);",
        "let t7 = tap(id.x, yd, z);",
        "let t8 = tap(xr, yd, z);",
        "",
        "let cross_min = min(min(min(t1, t3), min(t4, t5)), t7);",
        "let cross_max = max(max(max(t1, t3), max(t4, t5)), t7);",
        "let box_min = min(cross_min, min(min(t0, t2), min(t6, t8)));",
        "let box_max = max(cross_max, max(max(t0, t2), max(t6, t8)));",
        "let min_len = 0.5 * (cross_min + box_min);",
        "let max_len = 0.5 * (cross_max + box_max);",
        "let lo = min_len / max(ONE - min_len, EPS);",
        "let hi = (ONE - max_len) / max(max_len, EPS);",
        "let weight = -SHARPNESS * sqrt(clamp(min(lo, hi), ZERO, ONE));",
        "dst[id.x + id.y * OUT_ROW + z * OUT_PLANE] = (t4 + weight * (t1 + t3 + t5 + t7)) / (ONE + 4.0 * weight);",
    ]);
    w.close();

    w.finish()
}
