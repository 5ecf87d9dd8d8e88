//! WGSL for one line pass.
//!
//! Power-of-two lines that fit in workgroup memory run an in-place radix-2
//! transform with one workgroup per line. Everything else runs a direct DFT
//! with one invocation per output bin.

use crate::consts::FFT_WORKGROUP_SIZE;
use crate::kernel::writer::{vec2_of, Access, WgslWriter};
use crate::kernel::KernelSource;
use crate::plan::{DeviceProfile, ScalarType};

use super::lines::{LineKind, LineLayout, LinePass};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Workgroup { threads: u32 },
    Direct,
}

pub fn strategy(pass: &LinePass, profile: &DeviceProfile) -> Strategy {
    let n = pass.n;
    let fits = n as u64 * pass.complex_bytes() <= profile.shared_memory_bytes as u64;
    if n >= 2 && n.is_power_of_two() && fits {
        let threads = (n / 2)
            .min(profile.max_invocations)
            .min(profile.max_workgroup_size[0])
            .max(1);
        Strategy::Workgroup { threads }
    } else {
        Strategy::Direct
    }
}

/// Workgroup counts for `pass` under `strategy`.
pub fn grid(pass: &LinePass, strategy: Strategy) -> [u32; 3] {
    match strategy {
        Strategy::Workgroup { .. } => [pass.lines, pass.channels, 1],
        Strategy::Direct => [
            pass.output_count().div_ceil(FFT_WORKGROUP_SIZE),
            pass.lines,
            pass.channels,
        ],
    }
}

fn element_type(layout: &LineLayout) -> String {
    if layout.real {
        layout.scalar.wgsl_name().to_string()
    } else {
        vec2_of(layout.scalar)
    }
}

fn declare_common(w: &mut WgslWriter, pass: &LinePass) {
    let needs_f16 = [pass.src.scalar, pass.dst.scalar, pass.compute].contains(&ScalarType::F16);
    if needs_f16 {
        w.enable_f16();
    }
    w.comment(&format!(
        "{} {:?} line transform, n = {}",
        if pass.inverse { "Inverse" } else { "Forward" },
        pass.kind,
        pass.n
    ));
    let (skip_start, skip_len) = pass.skip.map_or((pass.lines, 0), |(s, e)| (s, e - s));
    let (mask_start, mask_end) = pass
        .mask
        .unwrap_or((pass.input_count(), pass.input_count()));
    w.const_u32("N", pass.n);
    w.const_u32("IN_COUNT", pass.input_count());
    w.const_u32("OUT_COUNT", pass.output_count());
    w.const_u32("LINES", pass.lines);
    w.const_u32("SKIP_START", skip_start);
    w.const_u32("SKIP_LEN", skip_len);
    w.const_u32("MASK_START", mask_start);
    w.const_u32("MASK_END", mask_end);
    w.const_u32("SRC_ELEM", pass.src.element_stride);
    w.const_u32("SRC_LINE", pass.src.line_stride);
    w.const_u32("SRC_PLANE", pass.src.plane_stride);
    w.const_u32("DST_ELEM", pass.dst.element_stride);
    w.const_u32("DST_LINE", pass.dst.line_stride);
    w.const_u32("DST_PLANE", pass.dst.plane_stride);
    w.const_float("SCALE", pass.compute, pass.scale);
    w.blank();

    let c = pass.compute.wgsl_name();
    let cvec = vec2_of(pass.compute);
    w.storage(0, "src", Access::Read, &element_type(&pass.src));
    w.storage(1, "dst", Access::ReadWrite, &element_type(&pass.dst));
    w.storage(2, "twiddles", Access::Read, &cvec);
    w.blank();

    w.open("fn line_coord(l: u32) -> u32");
    w.open("if (l < SKIP_START)");
    w.line("return l;");
    w.close();
    w.line("return l + SKIP_LEN;");
    w.close();
    w.blank();

    w.open(&format!("fn cmul(a: {cvec}, b: {cvec}) -> {cvec}"));
    w.line(&format!(
        "return {cvec}(a.x * b.x - a.y * b.y, a.x * b.y + a.y * b.x);"
    ));
    w.close();
    w.blank();

    w.open(&format!("fn load(base: u32, j: u32) -> {cvec}"));
    w.line("let v = src[base + j * SRC_ELEM];");
    if pass.src.real {
        w.line(&format!("return {cvec}({c}(v), {c}(0));"));
    } else {
        w.line(&format!("return {cvec}({c}(v.x), {c}(v.y));"));
    }
    w.close();
    w.blank();

    w.open(&format!("fn masked(base: u32, j: u32) -> {cvec}"));
    w.open("if (j >= MASK_START && j < MASK_END)");
    w.line(&format!("return {cvec}();"));
    w.close();
    w.line("return load(base, j);");
    w.close();
    w.blank();

    w.open(&format!("fn store(base: u32, k: u32, v: {cvec})"));
    let d = pass.dst.scalar.wgsl_name();
    if pass.dst.real {
        w.line(&format!("dst[base + k * DST_ELEM] = {d}(v.x * SCALE);"));
    } else {
        w.line(&format!(
            "dst[base + k * DST_ELEM] = {}(v * SCALE);",
            vec2_of(pass.dst.scalar)
        ));
    }
    w.close();
    w.blank();
}

fn emit_direct(w: &mut WgslWriter, pass: &LinePass) {
    let c = pass.compute.wgsl_name();
    let cvec = vec2_of(pass.compute);

    w.entry_point(
        [FFT_WORKGROUP_SIZE, 1, 1],
        "@builtin(global_invocation_id) id: vec3<u32>",
    );
    w.lines(&[
        "let k = id.x;",
        "if (k >= OUT_COUNT || id.y >= LINES) {",
        "    return;",
        "}",
        "let coord = line_coord(id.y);",
        "let src_base = coord * SRC_LINE + id.z * SRC_PLANE;",
        "let dst_base = coord * DST_LINE + id.z * DST_PLANE;",
    ]);
    w.line(&format!("var acc = {cvec}();"));

    let term = match pass.kind {
        LineKind::C2C | LineKind::R2C => {
            "acc += cmul(load(src_base, j), twiddles[(j * k) % N]);".to_string()
        }
        // Hermitian reconstruction: interior bins count twice, DC and Nyquist once.
        LineKind::C2R => format!(
            "let weight = select({c}(2), {c}(1), j == 0u || 2u * j == N);\n\
             let v = cmul(load(src_base, j), twiddles[(j * k) % N]);\n\
             acc.x += weight * v.x;"
        ),
    };
    for range in ["var j = 0u; j < MASK_START; j++", "var j = MASK_END; j < IN_COUNT; j++"] {
        w.open(&format!("for ({range})"));
        for line in term.lines() {
            w.line(line.trim());
        }
        w.close();
    }
    w.line("store(dst_base, k, acc);");
    w.close();
}

fn emit_workgroup(w: &mut WgslWriter, pass: &LinePass, threads: u32) {
    let cvec = vec2_of(pass.compute);
    let log2n = pass.n.trailing_zeros();

    w.const_u32("THREADS", threads);
    w.const_u32("REVERSE_SHIFT", 32 - log2n);
    w.workgroup_array("samples", &cvec, pass.n);
    w.blank();

    w.open(&format!("fn fetch(base: u32, i: u32) -> {cvec}"));
    if pass.kind == LineKind::C2R {
        w.open("if (i <= N / 2u)");
        w.line("return masked(base, i);");
        w.close();
        w.line("let v = masked(base, N - i);");
        w.line(&format!("return {cvec}(v.x, -v.y);"));
    } else {
        w.line("return masked(base, i);");
    }
    w.close();
    w.blank();

    w.open("fn butterflies(tid: u32, half: u32)");
    w.lines(&[
        "let stride = N / (2u * half);",
        "for (var b = tid; b < N / 2u; b += THREADS) {",
        "    let pos = b % half;",
        "    let i0 = (b / half) * 2u * half + pos;",
        "    let i1 = i0 + half;",
        "    let t = cmul(samples[i1], twiddles[pos * stride]);",
        "    let u = samples[i0];",
        "    samples[i0] = u + t;",
        "    samples[i1] = u - t;",
        "}",
    ]);
    w.close();
    w.blank();

    w.entry_point(
        [threads, 1, 1],
        "@builtin(workgroup_id) group: vec3<u32>, @builtin(local_invocation_index) tid: u32",
    );
    w.lines(&[
        "let coord = line_coord(group.x);",
        "let src_base = coord * SRC_LINE + group.y * SRC_PLANE;",
        "let dst_base = coord * DST_LINE + group.y * DST_PLANE;",
        "for (var i = tid; i < N; i += THREADS) {",
        "    samples[reverseBits(i) >> REVERSE_SHIFT] = fetch(src_base, i);",
        "}",
        "workgroupBarrier();",
    ]);
    // Stages are unrolled so every barrier sits in uniform control flow.
    let mut half = 1u32;
    while half < pass.n {
        w.line(&format!("butterflies(tid, {half}u);"));
        w.line("workgroupBarrier();");
        half *= 2;
    }
    w.lines(&[
        "for (var k = tid; k < OUT_COUNT; k += THREADS) {",
        "    store(dst_base, k, samples[k]);",
        "}",
    ]);
    w.close();
}

/// Generate the kernel for `pass` under `strategy`.
pub fn emit(pass: &LinePass, strategy: Strategy) -> KernelSource {
    let mut w = WgslWriter::new();
    declare_common(&mut w, pass);
    match strategy {
        Strategy::Workgroup { threads } => emit_workgroup(&mut w, pass, threads),
        Strategy::Direct => emit_direct(&mut w, pass),
    }
    let suffix = match strategy {
        Strategy::Workgroup { .. } => "wg",
        Strategy::Direct => "dft",
    };
    KernelSource {
        label: format!("{}_{}_{}", pass.label, pass.n, suffix),
        text: w.finish(),
    }
}
