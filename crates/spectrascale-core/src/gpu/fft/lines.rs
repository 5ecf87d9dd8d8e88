//! Decomposition of a 2-D transform into one line pass per axis.

use crate::plan::{Precision, ScalarType, TransformPlan, ZeroPadWindow};

/// What one line pass computes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Complex to complex.
    C2C,
    /// `n` reals to `n/2 + 1` complex bins.
    R2C,
    /// `n/2 + 1` Hermitian bins to `n` reals.
    C2R,
}

/// Where a pass reads or writes: element stride along the line, stride
/// between lines, stride between channel planes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineLayout {
    pub scalar: ScalarType,
    pub real: bool,
    pub element_stride: u32,
    pub line_stride: u32,
    pub plane_stride: u32,
}

impl LineLayout {
    fn rows(scalar: ScalarType, real: bool, stride: [u32; 2]) -> Self {
        Self {
            scalar,
            real,
            element_stride: 1,
            line_stride: stride[0],
            plane_stride: stride[1],
        }
    }

    fn columns(scalar: ScalarType, stride: [u32; 2]) -> Self {
        Self {
            scalar,
            real: false,
            element_stride: stride[0],
            line_stride: 1,
            plane_stride: stride[1],
        }
    }
}

/// Half-open index range `[start, end)`.
pub type Span = (u32, u32);

/// One dispatch of the FFT engine: a batch of 1-D transforms along one axis.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePass {
    pub label: String,
    pub kind: LineKind,
    pub n: u32,
    pub inverse: bool,
    pub scale: f64,
    /// Lines actually transformed, after removing `skip`.
    pub lines: u32,
    /// Line coordinates that are not transformed at all.
    pub skip: Option<Span>,
    /// Input indices along the line that read as zero.
    pub mask: Option<Span>,
    pub channels: u32,
    pub compute: ScalarType,
    pub src: LineLayout,
    pub dst: LineLayout,
}

impl LinePass {
    pub fn input_count(&self) -> u32 {
        match self.kind {
            LineKind::C2R => self.n / 2 + 1,
            _ => self.n,
        }
    }

    pub fn output_count(&self) -> u32 {
        match self.kind {
            LineKind::R2C => self.n / 2 + 1,
            _ => self.n,
        }
    }

    pub fn complex_bytes(&self) -> u64 {
        2 * self.compute.byte_width()
    }
}

/// The engine's configuration record.
#[derive(Clone, Debug, PartialEq)]
pub struct FftConfig {
    /// Transform length per axis.
    pub size: [u32; 2],
    pub channels: u32,
    pub precision: Precision,
    pub real_input: bool,
    pub inverse: bool,
    pub normalize: bool,
    /// `[row, plane]` strides of the input buffer in its own element type.
    pub input_stride: [u32; 2],
    /// `[row, plane]` strides of the complex intermediate layout.
    pub working_stride: [u32; 2],
    /// `[row, plane]` strides of the output buffer.
    pub output_stride: [u32; 2],
    pub zero_pad: Option<ZeroPadWindow>,
}

impl FftConfig {
    /// Unnormalised forward transform of the `W x H` input into the
    /// low corner of the working spectrum.
    pub fn forward(plan: &TransformPlan) -> Self {
        let [w, h] = plan.input_stride;
        let spectrum = [plan.spectrum_width(), plan.spectrum_width() * plan.working_stride[1]];
        Self {
            size: [w, h],
            channels: plan.channels,
            precision: plan.precision,
            real_input: plan.real_input,
            inverse: false,
            normalize: false,
            input_stride: [w, w * h],
            working_stride: spectrum,
            output_stride: spectrum,
            zero_pad: None,
        }
    }

    /// Normalised inverse transform of the padded spectrum into the
    /// `SW x SH` image (reals in real-input mode, complex otherwise).
    pub fn inverse(plan: &TransformPlan) -> Self {
        let [sw, sh] = plan.working_stride;
        let spectrum = [plan.spectrum_width(), plan.spectrum_width() * sh];
        Self {
            size: [sw, sh],
            channels: plan.channels,
            precision: plan.precision,
            real_input: plan.real_input,
            inverse: true,
            normalize: true,
            input_stride: spectrum,
            working_stride: spectrum,
            output_stride: [sw, sw * sh],
            zero_pad: Some(plan.windows),
        }
    }

    fn scale(&self, n: u32) -> f64 {
        if self.normalize {
            1.0 / n as f64
        } else {
            1.0
        }
    }

    fn half_width(&self) -> u32 {
        if self.real_input {
            self.size[0] / 2 + 1
        } else {
            self.size[0]
        }
    }

    /// Line passes in execution order. Pass 0 reads the input buffer and
    /// writes the temporary; pass 1 reads the temporary and writes the output.
    pub fn passes(&self) -> [LinePass; 2] {
        let compute = self.precision.compute_scalar();
        let direction = if self.inverse { "inverse" } else { "forward" };
        let span = |w: Option<ZeroPadWindow>, axis: usize| {
            w.map(|w| w.axes[axis])
                .filter(|a| !a.is_empty())
                .map(|a| (a.start, a.end))
        };

        if !self.inverse {
            let kind = if self.real_input {
                LineKind::R2C
            } else {
                LineKind::C2C
            };
            let rows = LinePass {
                label: format!("fft_{direction}_rows"),
                kind,
                n: self.size[0],
                inverse: false,
                scale: self.scale(self.size[0]),
                lines: self.size[1],
                skip: None,
                mask: None,
                channels: self.channels,
                compute,
                src: LineLayout::rows(
                    self.precision.storage_scalar(),
                    self.real_input,
                    self.input_stride,
                ),
                dst: LineLayout::rows(compute, false, self.working_stride),
            };
            let columns = LinePass {
                label: format!("fft_{direction}_columns"),
                kind: LineKind::C2C,
                n: self.size[1],
                inverse: false,
                scale: self.scale(self.size[1]),
                lines: self.half_width(),
                skip: None,
                mask: None,
                channels: self.channels,
                compute,
                src: LineLayout::columns(compute, self.working_stride),
                dst: LineLayout::columns(compute, self.output_stride),
            };
            return [rows, columns];
        }

        let skip = span(self.zero_pad, 0);
        let skipped = skip.map_or(0, |(s, e)| e - s);
        let columns = LinePass {
            label: format!("fft_{direction}_columns"),
            kind: LineKind::C2C,
            n: self.size[1],
            inverse: true,
            scale: self.scale(self.size[1]),
            lines: self.half_width() - skipped,
            skip,
            mask: span(self.zero_pad, 1),
            channels: self.channels,
            compute,
            src: LineLayout::columns(compute, self.input_stride),
            dst: LineLayout::columns(compute, self.working_stride),
        };
        let kind = if self.real_input {
            LineKind::C2R
        } else {
            LineKind::C2C
        };
        let rows = LinePass {
            label: format!("fft_{direction}_rows"),
            kind,
            n: self.size[0],
            inverse: true,
            scale: self.scale(self.size[0]),
            lines: self.size[1],
            skip: None,
            mask: span(self.zero_pad, 0),
            channels: self.channels,
            compute,
            src: LineLayout::rows(compute, false, self.working_stride),
            dst: LineLayout::rows(compute, self.real_input, self.output_stride),
        };
        [columns, rows]
    }
}

/// `e^{-2 pi i t / n}` (forward) or `e^{+2 pi i t / n}` (inverse) for `t in 0..n`,
/// interleaved re/im in f64.
pub fn twiddles(n: u32, inverse: bool) -> Vec<f64> {
    let sign = if inverse { 1.0 } else { -1.0 };
    (0..n)
        .flat_map(|t| {
            let angle = std::f64::consts::TAU * t as f64 / n as f64;
            [angle.cos(), sign * angle.sin()]
        })
        .collect()
}
