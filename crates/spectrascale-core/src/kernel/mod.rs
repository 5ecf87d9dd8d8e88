//! WGSL source generation for the shift and sharpen stages.

pub mod sharpen;
pub mod shift;
pub mod writer;

use crate::plan::{Precision, ShiftMap, TransformPlan};

/// Which kernel to emit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KernelOp {
    /// Relocate spectrum quadrants from the transform layout into the padded layout.
    Shift(ShiftMap),
    /// Edge-adaptive contrast sharpen of the inverse-transformed image.
    Sharpen { coefficient: f32, gain: f64 },
}

/// Complete description of a generated kernel. Source text is a pure
/// function of this value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelSpec {
    pub op: KernelOp,
    pub precision: Precision,
    pub real_input: bool,
    pub local_size: [u32; 3],
    /// Dispatch domain `[x, y]`; channels run along z.
    pub size: [u32; 2],
    /// `[row, plane]` strides of the input binding, in elements.
    pub input_stride: [u32; 2],
    /// `[row, plane]` strides of the output binding, in elements.
    pub output_stride: [u32; 2],
}

impl KernelSpec {
    /// Shift from the forward transform's layout into the padded layout.
    pub fn shift(plan: &TransformPlan) -> Self {
        let row = plan.spectrum_width();
        let plane = row * plan.working_stride[1];
        Self {
            op: KernelOp::Shift(plan.shift),
            precision: plan.precision,
            real_input: plan.real_input,
            local_size: plan.shift_local,
            size: [row, plan.working_stride[1]],
            input_stride: [row, plane],
            output_stride: [row, plane],
        }
    }

    /// Sharpen over the `SW x SH` image left by the inverse transform.
    pub fn sharpen(plan: &TransformPlan, coefficient: f32) -> Self {
        let [sw, sh] = plan.working_stride;
        Self {
            op: KernelOp::Sharpen {
                coefficient,
                gain: plan.gain(),
            },
            precision: plan.precision,
            real_input: plan.real_input,
            local_size: plan.sharpen_local,
            size: [sw, sh],
            input_stride: [sw, sw * sh],
            output_stride: [sw, sw * sh],
        }
    }

    pub fn label(&self) -> String {
        let op = match self.op {
            KernelOp::Shift(_) => "shift",
            KernelOp::Sharpen { .. } => "sharpen",
        };
        let layout = if self.real_input { "r2c" } else { "c2c" };
        format!("{op}_{layout}_{}", self.precision)
    }
}

/// Generated WGSL plus the label used for diagnostics and pipeline names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelSource {
    pub label: String,
    pub text: String,
}

/// Emit WGSL for `spec`.
pub fn generate(spec: &KernelSpec) -> KernelSource {
    let text = match spec.op {
        KernelOp::Shift(map) => shift::emit(spec, &map),
        KernelOp::Sharpen { coefficient, gain } => sharpen::emit(spec, coefficient, gain),
    };
    KernelSource {
        label: spec.label(),
        text,
    }
}
