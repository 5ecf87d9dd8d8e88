//! WGSL compilation: naga front end and validator, then a wgpu shader module.

use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::{Result, SpectraError};
use crate::kernel::KernelSource;
use crate::plan::Precision;

use super::context::GpuContext;

/// Shader capabilities needed by kernels of `precision`.
pub fn capabilities(precision: Precision) -> Capabilities {
    match precision {
        Precision::Single => Capabilities::empty(),
        Precision::Double => Capabilities::FLOAT64,
        Precision::Half => Capabilities::SHADER_FLOAT16,
    }
}

/// Parse and validate `source`, returning compiler diagnostics as a
/// [`SpectraError::Compile`].
pub fn validate(source: &KernelSource, capabilities: Capabilities) -> Result<naga::Module> {
    let module = naga::front::wgsl::parse_str(&source.text).map_err(|e| SpectraError::Compile {
        label: source.label.clone(),
        diagnostic: e.emit_to_string(&source.text),
    })?;
    Validator::new(ValidationFlags::all(), capabilities)
        .validate(&module)
        .map_err(|e| SpectraError::Compile {
            label: source.label.clone(),
            diagnostic: e.emit_to_string(&source.text),
        })?;
    Ok(module)
}

/// Hand an already validated `source` to the device.
///
/// Device-side failures surface through the caller's error scope.
pub(crate) fn create_module(ctx: &GpuContext, source: &KernelSource) -> wgpu::ShaderModule {
    ctx.device
        .create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&source.label),
            source: wgpu::ShaderSource::Wgsl(source.text.as_str().into()),
        })
}
