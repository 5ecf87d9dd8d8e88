use tracing::debug;

use crate::error::{Result, SpectraError};
use crate::kernel::KernelSource;

use super::compiler;
use super::context::GpuContext;

/// A compiled compute pipeline bound to concrete buffers, ready to record.
///
/// Owns its pipeline and bind group; both are released on drop.
pub struct KernelApplication {
    label: String,
    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,
    grid: [u32; 3],
}

impl KernelApplication {
    /// Compile `source` and bind `buffers` to bindings `0..buffers.len()` of group 0.
    ///
    /// Errors wgpu raises while creating the module, pipeline or bind group
    /// are returned as [`SpectraError::Compile`] for this kernel.
    pub fn build(
        ctx: &GpuContext,
        source: &KernelSource,
        buffers: &[&wgpu::Buffer],
        grid: [u32; 3],
    ) -> Result<Self> {
        compiler::validate(source, compiler::capabilities(ctx.precision))?;

        let validation = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let internal = ctx.device.push_error_scope(wgpu::ErrorFilter::Internal);
        let created = Self::create(ctx, source, buffers);
        let internal = pollster::block_on(internal.pop());
        let validation = pollster::block_on(validation.pop());
        if let Some(e) = internal.or(validation) {
            return Err(SpectraError::Compile {
                label: source.label.clone(),
                diagnostic: e.to_string(),
            });
        }

        let (pipeline, bind_group) = created;
        debug!(kernel = %source.label, ?grid, bindings = buffers.len(), "Kernel built");
        Ok(Self {
            label: source.label.clone(),
            pipeline,
            bind_group,
            grid,
        })
    }

    fn create(
        ctx: &GpuContext,
        source: &KernelSource,
        buffers: &[&wgpu::Buffer],
    ) -> (wgpu::ComputePipeline, wgpu::BindGroup) {
        let module = compiler::create_module(ctx, source);
        let pipeline = ctx
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&source.label),
                layout: None,
                module: &module,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                cache: None,
            });

        let layout = pipeline.get_bind_group_layout(0);
        let entries: Vec<wgpu::BindGroupEntry> = buffers
            .iter()
            .enumerate()
            .map(|(binding, buffer)| wgpu::BindGroupEntry {
                binding: binding as u32,
                resource: buffer.as_entire_binding(),
            })
            .collect();
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&source.label),
            layout: &layout,
            entries: &entries,
        });
        (pipeline, bind_group)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn grid(&self) -> [u32; 3] {
        self.grid
    }

    pub(crate) fn encode(&self, pass: &mut wgpu::ComputePass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.dispatch_workgroups(self.grid[0], self.grid[1], self.grid[2]);
    }
}
