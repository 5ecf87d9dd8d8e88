//! In-crate FFT engine: two line passes per 2-D transform, generated as WGSL.
//!
//! [`FftConfig`] describes the transform; [`FftApplication::configure`]
//! compiles both passes against concrete buffers and [`FftApplication::record`]
//! appends them to a command recorder with a barrier in between.

pub mod emit;
pub mod lines;

use tracing::debug;
use wgpu::util::DeviceExt;

use crate::error::Result;
use crate::plan::ScalarType;

use super::context::GpuContext;
use super::kernel_app::KernelApplication;
use super::recorder::{CommandRecorder, MemoryBarrier};

pub use emit::Strategy;
pub use lines::{FftConfig, LineKind, LinePass};

/// Buffers one transform touches. `temp` holds the result of the first pass.
#[derive(Clone, Copy)]
pub struct FftBuffers<'a> {
    pub input: &'a wgpu::Buffer,
    pub temp: &'a wgpu::Buffer,
    pub output: &'a wgpu::Buffer,
}

/// Twiddle table for an `n`-point transform, packed in `scalar`.
pub fn twiddle_bytes(n: u32, inverse: bool, scalar: ScalarType) -> Vec<u8> {
    let table = lines::twiddles(n, inverse);
    match scalar {
        ScalarType::F64 => bytemuck::cast_slice(&table).to_vec(),
        ScalarType::F32 => {
            let narrow: Vec<f32> = table.iter().map(|&v| v as f32).collect();
            bytemuck::cast_slice(&narrow).to_vec()
        }
        ScalarType::F16 => {
            let narrow: Vec<half::f16> = table.iter().map(|&v| half::f16::from_f64(v)).collect();
            bytemuck::cast_slice(&narrow).to_vec()
        }
    }
}

struct PassResources {
    kernel: KernelApplication,
    // Bound by `kernel`; kept alive for as long as the pipeline is.
    _twiddles: wgpu::Buffer,
}

/// A configured 2-D transform, ready to record.
pub struct FftApplication {
    passes: Vec<PassResources>,
}

impl FftApplication {
    pub fn configure(ctx: &GpuContext, config: &FftConfig, buffers: FftBuffers<'_>) -> Result<Self> {
        let [first, second] = config.passes();
        let mut passes = Vec::with_capacity(2);
        for (pass, src, dst) in [
            (first, buffers.input, buffers.temp),
            (second, buffers.temp, buffers.output),
        ] {
            let strategy = emit::strategy(&pass, &ctx.profile);
            let source = emit::emit(&pass, strategy);
            let twiddles = ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&source.label),
                    contents: &twiddle_bytes(pass.n, pass.inverse, pass.compute),
                    usage: wgpu::BufferUsages::STORAGE,
                });
            let grid = emit::grid(&pass, strategy);
            let kernel = KernelApplication::build(ctx, &source, &[src, dst, &twiddles], grid)?;
            debug!(pass = %pass.label, n = pass.n, lines = pass.lines, ?strategy, "FFT pass configured");
            passes.push(PassResources {
                kernel,
                _twiddles: twiddles,
            });
        }
        Ok(Self { passes })
    }

    /// Record both passes. The caller places the barrier after the second.
    pub fn record(&self, recorder: &mut CommandRecorder) {
        for (i, pass) in self.passes.iter().enumerate() {
            if i > 0 {
                recorder.barrier(MemoryBarrier::WRITE_TO_READ);
            }
            recorder.dispatch(&pass.kernel);
        }
    }
}
