//! Command recording with explicit barrier bookkeeping.
//!
//! wgpu tracks hazards between compute passes itself, so a barrier here
//! means "end the current pass": the next dispatch starts a new pass and
//! sees every write made before it. The op log records what was emitted so
//! ordering can be checked without reading driver state.

use super::kernel_app::KernelApplication;

/// Memory access class on either side of a barrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessScope {
    ShaderWrite,
    ShaderRead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryBarrier {
    pub src: AccessScope,
    pub dst: AccessScope,
}

impl MemoryBarrier {
    pub const WRITE_TO_READ: Self = Self {
        src: AccessScope::ShaderWrite,
        dst: AccessScope::ShaderRead,
    };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedOp {
    Dispatch { label: String, grid: [u32; 3] },
    Barrier(MemoryBarrier),
}

pub struct CommandRecorder {
    encoder: wgpu::CommandEncoder,
    pass: Option<wgpu::ComputePass<'static>>,
    ops: Vec<RecordedOp>,
}

impl CommandRecorder {
    pub fn new(encoder: wgpu::CommandEncoder) -> Self {
        Self {
            encoder,
            pass: None,
            ops: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, kernel: &KernelApplication) {
        let pass = match &mut self.pass {
            Some(pass) => pass,
            none => none.insert(
                self.encoder
                    .begin_compute_pass(&wgpu::ComputePassDescriptor {
                        label: Some("spectrascale"),
                        timestamp_writes: None,
                    })
                    .forget_lifetime(),
            ),
        };
        kernel.encode(pass);
        self.ops.push(RecordedOp::Dispatch {
            label: kernel.label().to_string(),
            grid: kernel.grid(),
        });
    }

    /// Make every write recorded so far visible to later dispatches.
    pub fn barrier(&mut self, barrier: MemoryBarrier) {
        self.pass = None;
        self.ops.push(RecordedOp::Barrier(barrier));
    }

    pub fn finish(mut self) -> (wgpu::CommandBuffer, Vec<RecordedOp>) {
        self.pass = None;
        (self.encoder.finish(), self.ops)
    }
}
