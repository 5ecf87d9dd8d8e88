//! Device buffers for one plan, and the staged transfers that fill and drain them.

use std::sync::mpsc;

use tracing::debug;

use crate::consts::BYTES_PER_MIB;
use crate::error::{Result, SpectraError};
use crate::plan::{BufferSizes, TransformPlan};

use super::context::GpuContext;
use super::transfer::aligned;

fn storage_buffer(ctx: &GpuContext, label: &str, size: u64) -> wgpu::Buffer {
    ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: aligned(size.max(1)),
        usage: wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::COPY_SRC
            | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Input, working and scratch buffers sized from one plan.
pub struct GpuBufferSet {
    pub input: wgpu::Buffer,
    pub working: wgpu::Buffer,
    pub scratch: wgpu::Buffer,
    sizes: BufferSizes,
}

impl GpuBufferSet {
    pub fn new(ctx: &GpuContext, plan: &TransformPlan) -> Self {
        let sizes = plan.buffer_sizes();
        let set = Self {
            input: storage_buffer(ctx, "input", sizes.input),
            working: storage_buffer(ctx, "working", sizes.working),
            scratch: storage_buffer(ctx, "scratch", sizes.scratch),
            sizes,
        };
        debug!(
            input = sizes.input,
            working = sizes.working,
            scratch = sizes.scratch,
            vram_mib = set.device_bytes() as f64 / BYTES_PER_MIB as f64,
            "Buffers allocated"
        );
        set
    }

    pub fn sizes(&self) -> BufferSizes {
        self.sizes
    }

    /// Bytes of device memory actually allocated.
    pub fn device_bytes(&self) -> u64 {
        self.input.size() + self.working.size() + self.scratch.size()
    }
}

/// Host-visible readback buffer, reused across files of one geometry.
pub struct StagingBuffers {
    readback: wgpu::Buffer,
}

impl StagingBuffers {
    pub fn new(ctx: &GpuContext, sizes: &BufferSizes) -> Self {
        let readback = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback"),
            size: aligned(sizes.output.max(1)),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { readback }
    }

    /// Write `bytes` to the start of `dst` and block until the queue has it.
    pub fn upload(&self, ctx: &GpuContext, dst: &wgpu::Buffer, bytes: &[u8]) -> Result<()> {
        if bytes.len() as u64 > dst.size() {
            return Err(SpectraError::Config(format!(
                "upload of {} bytes does not fit a {}-byte buffer",
                bytes.len(),
                dst.size()
            )));
        }
        ctx.queue.write_buffer(dst, 0, bytes);
        ctx.submit_and_wait(ctx.encoder("upload").finish())?;
        Ok(())
    }

    /// Copy the first `len` bytes of `src` to the host, blocking until done.
    pub fn download(&self, ctx: &GpuContext, src: &wgpu::Buffer, len: u64) -> Result<Vec<u8>> {
        let size = aligned(len).min(self.readback.size()).min(src.size());
        let mut encoder = ctx.encoder("download");
        encoder.copy_buffer_to_buffer(src, 0, &self.readback, 0, size);
        ctx.submit_and_wait(encoder.finish())?;

        let slice = self.readback.slice(..size);
        let (tx, rx) = mpsc::sync_channel(1);
        slice.map_async(wgpu::MapMode::Read, move |r| {
            tx.send(r).ok();
        });
        ctx.poll_blocking()?;
        rx.recv()
            .map_err(|_| SpectraError::Device("readback channel closed".into()))?
            .map_err(|e| SpectraError::Device(format!("buffer mapping failed: {e}")))?;

        let view = slice.get_mapped_range();
        let bytes = view[..len.min(size) as usize].to_vec();
        drop(view);
        self.readback.unmap();
        Ok(bytes)
    }
}
