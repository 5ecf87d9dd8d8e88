//! wgpu execution of the upscale pipeline.
//!
//! Each worker thread owns a [`WorkerContext`]: its own device and queue,
//! the buffers for the current plan, and the compiled stages.

pub mod buffers;
pub mod compiler;
pub mod context;
pub mod fft;
pub mod kernel_app;
pub mod recorder;
pub mod scheduler;
pub mod transfer;
mod worker;

pub use context::{list_adapters, AdapterSummary, GpuContext};
pub use recorder::{AccessScope, MemoryBarrier, RecordedOp};
pub use scheduler::{schedule, RunReport, ScheduleStep, SchedulerEvent, SchedulerState};
pub use worker::WorkerContext;
