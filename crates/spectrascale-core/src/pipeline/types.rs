use std::path::Path;
use std::time::Duration;

/// One of the three device buffers a stage reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferRole {
    Input,
    Working,
    Scratch,
}

/// A stage of the upscale pipeline. Each has fixed buffer bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Input pixels to spectrum, via scratch.
    Forward,
    /// Spectrum (working) re-centred into scratch.
    Shift,
    /// Padded spectrum back to the upscaled image, via working.
    Inverse,
    /// Upscaled image (scratch) sharpened into working.
    Sharpen,
}

impl PipelineStage {
    /// Execution order within one batch.
    pub const ORDER: [PipelineStage; 4] = [Self::Forward, Self::Shift, Self::Inverse, Self::Sharpen];

    pub fn reads(self) -> &'static [BufferRole] {
        match self {
            Self::Forward => &[BufferRole::Input, BufferRole::Scratch],
            Self::Shift => &[BufferRole::Working],
            Self::Inverse => &[BufferRole::Scratch, BufferRole::Working],
            Self::Sharpen => &[BufferRole::Scratch],
        }
    }

    pub fn writes(self) -> &'static [BufferRole] {
        match self {
            Self::Forward => &[BufferRole::Scratch, BufferRole::Working],
            Self::Shift => &[BufferRole::Scratch],
            Self::Inverse => &[BufferRole::Working, BufferRole::Scratch],
            Self::Sharpen => &[BufferRole::Working],
        }
    }

    /// True when `next` must wait for this stage's writes.
    pub fn hazard_with(self, next: PipelineStage) -> bool {
        self.writes()
            .iter()
            .any(|b| next.reads().contains(b) || next.writes().contains(b))
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "Forward transform"),
            Self::Shift => write!(f, "Spectral shift"),
            Self::Inverse => write!(f, "Inverse transform"),
            Self::Sharpen => write!(f, "Sharpening"),
        }
    }
}

/// Thread-safe progress reporting for batch runs.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A batch of `total_files` is starting.
    fn begin(&self, _total_files: usize) {}

    /// One file finished, successfully or not.
    fn file_done(&self, _path: &Path, _elapsed: Option<Duration>) {}

    fn finish(&self) {}
}

/// No-op progress reporter, used when `run_batch` delegates.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
