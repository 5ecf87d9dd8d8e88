pub mod config;
mod types;

pub use types::NoOpReporter;
pub use types::{BufferRole, PipelineStage, ProgressReporter};
