use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Upscale factor {factor} does not give an integer size for {width}x{height}")]
    InvalidUpscale { factor: f32, width: u32, height: u32 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("GPU device error: {0}")]
    Device(String),

    #[error("Shader `{label}` failed to compile:\n{diagnostic}")]
    Compile { label: String, diagnostic: String },
}

/// How far an error propagates through a batch run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorScope {
    /// Abort every worker.
    Run,
    /// Stop the worker that hit it; siblings continue.
    Worker,
    /// Give up on the current file only.
    File,
}

impl SpectraError {
    pub fn scope(&self) -> ErrorScope {
        match self {
            Self::Config(_)
            | Self::InvalidUpscale { .. }
            | Self::InvalidDimensions { .. }
            | Self::Device(_) => ErrorScope::Run,
            Self::FileNotFound(_) | Self::Io(_) | Self::ImageError(_) => ErrorScope::Worker,
            Self::Compile { .. } => ErrorScope::File,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpectraError>;
