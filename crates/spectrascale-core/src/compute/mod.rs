pub mod cpu;
pub mod reference;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::consts::MAX_SHARPEN;
use crate::error::{Result, SpectraError};
use crate::frame::PlanarImage;
use crate::gpu::WorkerContext;
use crate::plan::{Precision, TransformMode, TransformPlan};

pub use cpu::CpuUpscaler;

/// Which device runs the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// GPU when one can be opened, CPU otherwise. Single precision only.
    Auto,
    Cpu,
    #[default]
    Gpu,
}

impl std::fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Cpu => write!(f, "cpu"),
            Self::Gpu => write!(f, "gpu"),
        }
    }
}

/// Per-image parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpscaleParams {
    pub factor: f32,
    pub sharpen: f32,
    pub precision: Precision,
    pub mode: TransformMode,
    pub iterations: u32,
}

impl UpscaleParams {
    /// Reject parameters that would produce a meaningless image.
    pub fn validate(&self) -> Result<()> {
        if !self.sharpen.is_finite() || !(0.0..MAX_SHARPEN).contains(&self.sharpen) {
            return Err(SpectraError::Config(format!(
                "sharpen coefficient {} must be in [0, {MAX_SHARPEN})",
                self.sharpen
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct UpscaleOutput {
    pub image: PlanarImage,
    pub plan: TransformPlan,
    /// Time for one pass of the pipeline, averaged over the iterations.
    pub elapsed: Duration,
}

/// Something that can run the full upscale pipeline on an image.
///
/// Implementations own their device state and are used from a single thread.
pub trait Upscaler {
    fn name(&self) -> &str;

    fn upscale(&mut self, image: &PlanarImage, params: &UpscaleParams) -> Result<UpscaleOutput>;

    /// Device memory currently held for buffers.
    fn device_bytes(&self) -> u64 {
        0
    }
}

/// Create an upscaler for the requested device.
///
/// The CPU path always computes in double precision, so `Auto` only falls
/// back to it for single precision runs; other precisions keep the device error.
pub fn create_upscaler(
    preference: DevicePreference,
    device_id: usize,
    precision: Precision,
) -> Result<Box<dyn Upscaler>> {
    match preference {
        DevicePreference::Cpu => {
            if precision != Precision::Single {
                warn!("CPU upscaler ignores {precision} precision");
            }
            Ok(Box::new(CpuUpscaler::new()))
        }
        DevicePreference::Gpu => Ok(Box::new(WorkerContext::new(device_id, precision)?)),
        DevicePreference::Auto => match WorkerContext::new(device_id, precision) {
            Ok(ctx) => Ok(Box::new(ctx)),
            Err(e @ SpectraError::Device(_)) if precision == Precision::Single => {
                warn!("GPU unavailable ({e}), falling back to CPU");
                info!("Using CPU/Rayon upscaler");
                Ok(Box::new(CpuUpscaler::new()))
            }
            Err(e) => Err(e),
        },
    }
}
