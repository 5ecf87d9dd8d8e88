use std::time::Instant;

use crate::error::Result;
use crate::frame::PlanarImage;
use crate::plan::{DeviceProfile, TransformPlan, UpscaleRequest};

use super::reference::upscale_image;
use super::{UpscaleOutput, UpscaleParams, Upscaler};

/// CPU upscaler using rustfft and Rayon.
pub struct CpuUpscaler {
    profile: DeviceProfile,
}

impl CpuUpscaler {
    pub fn new() -> Self {
        Self {
            profile: DeviceProfile::generic(),
        }
    }
}

impl Default for CpuUpscaler {
    fn default() -> Self {
        Self::new()
    }
}

impl Upscaler for CpuUpscaler {
    fn name(&self) -> &str {
        "CPU/Rayon"
    }

    fn upscale(&mut self, image: &PlanarImage, params: &UpscaleParams) -> Result<UpscaleOutput> {
        params.validate()?;
        let request = UpscaleRequest {
            width: image.width() as u32,
            height: image.height() as u32,
            channels: image.channels() as u32,
            precision: params.precision,
            upscale: params.factor,
            mode: params.mode,
        };
        let plan = TransformPlan::new(&request, &self.profile)?;

        let iterations = params.iterations.max(1);
        let start = Instant::now();
        let mut result = upscale_image(image, &plan, params.sharpen);
        for _ in 1..iterations {
            result = upscale_image(image, &plan, params.sharpen);
        }
        let elapsed = start.elapsed() / iterations;

        Ok(UpscaleOutput {
            image: result,
            plan,
            elapsed,
        })
    }
}
