use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::compute::{DevicePreference, UpscaleParams};
use crate::consts::{DEFAULT_SHARPEN, DEFAULT_UPSCALE};
use crate::plan::{Precision, TransformMode};

/// Full run configuration, loadable from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpscaleConfig {
    #[serde(default)]
    pub upscale: UpscaleSection,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

impl UpscaleConfig {
    pub fn params(&self) -> UpscaleParams {
        UpscaleParams {
            factor: self.upscale.factor,
            sharpen: self.upscale.sharpen,
            precision: self.upscale.precision,
            mode: self.upscale.mode,
            iterations: self.upscale.iterations.max(1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpscaleSection {
    /// Scale applied to both axes. `factor * size` must be an integer.
    pub factor: f32,
    /// Sharpen coefficient, usually in 0.0..=0.2.
    pub sharpen: f32,
    pub precision: Precision,
    pub mode: TransformMode,
    /// Pipeline repetitions per submission, for timing.
    pub iterations: u32,
}

impl Default for UpscaleSection {
    fn default() -> Self {
        Self {
            factor: DEFAULT_UPSCALE,
            sharpen: DEFAULT_SHARPEN,
            precision: Precision::Single,
            mode: TransformMode::Auto,
            iterations: 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub preference: DevicePreference,
    /// Adapter index as listed by `spectrascale devices`.
    pub device_id: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    /// Number of files, named `000001.png` upwards.
    pub file_count: usize,
    pub threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_folder: PathBuf::from("input"),
            output_folder: PathBuf::from("output"),
            file_count: 0,
            threads: 1,
        }
    }
}
