use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use spectrascale_core::compute::DevicePreference;
use spectrascale_core::pipeline::config::UpscaleConfig;
use spectrascale_core::plan::{Precision, TransformMode};

#[derive(Clone, Copy, ValueEnum)]
pub enum DeviceArg {
    Auto,
    Cpu,
    Gpu,
}

impl From<DeviceArg> for DevicePreference {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Auto => DevicePreference::Auto,
            DeviceArg::Cpu => DevicePreference::Cpu,
            DeviceArg::Gpu => DevicePreference::Gpu,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Auto,
    Real,
    Complex,
}

impl From<ModeArg> for TransformMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Auto => TransformMode::Auto,
            ModeArg::Real => TransformMode::Real,
            ModeArg::Complex => TransformMode::Complex,
        }
    }
}

/// Options shared by `upscale` and `batch`.
#[derive(Args)]
pub struct UpscaleOptions {
    /// Run config file (TOML); overrides the options below
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Upscale factor; factor x width and factor x height must be integers
    #[arg(short, long, default_value = "2.0")]
    pub upscale: f32,

    /// Sharpening coefficient, usually 0.0-0.2; must be below 0.25
    #[arg(short, long, default_value = "0.2")]
    pub sharpen: f32,

    /// Precision: 0 = single, 1 = double, 2 = half
    #[arg(short, long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=2))]
    pub precision: u8,

    /// Pipeline repetitions per submission, for timing
    #[arg(short = 'n', long, default_value = "1")]
    pub iterations: u32,

    /// GPU adapter index (see `spectrascale devices`)
    #[arg(short, long, default_value = "0")]
    pub device_id: usize,

    /// Compute device; `auto` falls back to the CPU when no GPU opens
    #[arg(long, value_enum, default_value = "gpu")]
    pub device: DeviceArg,

    /// Transform layout
    #[arg(long, value_enum, default_value = "auto")]
    pub mode: ModeArg,
}

impl UpscaleOptions {
    /// Load `--config` if given, otherwise build a config from the flags.
    pub fn to_config(&self) -> Result<UpscaleConfig> {
        if let Some(ref path) = self.config {
            return load_config(path);
        }
        let mut config = UpscaleConfig::default();
        config.upscale.factor = self.upscale;
        config.upscale.sharpen = self.sharpen;
        config.upscale.precision = Precision::from_code(self.precision)?;
        config.upscale.iterations = self.iterations;
        config.upscale.mode = self.mode.into();
        config.device.preference = self.device.into();
        config.device.device_id = self.device_id;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<UpscaleConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).context("Invalid upscale config")
}
