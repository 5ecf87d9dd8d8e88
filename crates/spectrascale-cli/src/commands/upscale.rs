use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use spectrascale_core::compute::create_upscaler;
use spectrascale_core::io::{default_output, load_rgb, save_rgb_png};
use tracing::info;

use super::options::UpscaleOptions;
use crate::summary;

#[derive(Args)]
pub struct UpscaleArgs {
    /// Input PNG file
    pub input: PathBuf,

    /// Output PNG file (default: {width}_{upscaled width}_upscaled.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub options: UpscaleOptions,
}

pub fn run(args: &UpscaleArgs) -> Result<()> {
    let config = args.options.to_config()?;
    let params = config.params();

    let start = Instant::now();
    let image = load_rgb(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    info!(
        width = image.width(),
        height = image.height(),
        "Loaded {}",
        args.input.display()
    );
    let mut upscaler = create_upscaler(
        config.device.preference,
        config.device.device_id,
        params.precision,
    )?;
    summary::print_upscale_summary(&config, upscaler.name(), &args.input);

    let output = upscaler.upscale(&image, &params)?;
    let path = args.output.clone().unwrap_or_else(|| {
        default_output(output.plan.width, output.plan.output_width())
    });
    save_rgb_png(&output.image, &path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    info!(output = %path.display(), "Saved upscaled image");

    summary::print_upscale_result(&output, upscaler.device_bytes(), &path, start.elapsed());
    Ok(())
}
