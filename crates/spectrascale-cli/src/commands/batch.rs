use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use spectrascale_core::batch::run_batch_reported;
use spectrascale_core::pipeline::ProgressReporter;

use super::options::UpscaleOptions;
use crate::summary;

#[derive(Args)]
pub struct BatchArgs {
    /// Folder holding 000001.png, 000002.png, ...
    #[arg(long)]
    pub ifolder: Option<PathBuf>,

    /// Folder for the upscaled files (same names)
    #[arg(long)]
    pub ofolder: Option<PathBuf>,

    /// Number of files to process
    #[arg(long)]
    pub numfiles: Option<usize>,

    /// Worker threads, each with its own device context
    #[arg(long)]
    pub threads: Option<usize>,

    #[command(flatten)]
    pub options: UpscaleOptions,
}

struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
    }

    fn file_done(&self, path: &Path, _elapsed: Option<Duration>) {
        if let Some(name) = path.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_with_message("Done");
    }
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let mut config = args.options.to_config()?;
    if let Some(ref folder) = args.ifolder {
        config.batch.input_folder = folder.clone();
    }
    if let Some(ref folder) = args.ofolder {
        config.batch.output_folder = folder.clone();
    }
    if let Some(count) = args.numfiles {
        config.batch.file_count = count;
    }
    if let Some(threads) = args.threads {
        config.batch.threads = threads;
    }

    summary::print_batch_summary(&config);

    let bar = ProgressBar::new(config.batch.file_count as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = BarReporter { bar };
    let report = run_batch_reported(&config, &reporter)?;

    summary::print_batch_report(&report);
    if !report.is_success() {
        bail!(
            "{} of {} files failed ({} skipped)",
            report.failed(),
            report.outcomes.len(),
            report.skipped()
        );
    }
    Ok(())
}
