mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spectrascale", about = "GPU spectral image upscaler")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upscale a single PNG image
    Upscale(commands::upscale::UpscaleArgs),
    /// Upscale numbered PNG files from a folder across worker threads
    Batch(commands::batch::BatchArgs),
    /// List available GPU adapters
    Devices,
    /// Print or save the default configuration as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Upscale(args) => commands::upscale::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Devices => commands::devices::run(),
        Commands::Config(args) => commands::config::run(args),
    }
}
