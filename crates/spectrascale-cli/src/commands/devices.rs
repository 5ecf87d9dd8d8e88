use anyhow::Result;
use spectrascale_core::gpu::list_adapters;

use crate::summary;

pub fn run() -> Result<()> {
    let adapters = list_adapters();
    if adapters.is_empty() {
        println!("No GPU adapters found; use --device cpu");
        return Ok(());
    }
    summary::print_adapters(&adapters);
    Ok(())
}
