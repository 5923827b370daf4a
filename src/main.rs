use anyhow::{Context, Result};
use clap::Parser;
use tokio::runtime::Runtime;

use forex_lens::Cli;
use forex_lens::host::run_host;

fn main() -> Result<()> {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Run the engine until stdin says quit or the tick limit is reached
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(run_host(args))
}
