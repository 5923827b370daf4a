// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod host;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use data::{FeedError, IndicatorSource, RandomIndicatorSource, ReplayIndicatorSource};
pub use domain::Timeframe;
pub use engine::{
    EngineError, EngineHandle, EngineSettings, MarketAnalysisEngine, RefreshOutcome,
    RefreshScheduler, spawn_engine_worker,
};
pub use models::{AnalysisSnapshot, IndicatorReadings, PriceZone, TradeSetup, TradeSetups};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
// CLI argument parsing
use clap::Parser;

use crate::config::ANALYSIS;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Timeframe selected on startup (15m, 1h, 4h, 1d)
    #[arg(long, default_value = "15m")]
    pub timeframe: Timeframe,

    /// Price that zones and take-profit targets are anchored to
    #[arg(long, default_value_t = ANALYSIS.reference_price)]
    pub reference_price: f64,

    /// Seconds between scheduled refreshes
    #[arg(long, default_value_t = ANALYSIS.refresh.interval_secs)]
    pub refresh_secs: u64,

    /// Upper bound on a single indicator poll, in milliseconds
    #[arg(long, default_value_t = ANALYSIS.refresh.poll_timeout_ms)]
    pub poll_timeout_ms: u64,

    /// Seed the placeholder indicator generator for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Replay indicator readings from a JSON file instead of generating them
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Restart the replay script when it runs out
    #[arg(long, default_value_t = false, requires = "replay")]
    pub replay_loop: bool,

    /// Exit after this many snapshots have been published past the first
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Print snapshots as JSON lines instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl Cli {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            reference_price: self.reference_price,
            default_timeframe: self.timeframe,
            poll_timeout: Duration::from_millis(self.poll_timeout_ms),
            ..Default::default()
        }
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    pub fn indicator_source(&self) -> Result<Arc<dyn IndicatorSource>> {
        if let Some(path) = &self.replay {
            let source = ReplayIndicatorSource::from_json_file(path)?.looping(self.replay_loop);
            log::info!("Replaying {} indicator steps from {:?}", source.remaining(), path);
            return Ok(Arc::new(source));
        }

        let source = match self.seed {
            Some(seed) => RandomIndicatorSource::seeded(seed),
            None => RandomIndicatorSource::new(),
        };
        Ok(Arc::new(source))
    }
}
