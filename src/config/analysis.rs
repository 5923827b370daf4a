//! Analysis and refresh configuration

use crate::domain::Timeframe;

/// Settings for the refresh cycle driven by the host's scheduler
pub struct RefreshSettings {
    // Seconds between scheduler ticks (the reference dashboard refreshes every 5s)
    pub interval_secs: u64,
    // Upper bound on a single indicator poll before it is abandoned
    pub poll_timeout_ms: u64,
    // Pending commands the engine worker will buffer before callers wait
    pub command_capacity: usize,
}

/// Settings for the embedded chart widget (addressed, never queried)
pub struct ChartSettings {
    pub symbol: &'static str,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    // Anchor price that zones and take-profit targets are placed around.
    // EURUSD was trading near 1.0315 when the offset tables were authored.
    pub reference_price: f64,
    // Selected on startup, before the first observation
    pub default_timeframe: Timeframe,

    // Sub-groups
    pub refresh: RefreshSettings,
    pub chart: ChartSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    reference_price: 1.0315,
    default_timeframe: Timeframe::Minutes15,

    refresh: RefreshSettings {
        interval_secs: 5,
        poll_timeout_ms: 2_000,
        command_capacity: 16,
    },

    chart: ChartSettings {
        symbol: "FX:EURUSD",
    },
};

/// Inclusive band a placeholder reading is drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Bands used by the random placeholder source
pub struct IndicatorBands {
    pub rsi: Band,
    pub macd: Band,
    pub moving_average: Band,
}

pub const INDICATOR_BANDS: IndicatorBands = IndicatorBands {
    rsi: Band { min: 30.0, max: 70.0 },
    macd: Band { min: -20.0, max: 20.0 },
    moving_average: Band { min: 40.0, max: 60.0 },
};
