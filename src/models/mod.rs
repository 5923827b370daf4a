// Domain models for the analysis panel
// These modules contain plain data independent of UI/rendering

pub mod indicators;
pub mod price_zone;
pub mod snapshot;
pub mod trade_setup;

// Re-export key types for convenience
pub use indicators::{IndicatorKind, IndicatorReading, IndicatorReadings, RawIndicators, Sentiment};
pub use price_zone::{PriceZone, ZoneKind, ZoneStrength};
pub use snapshot::{AnalysisSnapshot, ChartTarget};
pub use trade_setup::{EntryZone, RiskReward, TakeProfit, TradeDirection, TradeSetup, TradeSetups};
