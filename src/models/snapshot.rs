use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Timeframe;
use crate::models::indicators::IndicatorReadings;
use crate::models::price_zone::{PriceZone, ZoneKind};
use crate::models::trade_setup::TradeSetups;

/// How the host should address the external chart widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartTarget {
    pub symbol: String,
    pub interval: String,
}

impl ChartTarget {
    pub fn new(symbol: &str, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.to_string(),
            interval: timeframe.chart_interval().to_string(),
        }
    }
}

/// Everything the presentation layer renders, computed for one timeframe.
/// Published whole; observers never see a half-updated snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    /// Bumped on every publish.
    pub revision: u64,
    pub timeframe: Timeframe,
    pub reference_price: f64,
    /// `None` only until the first successful poll.
    pub indicators: Option<IndicatorReadings>,
    /// Resistances (near, far) then supports (near, far).
    pub zones: Vec<PriceZone>,
    pub setups: TradeSetups,
    pub chart: ChartTarget,
    pub computed_at: DateTime<Utc>,
}

impl AnalysisSnapshot {
    pub fn zones_of(&self, kind: ZoneKind) -> impl Iterator<Item = &PriceZone> {
        self.zones.iter().filter(move |z| z.kind == kind)
    }

    pub fn resistances(&self) -> impl Iterator<Item = &PriceZone> {
        self.zones_of(ZoneKind::Resistance)
    }

    pub fn supports(&self) -> impl Iterator<Item = &PriceZone> {
        self.zones_of(ZoneKind::Support)
    }
}
