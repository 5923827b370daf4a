use crate::analysis::zone_classifier::{ZONE_PRICE_DECIMALS, nearest_zone};
use crate::config::{TimeframePolicy, policy_for};
use crate::domain::Timeframe;
use crate::models::{
    EntryZone, PriceZone, RiskReward, TakeProfit, TradeDirection, TradeSetup, TradeSetups,
    ZoneKind,
};
use crate::utils::maths_utils::{PriceRange, round_to};

/// Derives the long/short setup pair from a timeframe's zones.
/// Targets are measured from the fixed reference price, not from the entry.
#[derive(Debug, Clone, Copy)]
pub struct SetupGenerator {
    reference_price: f64,
}

impl SetupGenerator {
    pub fn new(reference_price: f64) -> Self {
        Self { reference_price }
    }

    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    pub fn generate(&self, zones: &[PriceZone], timeframe: Timeframe) -> TradeSetups {
        TradeSetups {
            long: self.build(zones, timeframe, TradeDirection::Long),
            short: self.build(zones, timeframe, TradeDirection::Short),
        }
    }

    fn build(
        &self,
        zones: &[PriceZone],
        timeframe: Timeframe,
        direction: TradeDirection,
    ) -> TradeSetup {
        let policy = policy_for(timeframe);
        let label = timeframe.display_label();

        let (anchor_kind, note) = match direction {
            TradeDirection::Long => (
                ZoneKind::Support,
                format!("Wait for confirmation at {label} support"),
            ),
            TradeDirection::Short => (
                ZoneKind::Resistance,
                format!("Watch for reversal at {label} resistance"),
            ),
        };

        TradeSetup {
            direction,
            entry_zone: entry_zone(zones, anchor_kind, timeframe, policy),
            take_profit: take_profit(self.reference_price, policy, direction),
            risk_reward: risk_reward(timeframe),
            note,
        }
    }
}

/// Fixed per-timeframe lookup. Not derived from the entry/target spread.
pub fn risk_reward(timeframe: Timeframe) -> RiskReward {
    policy_for(timeframe).risk_reward
}

fn entry_zone(
    zones: &[PriceZone],
    kind: ZoneKind,
    timeframe: Timeframe,
    policy: &TimeframePolicy,
) -> EntryZone {
    match nearest_zone(zones, kind, timeframe) {
        Some(zone) => {
            let band = PriceRange::around(zone.price, policy.entry_spread);
            EntryZone::Range(PriceRange {
                low: round_to(band.low, ZONE_PRICE_DECIMALS),
                high: round_to(band.high, ZONE_PRICE_DECIMALS),
            })
        }
        None => {
            log::warn!("No {kind} zone for {timeframe}; entry zone unavailable");
            EntryZone::Unavailable
        }
    }
}

fn take_profit(
    reference_price: f64,
    policy: &TimeframePolicy,
    direction: TradeDirection,
) -> TakeProfit {
    let (near, far) = policy.take_profits;
    let sign = direction.sign();
    TakeProfit {
        near: round_to(reference_price + sign * near, ZONE_PRICE_DECIMALS),
        far: round_to(reference_price + sign * far, ZONE_PRICE_DECIMALS),
    }
}

/// True when both targets lie strictly beyond the entry band in the trade's
/// direction. Vacuously true for an unavailable entry.
pub fn targets_clear_entry(setup: &TradeSetup) -> bool {
    let Some(range) = setup.entry_zone.range() else {
        return true;
    };
    let targets = setup.take_profit.targets();
    match setup.direction {
        TradeDirection::Long => targets.iter().all(|&tp| tp > range.high),
        TradeDirection::Short => targets.iter().all(|&tp| tp < range.low),
    }
}
