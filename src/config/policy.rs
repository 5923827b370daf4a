//! Per-timeframe analysis policy.
//!
//! Longer timeframes place zones further from price, widen the entry band,
//! push targets out and ask for a better risk-reward. All distances are in
//! price units (EURUSD: 0.0001 = one pip) and are unsigned; the classifier and
//! generator apply the sign for each side.

use crate::domain::Timeframe;
use crate::models::{RiskReward, ZoneStrength};

/// Where one zone sits relative to the reference price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneOffset {
    pub distance: f64,
    pub strength: ZoneStrength,
    pub note: &'static str,
}

/// Declarative policy record for a single timeframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeframePolicy {
    /// Near zone first, then far.
    pub resistances: [ZoneOffset; 2],
    /// Near zone first, then far.
    pub supports: [ZoneOffset; 2],
    /// Half-width of the entry band around the nearest zone.
    pub entry_spread: f64,
    /// Near and far take-profit distances from the reference price.
    pub take_profits: (f64, f64),
    pub risk_reward: RiskReward,
}

const fn offset(distance: f64, strength: ZoneStrength, note: &'static str) -> ZoneOffset {
    ZoneOffset {
        distance,
        strength,
        note,
    }
}

pub const MINUTES_15: TimeframePolicy = TimeframePolicy {
    resistances: [
        offset(0.0010, ZoneStrength::Medium, "15m local high"),
        offset(0.0020, ZoneStrength::Strong, "15m structure resistance"),
    ],
    supports: [
        offset(0.0010, ZoneStrength::Medium, "15m local low"),
        offset(0.0020, ZoneStrength::Strong, "15m structure support"),
    ],
    entry_spread: 0.0005,
    take_profits: (0.0015, 0.0030),
    risk_reward: RiskReward::new(1.0, 1.5),
};

pub const HOUR_1: TimeframePolicy = TimeframePolicy {
    resistances: [
        offset(0.0015, ZoneStrength::Medium, "1h structure high"),
        offset(0.0025, ZoneStrength::Strong, "1h supply zone"),
    ],
    supports: [
        offset(0.0015, ZoneStrength::Medium, "1h structure low"),
        offset(0.0025, ZoneStrength::Strong, "1h demand zone"),
    ],
    entry_spread: 0.0008,
    take_profits: (0.0025, 0.0045),
    risk_reward: RiskReward::new(1.0, 2.0),
};

pub const HOUR_4: TimeframePolicy = TimeframePolicy {
    resistances: [
        offset(0.0030, ZoneStrength::Medium, "4h structure resistance"),
        offset(0.0050, ZoneStrength::Strong, "4h range high"),
    ],
    supports: [
        offset(0.0020, ZoneStrength::Medium, "4h structure support"),
        offset(0.0030, ZoneStrength::Strong, "4h range low"),
    ],
    entry_spread: 0.0012,
    take_profits: (0.0040, 0.0070),
    risk_reward: RiskReward::new(1.0, 2.5),
};

pub const DAY_1: TimeframePolicy = TimeframePolicy {
    resistances: [
        offset(0.0055, ZoneStrength::Medium, "Previous day high"),
        offset(0.0075, ZoneStrength::Strong, "Daily resistance"),
    ],
    supports: [
        offset(0.0035, ZoneStrength::Medium, "Previous day low"),
        offset(0.0045, ZoneStrength::Strong, "Daily support"),
    ],
    entry_spread: 0.0015,
    take_profits: (0.0060, 0.0100),
    risk_reward: RiskReward::new(1.0, 3.0),
};

/// Policy lookup. Exhaustive over `Timeframe`, so an unsupported timeframe
/// cannot reach the classifier.
pub fn policy_for(timeframe: Timeframe) -> &'static TimeframePolicy {
    match timeframe {
        Timeframe::Minutes15 => &MINUTES_15,
        Timeframe::Hour1 => &HOUR_1,
        Timeframe::Hour4 => &HOUR_4,
        Timeframe::Day1 => &DAY_1,
    }
}
