use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::maths_utils::{PriceRange, format_price};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDirection {
    Long,
    Short,
}

impl TradeDirection {
    /// +1 for long, -1 for short. Applied to unsigned policy distances.
    pub fn sign(&self) -> f64 {
        match self {
            TradeDirection::Long => 1.0,
            TradeDirection::Short => -1.0,
        }
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TradeDirection::Long => write!(f, "Long"),
            TradeDirection::Short => write!(f, "Short"),
        }
    }
}

/// Price band to enter in, or an explicit marker when no zone backs it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryZone {
    Range(PriceRange),
    Unavailable,
}

impl EntryZone {
    pub fn range(&self) -> Option<&PriceRange> {
        match self {
            EntryZone::Range(range) => Some(range),
            EntryZone::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, EntryZone::Range(_))
    }
}

impl fmt::Display for EntryZone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntryZone::Range(range) => {
                write!(f, "{}-{}", format_price(range.low), format_price(range.high))
            }
            EntryZone::Unavailable => write!(f, "N/A"),
        }
    }
}

/// Two targets, nearer to entry first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TakeProfit {
    pub near: f64,
    pub far: f64,
}

impl TakeProfit {
    pub fn targets(&self) -> [f64; 2] {
        [self.near, self.far]
    }
}

impl fmt::Display for TakeProfit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, {}", format_price(self.near), format_price(self.far))
    }
}

/// Risk to reward, rendered as `1:2.5`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskReward {
    pub risk: f64,
    pub reward: f64,
}

impl RiskReward {
    pub const fn new(risk: f64, reward: f64) -> Self {
        Self { risk, reward }
    }

    pub fn ratio(&self) -> f64 {
        self.reward / self.risk
    }
}

impl fmt::Display for RiskReward {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // f64 Display drops a trailing ".0", giving "1:2" rather than "1.0:2.0"
        write!(f, "{}:{}", self.risk, self.reward)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub direction: TradeDirection,
    pub entry_zone: EntryZone,
    pub take_profit: TakeProfit,
    pub risk_reward: RiskReward,
    pub note: String,
}

/// The long/short pair produced by one computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSetups {
    pub long: TradeSetup,
    pub short: TradeSetup,
}

impl TradeSetups {
    pub fn iter(&self) -> impl Iterator<Item = &TradeSetup> {
        [&self.long, &self.short].into_iter()
    }
}

impl fmt::Display for TradeSetup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:<5} entry {} | TP {} | RR {} | {}",
            self.direction.to_string(),
            self.entry_zone,
            self.take_profit,
            self.risk_reward,
            self.note
        )
    }
}
