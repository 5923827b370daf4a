use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::utils::TimeUtils;

/// The aggregation interval an analysis is computed over.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize, strum_macros::EnumIter,
)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "15m")]
    Minutes15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
}

impl Timeframe {
    /// Every supported timeframe, shortest first.
    pub fn all() -> Vec<Timeframe> {
        Timeframe::iter().collect()
    }

    /// Canonical code, used for selection and serialization.
    pub fn code(&self) -> &'static str {
        match self {
            Timeframe::Minutes15 => "15m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Day1 => "1d",
        }
    }

    /// Label shown to the user. Only the daily label differs from the code.
    pub fn display_label(&self) -> &'static str {
        match self {
            Timeframe::Minutes15 => "15m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Day1 => "1D",
        }
    }

    pub fn interval_ms(&self) -> i64 {
        match self {
            Timeframe::Minutes15 => TimeUtils::MS_IN_15_MIN,
            Timeframe::Hour1 => TimeUtils::MS_IN_H,
            Timeframe::Hour4 => TimeUtils::MS_IN_4_H,
            Timeframe::Day1 => TimeUtils::MS_IN_D,
        }
    }

    /// Interval string understood by the embedded chart widget.
    pub fn chart_interval(&self) -> &'static str {
        match self {
            Timeframe::Minutes15 => "15",
            Timeframe::Hour1 => "60",
            Timeframe::Hour4 => "240",
            Timeframe::Day1 => "D",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

/// Returned when a code matches none of the supported timeframes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown timeframe code '{0}'")]
pub struct UnknownTimeframe(pub String);

impl FromStr for Timeframe {
    type Err = UnknownTimeframe;

    // Accepts both the code and the display label ("1d" / "1D").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Timeframe::iter()
            .find(|tf| tf.code() == trimmed || tf.display_label() == trimmed)
            .ok_or_else(|| UnknownTimeframe(s.to_string()))
    }
}
