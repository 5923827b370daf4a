use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Rsi,
    Macd,
    MovingAverage,
}

impl IndicatorKind {
    /// Readings strictly above this value are bullish. Fixed, not configurable.
    pub fn bullish_threshold(&self) -> f64 {
        match self {
            IndicatorKind::Rsi => 50.0,
            IndicatorKind::Macd => 0.0,
            IndicatorKind::MovingAverage => 50.0,
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IndicatorKind::Rsi => write!(f, "RSI"),
            IndicatorKind::Macd => write!(f, "MACD"),
            IndicatorKind::MovingAverage => write!(f, "Moving Averages"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Bullish,
    Bearish,
}

impl Sentiment {
    /// Strict `>`: a reading sitting exactly on the threshold is bearish.
    pub fn classify(kind: IndicatorKind, value: f64) -> Self {
        if value > kind.bullish_threshold() {
            Sentiment::Bullish
        } else {
            Sentiment::Bearish
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sentiment::Bullish => write!(f, "Bullish"),
            Sentiment::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Unlabelled values as returned by an indicator source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawIndicators {
    pub rsi: f64,
    pub macd: f64,
    #[serde(alias = "ma")]
    pub moving_average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub kind: IndicatorKind,
    pub value: f64,
    pub sentiment: Sentiment,
}

impl IndicatorReading {
    pub fn new(kind: IndicatorKind, value: f64) -> Self {
        Self {
            kind,
            value,
            sentiment: Sentiment::classify(kind, value),
        }
    }
}

impl fmt::Display for IndicatorReading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {:.2} ({})", self.kind, self.value, self.sentiment)
    }
}

/// One labelled poll of every tracked indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReadings {
    pub rsi: IndicatorReading,
    pub macd: IndicatorReading,
    pub moving_average: IndicatorReading,
    pub polled_at: DateTime<Utc>,
}

impl IndicatorReadings {
    pub fn from_raw(raw: RawIndicators, polled_at: DateTime<Utc>) -> Self {
        Self {
            rsi: IndicatorReading::new(IndicatorKind::Rsi, raw.rsi),
            macd: IndicatorReading::new(IndicatorKind::Macd, raw.macd),
            moving_average: IndicatorReading::new(IndicatorKind::MovingAverage, raw.moving_average),
            polled_at,
        }
    }

    pub fn get(&self, kind: IndicatorKind) -> &IndicatorReading {
        match kind {
            IndicatorKind::Rsi => &self.rsi,
            IndicatorKind::Macd => &self.macd,
            IndicatorKind::MovingAverage => &self.moving_average,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorReading> {
        [&self.rsi, &self.macd, &self.moving_average].into_iter()
    }
}
