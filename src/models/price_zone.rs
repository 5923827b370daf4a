use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Timeframe;
use crate::utils::maths_utils::format_price;

/// Which side of price a zone sits on
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Resistance, // Above the reference price, caps rallies
    Support,    // Below the reference price, holds dips
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ZoneKind::Resistance => write!(f, "Resistance"),
            ZoneKind::Support => write!(f, "Support"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStrength {
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for ZoneStrength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ZoneStrength::Weak => write!(f, "Weak"),
            ZoneStrength::Medium => write!(f, "Medium"),
            ZoneStrength::Strong => write!(f, "Strong"),
        }
    }
}

/// A single classified price level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceZone {
    pub kind: ZoneKind,
    pub price: f64,
    pub strength: ZoneStrength,
    /// Free text, may be empty.
    pub note: String,
    pub timeframe: Timeframe,
}

impl PriceZone {
    pub fn new(
        kind: ZoneKind,
        price: f64,
        strength: ZoneStrength,
        note: impl Into<String>,
        timeframe: Timeframe,
    ) -> Self {
        Self {
            kind,
            price,
            strength,
            note: note.into(),
            timeframe,
        }
    }

    /// Distance from price to this zone
    pub fn distance_to(&self, price: f64) -> f64 {
        (self.price - price).abs()
    }
}

impl fmt::Display for PriceZone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.kind,
            format_price(self.price),
            self.strength
        )?;
        if !self.note.is_empty() {
            write!(f, " - {}", self.note)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_skips_empty_note() {
        let zone = PriceZone::new(
            ZoneKind::Support,
            1.0305,
            ZoneStrength::Medium,
            "",
            Timeframe::Minutes15,
        );
        assert_eq!(zone.to_string(), "Support 1.0305 (Medium)");

        let noted = PriceZone {
            note: "15m local low".to_string(),
            ..zone
        };
        assert_eq!(noted.to_string(), "Support 1.0305 (Medium) - 15m local low");
    }

    #[test]
    fn strength_orders_weak_to_strong() {
        assert!(ZoneStrength::Weak < ZoneStrength::Medium);
        assert!(ZoneStrength::Medium < ZoneStrength::Strong);
    }
}
