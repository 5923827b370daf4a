use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::analysis::{SetupGenerator, targets_clear_entry, try_classify};
use crate::config::{ANALYSIS, policy_for};
use crate::domain::Timeframe;

use super::error::EngineError;

/// Runtime knobs for one engine instance. Defaults come from `ANALYSIS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub reference_price: f64,
    pub default_timeframe: Timeframe,
    pub poll_timeout: Duration,
    pub chart_symbol: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            reference_price: ANALYSIS.reference_price,
            default_timeframe: ANALYSIS.default_timeframe,
            poll_timeout: Duration::from_millis(ANALYSIS.refresh.poll_timeout_ms),
            chart_symbol: ANALYSIS.chart.symbol.to_string(),
        }
    }
}

impl EngineSettings {
    /// Largest distance any zone or target is placed below the reference
    /// price, across every timeframe. The reference price must sit above it
    /// or a support or short target would land at or below zero.
    pub fn deepest_downside_offset() -> f64 {
        Timeframe::all()
            .into_iter()
            .flat_map(|tf| {
                let policy = policy_for(tf);
                let (near, far) = policy.take_profits;
                policy
                    .supports
                    .iter()
                    .map(|o| o.distance)
                    .chain([near, far])
                    .collect::<Vec<_>>()
            })
            .fold(0.0, f64::max)
    }

    /// Run the zone and setup computations for every timeframe at `price` and
    /// report the first contract they break. Catches prices so large that the
    /// policy offsets are lost to rounding.
    pub fn price_violation(price: f64) -> Option<String> {
        let generator = SetupGenerator::new(price);
        for tf in Timeframe::all() {
            let zones = match try_classify(tf, price) {
                Ok(zones) => zones,
                Err(violation) => return Some(format!("{tf}: {violation}")),
            };
            for setup in generator.generate(&zones, tf).iter() {
                if !setup.entry_zone.is_available() || !targets_clear_entry(setup) {
                    return Some(format!(
                        "{tf}: {} targets do not clear the entry",
                        setup.direction
                    ));
                }
            }
        }
        None
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let price = self.reference_price;
        if !price.is_finite() || price <= Self::deepest_downside_offset() {
            return Err(EngineError::InvalidReferencePrice(price));
        }
        if let Some(violation) = Self::price_violation(price) {
            log::warn!("Reference price {price} rejected: {violation}");
            return Err(EngineError::InvalidReferencePrice(price));
        }
        if self.poll_timeout.is_zero() {
            return Err(EngineError::InvalidSettings(
                "poll timeout must be non-zero".to_string(),
            ));
        }
        if self.chart_symbol.trim().is_empty() {
            return Err(EngineError::InvalidSettings(
                "chart symbol must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = EngineSettings::default();
        assert_eq!(settings.reference_price, 1.0315);
        assert_eq!(settings.default_timeframe, Timeframe::Minutes15);
        assert_eq!(settings.chart_symbol, "FX:EURUSD");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_reference_price_below_downside_depth() {
        let deepest = EngineSettings::deepest_downside_offset();
        // 1d far take-profit
        assert_eq!(deepest, 0.0100);

        // 0.005 clears every support but would push the 1d short target negative
        for price in [0.0, -1.0, 0.005, deepest, f64::NAN, f64::INFINITY] {
            let settings = EngineSettings {
                reference_price: price,
                ..Default::default()
            };
            assert!(
                matches!(settings.validate(), Err(EngineError::InvalidReferencePrice(_))),
                "{price} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_price_too_large_to_resolve_offsets() {
        for price in [1e16, 1e13, f64::MAX] {
            let settings = EngineSettings {
                reference_price: price,
                ..Default::default()
            };
            assert!(
                matches!(settings.validate(), Err(EngineError::InvalidReferencePrice(_))),
                "{price} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_prices_across_the_usable_range() {
        for price in [0.0101, 0.02, 1.0315, 150.25, 1e6] {
            let settings = EngineSettings {
                reference_price: price,
                ..Default::default()
            };
            assert!(settings.validate().is_ok(), "{price} should be accepted");
            assert_eq!(EngineSettings::price_violation(price), None);
        }
    }

    #[test]
    fn rejects_zero_timeout_and_blank_symbol() {
        let settings = EngineSettings {
            poll_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(EngineError::InvalidSettings(_))));

        let settings = EngineSettings {
            chart_symbol: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(EngineError::InvalidSettings(_))));
    }
}
