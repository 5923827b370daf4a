use serde::{Deserialize, Serialize};

/// Decimal places used when rendering FX prices (one pip on EURUSD).
pub const PRICE_DECIMALS: usize = 4;

/// A closed price interval `[low, high]`.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    /// Build a range centred on `center`, extending `half_width` either side.
    pub fn around(center: f64, half_width: f64) -> Self {
        let half_width = half_width.abs();
        Self {
            low: center - half_width,
            high: center + half_width,
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn format_price(price: f64) -> String {
    format!("{:.*}", PRICE_DECIMALS, price)
}
