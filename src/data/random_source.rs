use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::config::analysis::Band;
use crate::config::{INDICATOR_BANDS, IndicatorBands};
use crate::data::indicator_source::{FeedError, IndicatorSource};
use crate::models::RawIndicators;

/// Placeholder feed: draws each indicator uniformly from its band.
/// Never fails.
pub struct RandomIndicatorSource {
    rng: Mutex<StdRng>,
    bands: &'static IndicatorBands,
}

impl RandomIndicatorSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            bands: &INDICATOR_BANDS,
        }
    }

    /// Reproducible sequence, for demos and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            bands: &INDICATOR_BANDS,
        }
    }

    fn draw(rng: &mut StdRng, band: Band) -> f64 {
        rng.gen_range(band.min..=band.max)
    }
}

impl Default for RandomIndicatorSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndicatorSource for RandomIndicatorSource {
    fn name(&self) -> &str {
        "random"
    }

    async fn poll(&self) -> Result<RawIndicators, FeedError> {
        let mut rng = self.rng.lock().unwrap();
        Ok(RawIndicators {
            rsi: Self::draw(&mut rng, self.bands.rsi),
            macd: Self::draw(&mut rng, self.bands.macd),
            moving_average: Self::draw(&mut rng, self.bands.moving_average),
        })
    }
}
