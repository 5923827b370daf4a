use thiserror::Error;

use crate::domain::UnknownTimeframe;

/// Failures a caller of the engine can act on. Feed problems are not here:
/// they are absorbed by retaining the last good reading.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid timeframe: {0}")]
    InvalidTimeframe(#[from] UnknownTimeframe),

    #[error("reference price {0} cannot hold every support zone above zero")]
    InvalidReferencePrice(f64),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("engine worker has stopped")]
    WorkerStopped,
}
