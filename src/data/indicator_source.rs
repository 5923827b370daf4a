use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::RawIndicators;

/// Why a poll produced no reading
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("indicator feed unavailable: {0}")]
    Unavailable(String),

    #[error("indicator poll timed out after {0:?}")]
    TimedOut(Duration),

    #[error("replay feed has no readings left")]
    Exhausted,
}

/// Anything that can produce a fresh set of indicator values.
///
/// The engine only ever talks to this trait. A poll either yields every value
/// or fails as a whole; there are no partial readings.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn poll(&self) -> Result<RawIndicators, FeedError>;
}

/// Poll `source`, giving up after `timeout`.
pub async fn poll_with_timeout(
    source: &dyn IndicatorSource,
    timeout: Duration,
) -> Result<RawIndicators, FeedError> {
    match tokio::time::timeout(timeout, source.poll()).await {
        Ok(result) => result,
        Err(_) => Err(FeedError::TimedOut(timeout)),
    }
}
