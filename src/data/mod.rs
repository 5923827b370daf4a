// Indicator feeds behind a single polling interface
pub mod indicator_source;
pub mod random_source;
pub mod replay_source;

// Re-export commonly used types
pub use indicator_source::{FeedError, IndicatorSource, poll_with_timeout};
pub use random_source::RandomIndicatorSource;
pub use replay_source::{ReplayIndicatorSource, ReplayStep};
