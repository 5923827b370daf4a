// Domain types and value objects
pub mod timeframe;

// Re-export commonly used types
pub use timeframe::{Timeframe, UnknownTimeframe};
