//! Configuration module for the analysis engine.

pub mod analysis;
pub mod policy;

mod debug; // Private: files use crate::config::DEBUG_FLAGS, not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig, INDICATOR_BANDS, IndicatorBands};
pub use policy::{TimeframePolicy, ZoneOffset, policy_for};
