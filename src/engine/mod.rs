pub mod core;
pub mod error;
pub mod messages;
pub mod scheduler;
pub mod settings;
pub mod state;
pub mod worker;

// Re-export key components
pub use self::core::{CompletedPoll, MarketAnalysisEngine, PendingPoll};
pub use error::EngineError;
pub use messages::{EngineCommand, RefreshOutcome};
pub use scheduler::RefreshScheduler;
pub use settings::EngineSettings;
pub use state::AnalysisState;
pub use worker::{EngineHandle, spawn_engine_worker};
