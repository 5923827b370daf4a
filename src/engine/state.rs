use std::sync::Arc;

use crate::models::AnalysisSnapshot;

/// Mutable bookkeeping owned by the engine.
#[derive(Debug, Clone)]
pub struct AnalysisState {
    /// THE FRONT BUFFER.
    /// Observers clone this Arc. It is never mutated in place: a finished
    /// computation replaces the pointer.
    pub snapshot: Arc<AnalysisSnapshot>,

    /// Failed polls since the last good one
    pub consecutive_failures: u32,

    /// Bumped on every timeframe selection. A poll started under an older
    /// generation must not be applied.
    pub selection_generation: u64,
}

impl AnalysisState {
    pub fn new(snapshot: Arc<AnalysisSnapshot>) -> Self {
        Self {
            snapshot,
            consecutive_failures: 0,
            selection_generation: 0,
        }
    }

    pub fn next_revision(&self) -> u64 {
        self.snapshot.revision + 1
    }

    /// The "Swap" operation.
    pub fn update_buffer(&mut self, snapshot: Arc<AnalysisSnapshot>) {
        self.snapshot = snapshot;
    }

    pub fn record_poll_success(&mut self) {
        self.consecutive_failures = 0;
    }

    pub fn record_poll_failure(&mut self) {
        self.consecutive_failures += 1;
    }
}
