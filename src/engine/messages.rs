use std::sync::Arc;
use tokio::sync::oneshot;

use crate::data::FeedError;
use crate::models::AnalysisSnapshot;

use super::error::EngineError;

/// A request to the engine worker
#[derive(Debug)]
pub enum EngineCommand {
    Select {
        code: String,
        reply: oneshot::Sender<Result<Arc<AnalysisSnapshot>, EngineError>>,
    },
    /// Scheduler ticks carry no reply channel.
    Refresh {
        reply: Option<oneshot::Sender<RefreshOutcome>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// What a refresh did to the published snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Fresh readings were applied.
    Applied { revision: u64 },
    /// The poll failed; the previous readings were kept.
    Retained { revision: u64, error: FeedError },
    /// A timeframe change overtook the poll; nothing from it was applied.
    Cancelled,
}

impl RefreshOutcome {
    pub fn revision(&self) -> Option<u64> {
        match self {
            RefreshOutcome::Applied { revision } | RefreshOutcome::Retained { revision, .. } => {
                Some(*revision)
            }
            RefreshOutcome::Cancelled => None,
        }
    }
}
