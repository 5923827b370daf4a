use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

use super::worker::EngineHandle;

/// Periodic refresh driver that sits outside the engine.
///
/// Each tick sends a refresh request down the worker queue. A tick that finds
/// the queue full is dropped rather than piling up behind a slow poll.
pub struct RefreshScheduler {
    handle: EngineHandle,
    period: Duration,
}

impl RefreshScheduler {
    pub fn new(handle: EngineHandle, period: Duration) -> Self {
        Self { handle, period }
    }

    /// Start ticking on a tokio task. Stops by itself once the worker is gone;
    /// abort the returned handle to stop it earlier.
    pub fn spawn(self) -> JoinHandle<u64> {
        tokio::spawn(self.run())
    }

    /// Returns the number of ticks delivered.
    async fn run(self) -> u64 {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick fires immediately; the engine computed on startup
        ticker.tick().await;

        let mut delivered = 0u64;
        loop {
            ticker.tick().await;

            if self.handle.is_closed() {
                log::info!("Refresh scheduler stopping: engine worker is gone");
                break;
            }

            if self.handle.request_refresh() {
                delivered += 1;
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_scheduler_ticks {
                    log::info!("[scheduler] tick {} delivered", delivered);
                }
            } else {
                log::warn!("Refresh tick dropped: engine queue is full");
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RandomIndicatorSource;
    use crate::engine::{EngineSettings, MarketAnalysisEngine, spawn_engine_worker};
    use std::sync::Arc;

    #[tokio::test]
    async fn ticks_drive_refreshes() {
        let source = Arc::new(RandomIndicatorSource::seeded(5));
        let engine = MarketAnalysisEngine::start(source, EngineSettings::default())
            .await
            .unwrap();
        let (handle, _task) = spawn_engine_worker(engine, 4);
        let mut rx = handle.subscribe();
        let _ = rx.borrow_and_update();

        let scheduler = RefreshScheduler::new(handle.clone(), Duration::from_millis(20)).spawn();

        // Wait for a few published refreshes
        for _ in 0..3 {
            tokio::time::timeout(Duration::from_secs(2), rx.changed())
                .await
                .expect("scheduler never refreshed")
                .unwrap();
        }
        assert!(handle.current_snapshot().revision >= 4);

        handle.shutdown().await.unwrap();
        let delivered = tokio::time::timeout(Duration::from_secs(2), scheduler)
            .await
            .expect("scheduler did not stop")
            .unwrap();
        assert!(delivered >= 3);
    }
}
