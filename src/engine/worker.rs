use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::models::AnalysisSnapshot;

use super::core::MarketAnalysisEngine;
use super::error::EngineError;
use super::messages::{EngineCommand, RefreshOutcome};

/// Cheap, cloneable front door to an engine running on its own task.
///
/// Every `select` / `refresh` goes through one queue, so computations never
/// overlap. Snapshots are read from a watch channel and never wait on the
/// worker.
#[derive(Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<EngineCommand>,
    snapshots: watch::Receiver<Arc<AnalysisSnapshot>>,
}

/// Move `engine` onto a tokio task and return a handle to it.
pub fn spawn_engine_worker(
    engine: MarketAnalysisEngine,
    capacity: usize,
) -> (EngineHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel::<EngineCommand>(capacity.max(1));
    let snapshots = engine.subscribe();

    let task = tokio::spawn(run_worker(engine, rx));

    (
        EngineHandle {
            commands: tx,
            snapshots,
        },
        task,
    )
}

impl EngineHandle {
    pub async fn select(&self, code: &str) -> Result<Arc<AnalysisSnapshot>, EngineError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(EngineCommand::Select {
                code: code.to_string(),
                reply,
            })
            .await
            .map_err(|_| EngineError::WorkerStopped)?;
        response.await.map_err(|_| EngineError::WorkerStopped)?
    }

    /// Queue a refresh and wait for its outcome.
    pub async fn refresh(&self) -> Result<RefreshOutcome, EngineError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(EngineCommand::Refresh { reply: Some(reply) })
            .await
            .map_err(|_| EngineError::WorkerStopped)?;
        response.await.map_err(|_| EngineError::WorkerStopped)
    }

    /// Fire-and-forget refresh. Returns false if the tick was dropped because
    /// the queue is full or the worker is gone.
    pub fn request_refresh(&self) -> bool {
        self.commands
            .try_send(EngineCommand::Refresh { reply: None })
            .is_ok()
    }

    pub fn current_snapshot(&self) -> Arc<AnalysisSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<AnalysisSnapshot>> {
        self.snapshots.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Stop the worker once the commands queued ahead of this one are done.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(EngineCommand::Shutdown { reply })
            .await
            .map_err(|_| EngineError::WorkerStopped)?;
        response.await.map_err(|_| EngineError::WorkerStopped)
    }
}

async fn run_worker(mut engine: MarketAnalysisEngine, mut rx: mpsc::Receiver<EngineCommand>) {
    // A command that arrived mid-poll and must run next
    let mut deferred: Option<EngineCommand> = None;

    loop {
        let command = match deferred.take() {
            Some(command) => command,
            None => match rx.recv().await {
                Some(command) => command,
                None => break, // Every handle dropped
            },
        };

        match command {
            EngineCommand::Select { code, reply } => {
                let _ = reply.send(engine.select(&code));
            }
            EngineCommand::Refresh { reply } => {
                let mut waiters: Vec<oneshot::Sender<RefreshOutcome>> =
                    reply.into_iter().collect();

                let poll = engine.begin_refresh().run();
                tokio::pin!(poll);

                // Race the poll against the queue. Further refreshes fold into
                // this one; anything else cancels it and runs next.
                let outcome = loop {
                    tokio::select! {
                        completed = &mut poll => break engine.finish_refresh(completed),
                        next = rx.recv() => match next {
                            Some(EngineCommand::Refresh { reply }) => waiters.extend(reply),
                            Some(other) => {
                                log::info!("Indicator poll cancelled by a queued command");
                                deferred = Some(other);
                                break RefreshOutcome::Cancelled;
                            }
                            None => break RefreshOutcome::Cancelled,
                        },
                    }
                };

                for waiter in waiters {
                    let _ = waiter.send(outcome.clone());
                }
            }
            EngineCommand::Shutdown { reply } => {
                let _ = reply.send(());
                break;
            }
        }
    }

    log::info!("Engine worker stopped");
}
