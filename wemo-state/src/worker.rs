//! Background poll worker
//!
//! One persistent thread runs discovery and polling cycles. Heartbeats are
//! fed through a channel with room for a single pending tick, so ticks that
//! arrive while a cycle is running collapse into one follow-up cycle.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::engine::EngineCore;
use crate::{Result, StateError};

const WORKER_THREAD_NAME: &str = "wemo-poll";

/// Handle to the running poll worker
pub(crate) struct PollWorker {
    tick_tx: Option<SyncSender<()>>,
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl PollWorker {
    /// Queue a cycle. Returns `Ok(false)` when one is already pending.
    pub fn tick(&self) -> Result<bool> {
        let tx = self.tick_tx.as_ref().ok_or(StateError::WorkerStopped)?;
        match tx.try_send(()) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(())) => {
                tracing::debug!("Poll cycle already pending, heartbeat skipped");
                Ok(false)
            }
            Err(TrySendError::Disconnected(())) => Err(StateError::WorkerStopped),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Stop accepting ticks and wait for an in-flight cycle to finish
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.tick_tx.take();

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Poll worker thread panicked");
            }
        }
    }
}

impl Drop for PollWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawns the poll worker thread
pub(crate) fn spawn_poll_worker(core: Arc<EngineCore>) -> Result<PollWorker> {
    let (tick_tx, tick_rx) = mpsc::sync_channel(1);
    let shutdown = Arc::new(AtomicBool::new(false));

    let handle = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn({
            let shutdown = Arc::clone(&shutdown);
            move || run_worker(core, tick_rx, shutdown)
        })?;

    Ok(PollWorker {
        tick_tx: Some(tick_tx),
        handle: Some(handle),
        shutdown,
    })
}

fn run_worker(core: Arc<EngineCore>, ticks: Receiver<()>, shutdown: Arc<AtomicBool>) {
    tracing::info!("Poll worker started");

    for () in ticks.iter() {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        match catch_unwind(AssertUnwindSafe(|| core.run_cycle())) {
            Ok(report) => tracing::debug!(
                "Cycle done: {} discovered, {} nodes polled",
                report.discovered,
                report.outcomes.len()
            ),
            Err(payload) => {
                tracing::error!("Poll cycle panicked: {}", panic_message(payload.as_ref()))
            }
        }
    }

    tracing::info!("Poll worker stopped");
}

/// Text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
