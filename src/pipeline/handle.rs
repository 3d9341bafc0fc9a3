use super::config::CycleStatus;
use log::info;
use polypdf_core::SourceTree;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// The caller's side of a running generation loop.
///
/// Dropping the handle disposes it.
pub struct GenerationHandle {
    source: SourceTree,
    shutdown: watch::Sender<bool>,
    disposed: Arc<AtomicBool>,
    status: watch::Receiver<CycleStatus>,
}

impl GenerationHandle {
    pub(crate) fn new(
        source: SourceTree,
        shutdown: watch::Sender<bool>,
        disposed: Arc<AtomicBool>,
        status: watch::Receiver<CycleStatus>,
    ) -> Self {
        Self {
            source,
            shutdown,
            disposed,
            status,
        }
    }

    /// Stops reacting to source changes.
    ///
    /// A pass already handed to the engine runs to completion, but nothing it
    /// produces reaches the hooks. Calling this more than once is harmless.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            info!("Generation handle disposed.");
            self.shutdown.send_replace(true);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub fn status(&self) -> CycleStatus {
        *self.status.borrow()
    }

    /// Waits until a cycle has settled after seeing every change made to the
    /// source so far. Returns early with the last status if the loop stops.
    pub async fn wait_settled(&self) -> CycleStatus {
        let mut rx = self.status.clone();
        let source = &self.source;
        let settled = rx
            .wait_for(|status| status.state.is_settled() && status.epoch >= source.epoch())
            .await
            .map(|status| *status);
        settled.unwrap_or_else(|_| *self.status.borrow())
    }

    /// Waits until cycle `cycle` has settled or a later one has started.
    pub async fn wait_for_cycle(&self, cycle: u64) -> CycleStatus {
        let mut rx = self.status.clone();
        let reached = rx
            .wait_for(|status| status.cycle > cycle || (status.cycle == cycle && status.state.is_settled()))
            .await
            .map(|status| *status);
        reached.unwrap_or_else(|_| *self.status.borrow())
    }
}

impl Drop for GenerationHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for GenerationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationHandle")
            .field("status", &self.status())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
