//! Keeps the latest generated document around for consumers that poll
//! rather than react to hooks.

use crate::error::PipelineError;
use crate::pipeline::GenerationHooks;
use log::info;
use polypdf_render_core::Artifact;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

/// What a consumer knows about a document at a point in time.
#[derive(Debug, Clone, Default)]
pub struct BlobState {
    /// The most recent successfully generated document.
    pub blob: Option<Artifact>,
    pub loading: bool,
    /// Error of the most recent cycle, cleared by the next delivered blob.
    pub error: Option<Arc<PipelineError>>,
    /// Number of blobs delivered so far.
    pub deliveries: usize,
}

/// Tracks generation progress in a [`BlobState`].
#[derive(Clone)]
pub struct BlobProvider {
    state: Arc<watch::Sender<BlobState>>,
}

impl Default for BlobProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobProvider {
    pub fn new() -> Self {
        let (state, _) = watch::channel(BlobState::default());
        Self { state: Arc::new(state) }
    }

    /// Hooks that keep this provider's state current.
    pub fn hooks(&self) -> GenerationHooks {
        let on_start = Arc::clone(&self.state);
        let on_blob = Arc::clone(&self.state);
        let on_error = Arc::clone(&self.state);
        GenerationHooks::new()
            .on_start(move || on_start.send_modify(|state| state.loading = true))
            .on_blob(move |artifact| {
                on_blob.send_modify(|state| {
                    state.blob = Some(artifact);
                    state.loading = false;
                    state.error = None;
                    state.deliveries += 1;
                })
            })
            .on_error(move |error| {
                on_error.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(Arc::new(error));
                })
            })
    }

    pub fn state(&self) -> BlobState {
        self.state.borrow().clone()
    }

    pub fn blob(&self) -> Option<Artifact> {
        self.state.borrow().blob.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BlobState> {
        self.state.subscribe()
    }

    /// Writes the current document to `path`.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        let path = path.as_ref();
        let blob = self
            .blob()
            .ok_or_else(|| PipelineError::Other("no document has been generated yet".to_string()))?;
        std::fs::write(path, blob.bytes())?;
        info!("Saved {} bytes to {}", blob.len(), path.display());
        Ok(())
    }
}
