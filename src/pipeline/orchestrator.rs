// src/pipeline/orchestrator.rs
use super::config::{CycleState, CycleStatus, GenerationHooks};
use super::handle::GenerationHandle;
use crate::error::PipelineError;
use log::{debug, info, warn};
use polypdf_core::{check_root, to_document, ConvertOptions, SourceTree};
use polypdf_render_core::{Artifact, DocumentMetadata, LayoutEngine, MetadataDefaults};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Passes per cycle. A dynamic document gets exactly one more pass after
/// layout has reported pagination data; the values are taken as stable then.
pub const MAX_PASSES: u8 = 2;

/// Everything a generation loop needs, owned by its task.
pub(crate) struct Orchestrator {
    source: SourceTree,
    engine: Arc<dyn LayoutEngine>,
    hooks: GenerationHooks,
    options: ConvertOptions,
    metadata_defaults: MetadataDefaults,
    status: watch::Sender<CycleStatus>,
    disposed: Arc<AtomicBool>,
}

impl Orchestrator {
    /// Validates the root, then starts the generation loop on the current
    /// tokio runtime.
    pub(crate) fn start(
        source: &SourceTree,
        engine: Arc<dyn LayoutEngine>,
        hooks: GenerationHooks,
        options: ConvertOptions,
        metadata_defaults: MetadataDefaults,
    ) -> Result<GenerationHandle, PipelineError> {
        source.read(check_root)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            PipelineError::Config(format!("generation must be started inside a tokio runtime: {}", e))
        })?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (status_tx, status_rx) = watch::channel(CycleStatus::default());
        let disposed = Arc::new(AtomicBool::new(false));
        let changes = source.subscribe();

        let orchestrator = Orchestrator {
            source: source.clone(),
            engine,
            hooks,
            options,
            metadata_defaults,
            status: status_tx,
            disposed: Arc::clone(&disposed),
        };
        runtime.spawn(orchestrator.run(changes, shutdown_rx));

        Ok(GenerationHandle::new(source.clone(), shutdown_tx, disposed, status_rx))
    }

    /// Runs one cycle, then one more per observed change, until shut down.
    ///
    /// Changes that arrive while a cycle is in flight stay pending on the
    /// receiver and are picked up together once the cycle settles.
    async fn run(self, mut changes: watch::Receiver<u64>, mut shutdown: watch::Receiver<bool>) {
        let mut cycle = 0;
        loop {
            if *shutdown.borrow() {
                break;
            }
            let epoch = *changes.borrow_and_update();
            cycle += 1;
            self.run_cycle(cycle, epoch).await;

            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    debug!("Source tree changed (epoch {}), regenerating.", *changes.borrow());
                }
            }
        }
        info!("Generation loop stopped after {} cycle(s).", cycle);
    }

    async fn run_cycle(&self, cycle: u64, epoch: u64) {
        info!("Generation cycle {} started at epoch {}.", cycle, epoch);
        for pass in 1..=MAX_PASSES {
            match self.run_pass(cycle, epoch, pass).await {
                Ok(true) if pass < MAX_PASSES => {
                    debug!("Document depends on pagination data, running pass {}.", pass + 1);
                }
                Ok(_) => break,
                Err(e) => {
                    warn!("Generation cycle {} failed in pass {}: {}", cycle, pass, e);
                    self.deliver(|hooks| hooks.error(e));
                    self.publish(cycle, epoch, CycleState::Failed);
                    return;
                }
            }
        }
        self.publish(cycle, epoch, CycleState::Done);
        info!("Generation cycle {} finished.", cycle);
    }

    /// One convert-then-render pass. Returns whether the converted document
    /// depends on pagination data.
    async fn run_pass(&self, cycle: u64, epoch: u64, pass: u8) -> Result<bool, PipelineError> {
        self.deliver(GenerationHooks::start);

        self.publish(cycle, epoch, CycleState::Converting { pass });
        let conversion = self
            .source
            .read(|root| to_document(root, self.source.registry(), self.options))?;
        let dynamic = conversion.is_dynamic();
        let metadata = DocumentMetadata::from_document(&conversion.document, &self.metadata_defaults);

        self.publish(cycle, epoch, CycleState::Rendering { pass });
        let engine = Arc::clone(&self.engine);
        let document = conversion.document;
        debug!(
            "Pass {}: rendering with the {} engine ({} dynamic node(s)).",
            pass,
            engine.name(),
            conversion.dependencies.len()
        );
        let artifact = tokio::task::spawn_blocking(move || {
            engine.render(&document, &metadata).and_then(Artifact::collect)
        })
        .await
        .map_err(|e| PipelineError::Other(format!("engine task failed: {}", e)))??;

        debug!("Pass {} produced {} bytes.", pass, artifact.len());
        self.deliver(|hooks| hooks.blob(artifact));
        Ok(dynamic)
    }

    fn deliver(&self, f: impl FnOnce(&GenerationHooks)) {
        if self.disposed.load(Ordering::Acquire) {
            warn!("Dropping hook delivery for a disposed generation handle.");
            return;
        }
        f(&self.hooks);
    }

    fn publish(&self, cycle: u64, epoch: u64, state: CycleState) {
        self.status.send_replace(CycleStatus { cycle, epoch, state });
    }
}
