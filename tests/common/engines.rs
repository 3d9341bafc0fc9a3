use polypdf::idf::DocumentNode;
use polypdf::render::ByteStream;
use polypdf::{DocumentMetadata, LayoutEngine, LopdfEngine, RenderError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use tokio::sync::oneshot;

/// Test side of a gated engine: learn when the engine is busy, then let it go.
pub struct Gate {
    pub entered: oneshot::Receiver<()>,
    pub release: mpsc::Sender<()>,
}

/// Wraps the built-in engine with call counting, injected failures and an
/// optional one-shot gate that holds the first render until released.
pub struct TestEngine {
    inner: LopdfEngine,
    calls: AtomicUsize,
    failing: AtomicBool,
    gate: Mutex<Option<(oneshot::Sender<()>, mpsc::Receiver<()>)>>,
}

impl TestEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: LopdfEngine::new().with_compression(false),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            gate: Mutex::new(None),
        })
    }

    pub fn gated() -> (Arc<Self>, Gate) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let engine = Self::new();
        *engine.gate.lock().unwrap() = Some((entered_tx, release_rx));
        (
            engine,
            Gate {
                entered: entered_rx,
                release: release_tx,
            },
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl LayoutEngine for TestEngine {
    fn render(&self, document: &DocumentNode, metadata: &DocumentMetadata) -> Result<ByteStream, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().take();
        if let Some((entered, release)) = gate {
            let _ = entered.send(());
            let _ = release.recv();
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(RenderError::Layout("injected failure".to_string()));
        }
        self.inner.render(document, metadata)
    }

    fn name(&self) -> &'static str {
        "test"
    }
}
