use crate::error::PipelineError;
use polypdf_render_core::Artifact;
use std::fmt;

type StartHook = Box<dyn Fn() + Send + Sync>;
type BlobHook = Box<dyn Fn(Artifact) + Send + Sync>;
type ErrorHook = Box<dyn Fn(PipelineError) + Send + Sync>;

/// Callbacks through which a generation handle reports progress.
///
/// All hooks are optional. They run on the orchestrator's task, never
/// concurrently with each other for the same handle.
#[derive(Default)]
pub struct GenerationHooks {
    on_start: Option<StartHook>,
    on_blob: Option<BlobHook>,
    on_error: Option<ErrorHook>,
}

impl GenerationHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called before every generation pass.
    pub fn on_start(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_start = Some(Box::new(hook));
        self
    }

    /// Called with each finished document, in pass order.
    pub fn on_blob(mut self, hook: impl Fn(Artifact) + Send + Sync + 'static) -> Self {
        self.on_blob = Some(Box::new(hook));
        self
    }

    /// Called when a cycle fails. The cycle delivers no document.
    pub fn on_error(mut self, hook: impl Fn(PipelineError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    pub(crate) fn start(&self) {
        if let Some(hook) = &self.on_start {
            hook();
        }
    }

    pub(crate) fn blob(&self, artifact: Artifact) {
        if let Some(hook) = &self.on_blob {
            hook(artifact);
        }
    }

    pub(crate) fn error(&self, error: PipelineError) {
        match &self.on_error {
            Some(hook) => hook(error),
            None => log::error!("Generation failed with no error hook installed: {}", error),
        }
    }
}

impl fmt::Debug for GenerationHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationHooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_blob", &self.on_blob.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// The phase a generation cycle is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CycleState {
    /// No cycle has run yet.
    #[default]
    Idle,
    Converting { pass: u8 },
    Rendering { pass: u8 },
    Done,
    Failed,
}

impl CycleState {
    /// Whether the cycle has finished, successfully or not.
    pub fn is_settled(self) -> bool {
        matches!(self, CycleState::Done | CycleState::Failed)
    }
}

/// Snapshot of a handle's progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStatus {
    /// 1-based number of the current or most recent cycle; 0 before the first.
    pub cycle: u64,
    /// Source epoch captured when the cycle started.
    pub epoch: u64,
    pub state: CycleState,
}
