//! Document generation orchestration.
//!
//! - [`generate_pdf`]: attach the built-in engine to a source tree
//! - [`GeneratorBuilder`]: choose the engine, hooks and metadata defaults
//! - [`GenerationHandle`]: observe or stop a running generation loop
//!
//! A cycle converts the source tree and renders it. If any node depends on
//! pagination data, the cycle runs a second pass once the engine has reported
//! that data, and delivers both documents in order. Each external change to
//! the source tree schedules one more cycle after the current one settles.
//!
//! # Example
//!
//! ```ignore
//! use polypdf::{generate_pdf, GenerationHooks};
//!
//! let handle = generate_pdf(&source, GenerationHooks::new().on_blob(|pdf| save(pdf)))?;
//! handle.wait_settled().await;
//! ```

mod builder;
pub mod config;
mod handle;
mod orchestrator;

pub use builder::{GeneratorBuilder, PdfGenerator};
pub use config::{CycleState, CycleStatus, GenerationHooks};
pub use handle::GenerationHandle;
pub use orchestrator::MAX_PASSES;

use crate::error::PipelineError;
use polypdf_core::SourceTree;

/// Generates `source` with the built-in lopdf engine and default settings.
pub fn generate_pdf(source: &SourceTree, hooks: GenerationHooks) -> Result<GenerationHandle, PipelineError> {
    GeneratorBuilder::new().with_hooks(hooks).build()?.generate(source)
}
