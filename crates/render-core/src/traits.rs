use crate::error::RenderError;
use crate::metadata::DocumentMetadata;
use crate::types::ByteStream;
use polypdf_idf::DocumentNode;

/// The external layout/render collaborator.
///
/// Given a document tree rooted at a DOCUMENT node, lays it out and produces
/// the serialized document as a stream of byte chunks. While laying out a node
/// that carries a render function, the engine must call it with that node's
/// pagination data and draw the returned elements in place of its children.
///
/// Engines are synchronous; the orchestrator runs them off the async executor.
pub trait LayoutEngine: Send + Sync {
    fn render(
        &self,
        document: &DocumentNode,
        metadata: &DocumentMetadata,
    ) -> Result<ByteStream, RenderError>;

    /// Returns a human-readable name for this engine (for logging/debugging).
    fn name(&self) -> &'static str;
}
