// src/pipeline/builder.rs
use super::config::GenerationHooks;
use super::handle::GenerationHandle;
use super::orchestrator::Orchestrator;
use crate::error::PipelineError;
use polypdf_core::{ConvertOptions, SourceTree};
use polypdf_render_core::{LayoutEngine, MetadataDefaults};
use polypdf_render_lopdf::LopdfEngine;
use std::sync::Arc;

/// A builder for creating a [`PdfGenerator`].
#[derive(Default)]
pub struct GeneratorBuilder {
    engine: Option<Arc<dyn LayoutEngine>>,
    compression: Option<bool>,
    hooks: GenerationHooks,
    metadata_defaults: MetadataDefaults,
    convert_options: ConvertOptions,
}

impl GeneratorBuilder {
    /// Creates a builder that renders with the built-in lopdf engine.
    pub fn new() -> Self {
        Default::default()
    }

    /// Renders with a custom engine instead of the built-in one.
    pub fn with_engine(self, engine: impl LayoutEngine + 'static) -> Self {
        self.with_shared_engine(Arc::new(engine))
    }

    /// Renders with an engine shared with other generators.
    pub fn with_shared_engine(mut self, engine: Arc<dyn LayoutEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Compresses content streams of the built-in engine.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compression = Some(compress);
        self
    }

    pub fn with_hooks(mut self, hooks: GenerationHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Values used for document metadata the DOCUMENT node leaves out.
    pub fn with_metadata_defaults(mut self, defaults: MetadataDefaults) -> Self {
        self.metadata_defaults = defaults;
        self
    }

    /// Fails a cycle when a props or style key has no registry entry.
    pub fn with_strict_keys(mut self, strict: bool) -> Self {
        self.convert_options.strict_keys = strict;
        self
    }

    pub fn build(self) -> Result<PdfGenerator, PipelineError> {
        let engine = match (self.engine, self.compression) {
            (Some(_), Some(_)) => {
                return Err(PipelineError::Config(
                    "compression can only be configured for the built-in engine".to_string(),
                ));
            }
            (Some(engine), None) => engine,
            (None, compression) => {
                let engine = LopdfEngine::new().with_compression(compression.unwrap_or(true));
                Arc::new(engine) as Arc<dyn LayoutEngine>
            }
        };
        log::debug!("Building generator with the {} engine.", engine.name());

        Ok(PdfGenerator {
            engine,
            hooks: self.hooks,
            metadata_defaults: self.metadata_defaults,
            convert_options: self.convert_options,
        })
    }
}

/// A configured generator, ready to attach to one source tree.
pub struct PdfGenerator {
    engine: Arc<dyn LayoutEngine>,
    hooks: GenerationHooks,
    metadata_defaults: MetadataDefaults,
    convert_options: ConvertOptions,
}

impl PdfGenerator {
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Starts generating `source`: one cycle right away, then one per change.
    ///
    /// Fails immediately, before the engine is involved, if the root is not a
    /// DOCUMENT node or no tokio runtime is running. Every later failure is
    /// reported through the error hook.
    pub fn generate(self, source: &SourceTree) -> Result<GenerationHandle, PipelineError> {
        Orchestrator::start(
            source,
            self.engine,
            self.hooks,
            self.convert_options,
            self.metadata_defaults,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polypdf_core::idf::AttributeNode;
    use polypdf_core::registry::Registry;

    #[test]
    fn compression_with_custom_engine_is_rejected() {
        let result = GeneratorBuilder::new()
            .with_engine(LopdfEngine::new())
            .with_compression(false)
            .build();
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn defaults_to_lopdf_engine() {
        let generator = GeneratorBuilder::new().build().unwrap();
        assert_eq!(generator.engine_name(), "lopdf");
    }

    #[test]
    fn generate_outside_runtime_is_a_config_error() {
        let source = SourceTree::new(AttributeNode::new("DOCUMENT"), Arc::new(Registry::new()));
        let result = GeneratorBuilder::new().build().unwrap().generate(&source);
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn non_document_root_fails_before_runtime_check() {
        let source = SourceTree::new(AttributeNode::new("VIEW"), Arc::new(Registry::new()));
        let result = GeneratorBuilder::new().build().unwrap().generate(&source);
        assert!(matches!(result, Err(PipelineError::Structural(_))));
    }
}
