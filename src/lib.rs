//! # polypdf
//!
//! Turns declaratively described documents into PDFs through a pluggable
//! layout engine.
//!
//! Framework adapters mount an attribute tree into a [`SourceTree`]; values
//! that are not strings travel through the document's [`Registry`]. The
//! generation pipeline converts the tree, renders it, and regenerates when the
//! tree changes. Documents that show pagination data ("page 2 of 5") get a
//! second pass once layout has produced that data.

pub mod adapter;
pub mod blob;
pub mod error;
pub mod pipeline;

pub use polypdf_core as core;
pub use polypdf_idf as idf;
pub use polypdf_registry as registry;
pub use polypdf_render_core as render;
pub use polypdf_types as types;

pub use adapter::{ComponentSpec, MountedDocument};
pub use blob::{BlobProvider, BlobState};
pub use error::PipelineError;
pub use pipeline::{
    generate_pdf, CycleState, CycleStatus, GenerationHandle, GenerationHooks, GeneratorBuilder,
    PdfGenerator, MAX_PASSES,
};

pub use polypdf_core::{SourceTree, WeakSourceTree};
pub use polypdf_registry::{Registry, RegistryValue};
pub use polypdf_render_core::{Artifact, DocumentMetadata, LayoutEngine, MetadataDefaults, RenderError};
pub use polypdf_render_lopdf::LopdfEngine;
