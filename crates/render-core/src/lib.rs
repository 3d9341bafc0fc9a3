//! Core rendering abstractions for PDF generation.
//!
//! This crate provides the contract between the bridge and a layout/render
//! engine:
//! - `LayoutEngine` trait: document tree + metadata in, byte stream out
//! - `Artifact`: the assembled binary result of one generation pass
//! - `DocumentMetadata`: document info extracted from the DOCUMENT node's props
//! - Error types for rendering operations

mod error;
mod metadata;
mod traits;
mod types;

pub use error::RenderError;
pub use metadata::{DocumentMetadata, MetadataDefaults};
pub use traits::LayoutEngine;
pub use types::{Artifact, ByteStream, SharedData, PDF_CONTENT_TYPE};
