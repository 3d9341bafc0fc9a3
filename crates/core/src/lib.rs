//! # polypdf-core
//!
//! The document bridge core:
//! - **convert**: turns a mounted attribute tree into a typed document tree and
//!   reports which nodes depend on pagination data
//! - **source**: the observable source tree adapters write into, with a
//!   generation epoch that only external writes advance
//! - **error**: structural and conversion errors
//!
//! ## Design Principle
//!
//! This crate has **no runtime dependencies**:
//! - No async runtime (only `tokio::sync::watch` for change notification)
//! - No layout or rendering
//!
//! Driving generation passes is the orchestrator's job.

pub use polypdf_idf as idf;
pub use polypdf_registry as registry;
pub use polypdf_types as types;

pub mod convert;
pub mod error;
pub mod source;

pub use convert::{check_root, to_document, Conversion, ConvertOptions, PaginationDependency};
pub use error::{ConversionError, ConvertError, StructuralError};
pub use source::{bridge_write, in_bridge_write, SourceTree, WeakSourceTree};
