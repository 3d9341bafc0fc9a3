//! Error types for tree conversion.

use polypdf_types::{NodeKind, RegistryKey};
use thiserror::Error;

/// The tree handed to the bridge is not rooted at a DOCUMENT node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("root element must be a document, found {}", .found.as_deref().unwrap_or("an untagged node"))]
pub struct StructuralError {
    pub found: Option<String>,
}

/// A node inside the document could not be converted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("{kind} node references '{key}', which holds a {found} where {expected} was expected")]
    UnexpectedEntry {
        key: RegistryKey,
        kind: NodeKind,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{kind} node references '{key}', which is not in the registry")]
    MissingEntry { key: RegistryKey, kind: NodeKind },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
