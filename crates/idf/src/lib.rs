//! Intermediate tree formats
//!
//! Three trees meet at the bridge:
//! - [`AttributeNode`]: what framework adapters mount. Attributes only; every
//!   non-string value lives in the registry and is referenced by key.
//! - [`DocumentNode`]: what the bridge hands to the layout engine, with props
//!   and styles resolved and render functions attached to dynamic nodes.
//! - [`Element`]: the adapter-native shape a render function yields back to
//!   the engine.

mod attribute;
mod document;
mod element;

pub use attribute::AttributeNode;
pub use document::{DocumentNode, ElementNode, NodeProps, RenderFn};
pub use element::Element;

pub use polypdf_types::{NodeKind, PaginationInfo, RegistryKey};

/// A plain, string-keyed prop map as written by adapters.
pub type PropMap = serde_json::Map<String, serde_json::Value>;

/// Style objects share the prop map representation.
pub type Style = PropMap;
