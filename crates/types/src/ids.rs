//! Newtype wrappers for registry keys and component identities
//!
//! Attribute trees can only carry strings, so everything a component wants to
//! hand to the bridge is parked in the registry under a `RegistryKey`. Keys are
//! derived from a `ComponentId` so two mounted components can never collide.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A key into the side-channel registry.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryKey(Arc<str>);

impl RegistryKey {
    /// Creates a new RegistryKey from a string
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Returns the string representation of this key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RegistryKey {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for RegistryKey {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<Arc<str>> for RegistryKey {
    fn from(s: Arc<str>) -> Self {
        Self(s)
    }
}

impl AsRef<str> for RegistryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity of one mounted component instance.
///
/// Allocated from a monotonically increasing counter owned by the registry,
/// so the keys derived from it are unique for the registry's lifetime.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Key under which the component's plain props are stored.
    pub fn props_key(self) -> RegistryKey {
        RegistryKey::from(format!("node-{}-props", self.0))
    }

    /// Key under which the component's style object is stored.
    pub fn style_key(self) -> RegistryKey {
        RegistryKey::from(format!("node-{}-style", self.0))
    }

    /// Key under which the component's pagination-update callback is stored.
    pub fn render_key(self) -> RegistryKey {
        RegistryKey::from(format!("node-{}-render", self.0))
    }

    /// All keys this component may own, for cleanup on unmount.
    pub fn keys(self) -> [RegistryKey; 3] {
        [self.props_key(), self.style_key(), self.render_key()]
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_key_creation() {
        let k1 = RegistryKey::new("node-1-props");
        let k2 = RegistryKey::from("node-1-props");
        let k3 = RegistryKey::from(String::from("node-1-props"));

        assert_eq!(k1, k2);
        assert_eq!(k2, k3);
        assert_eq!(k1.as_str(), "node-1-props");
    }

    #[test]
    fn test_component_keys_are_namespaced() {
        let id = ComponentId::new(7);
        assert_eq!(id.props_key().as_str(), "node-7-props");
        assert_eq!(id.style_key().as_str(), "node-7-style");
        assert_eq!(id.render_key().as_str(), "node-7-render");
        assert_ne!(id.props_key(), ComponentId::new(70).props_key());
    }

    #[test]
    fn test_hash_map_usage() {
        use std::collections::HashMap;

        let mut entries = HashMap::new();
        entries.insert(RegistryKey::new("a"), 42);
        entries.insert(RegistryKey::new("b"), 100);

        assert_eq!(entries.get(&RegistryKey::new("a")), Some(&42));
        assert_eq!(entries.get(&RegistryKey::new("c")), None);
    }

    #[test]
    fn test_registry_key_is_a_plain_string_in_json() {
        let key = ComponentId::new(3).render_key();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"node-3-render\"");

        let back: RegistryKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
