//! The side-channel registry.
//!
//! Attribute trees can only carry strings, so adapters park everything else
//! (prop maps, style objects, pagination-update callbacks) here and reference
//! it by key. A registry is an explicit context object: one per mounted
//! document, shared by `Arc` between the adapter and the bridge.
//!
//! The registry never infers cleanup. Whoever `set`s a key owns it and must
//! `remove` it on unmount.

use log::{trace, warn};
use polypdf_idf::{PropMap, Style};
use polypdf_types::{ComponentId, PaginationInfo, RegistryKey};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Callback through which the engine's pagination data reaches the component
/// that owns a dynamic node.
pub type PaginationCallback = Arc<dyn Fn(&PaginationInfo) + Send + Sync>;

#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    #[error("registry lock poisoned while writing '{0}'")]
    Poisoned(RegistryKey),
}

/// A value stored in the registry.
#[derive(Clone)]
pub enum RegistryValue {
    Props(PropMap),
    Style(Style),
    Pagination(PaginationCallback),
}

impl RegistryValue {
    pub fn pagination(callback: impl Fn(&PaginationInfo) + Send + Sync + 'static) -> Self {
        RegistryValue::Pagination(Arc::new(callback))
    }

    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RegistryValue::Props(_) => "props",
            RegistryValue::Style(_) => "style",
            RegistryValue::Pagination(_) => "pagination callback",
        }
    }
}

impl fmt::Debug for RegistryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryValue::Props(map) => f.debug_tuple("Props").field(map).finish(),
            RegistryValue::Style(map) => f.debug_tuple("Style").field(map).finish(),
            RegistryValue::Pagination(_) => f.write_str("Pagination(<fn>)"),
        }
    }
}

#[derive(Default)]
pub struct Registry {
    entries: RwLock<HashMap<RegistryKey, RegistryValue>>,
    next_id: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a component identity that has never been handed out by this
    /// registry. Keys derived from it are therefore unique.
    pub fn allocate_id(&self) -> ComponentId {
        ComponentId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Inserts or overwrites the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Poisoned` if the internal lock is poisoned.
    pub fn set(&self, key: impl Into<RegistryKey>, value: RegistryValue) -> Result<(), RegistryError> {
        let key = key.into();
        let mut entries = self
            .entries
            .write()
            .map_err(|_| RegistryError::Poisoned(key.clone()))?;
        trace!("registry: set '{}' ({})", key, value.kind_name());
        entries.insert(key, value);
        Ok(())
    }

    /// Returns a clone of the value stored under `key`.
    ///
    /// Returns `None` if the key is absent or the lock is poisoned.
    pub fn get(&self, key: &RegistryKey) -> Option<RegistryValue> {
        match self.entries.read() {
            Ok(entries) => entries.get(key).cloned(),
            Err(_) => {
                warn!("registry: lock poisoned while reading '{}'", key);
                None
            }
        }
    }

    /// Removes the value stored under `key`.
    ///
    /// Returns `None` if the lock is poisoned or the key doesn't exist.
    pub fn remove(&self, key: &RegistryKey) -> Option<RegistryValue> {
        let removed = self.entries.write().ok()?.remove(key);
        if removed.is_some() {
            trace!("registry: removed '{}'", key);
        }
        removed
    }

    pub fn contains(&self, key: &RegistryKey) -> bool {
        self.entries
            .read()
            .map(|e| e.contains_key(key))
            .unwrap_or(false)
    }

    /// Get the number of entries in the registry.
    ///
    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns `true` if the lock is poisoned (safe default).
    pub fn is_empty(&self) -> bool {
        self.entries.read().map(|e| e.is_empty()).unwrap_or(true)
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.len())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}
