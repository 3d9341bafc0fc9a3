//! The observable source tree.
//!
//! Adapters mount an [`AttributeNode`] tree here and rewrite it as their
//! components re-render. Every write made from outside the bridge advances a
//! generation epoch that subscribers can await. Writes that happen while the
//! bridge is forwarding pagination data to a component (inside
//! [`bridge_write`]) are applied but leave the epoch alone, so a document's
//! reaction to its own layout never schedules another generation.

use log::trace;
use polypdf_idf::AttributeNode;
use polypdf_registry::Registry;
use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tokio::sync::watch;

thread_local! {
    static BRIDGE_WRITE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Runs `f` as a bridge-originated write scope on the current thread.
pub fn bridge_write<R>(f: impl FnOnce() -> R) -> R {
    struct Exit;
    impl Drop for Exit {
        fn drop(&mut self) {
            BRIDGE_WRITE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
        }
    }

    BRIDGE_WRITE_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let _exit = Exit;
    f()
}

/// Whether the current thread is inside a [`bridge_write`] scope.
pub fn in_bridge_write() -> bool {
    BRIDGE_WRITE_DEPTH.with(|depth| depth.get() > 0)
}

struct SourceInner {
    root: RwLock<AttributeNode>,
    registry: Arc<Registry>,
    epoch: watch::Sender<u64>,
}

/// A mounted attribute tree together with the registry its keys point into.
#[derive(Clone)]
pub struct SourceTree {
    inner: Arc<SourceInner>,
}

/// A non-owning reference to a [`SourceTree`], for callbacks stored in the
/// tree's own registry.
#[derive(Clone)]
pub struct WeakSourceTree {
    inner: Weak<SourceInner>,
}

impl SourceTree {
    pub fn new(root: AttributeNode, registry: Arc<Registry>) -> Self {
        let (epoch, _) = watch::channel(0);
        Self {
            inner: Arc::new(SourceInner {
                root: RwLock::new(root),
                registry,
                epoch,
            }),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.inner.registry
    }

    /// Runs `f` against the current tree.
    pub fn read<R>(&self, f: impl FnOnce(&AttributeNode) -> R) -> R {
        let root = self.inner.root.read().unwrap_or_else(PoisonError::into_inner);
        f(&root)
    }

    pub fn snapshot(&self) -> AttributeNode {
        self.read(AttributeNode::clone)
    }

    /// The root's type tag, if any.
    pub fn root_tag(&self) -> Option<String> {
        self.read(|root| root.tag.clone())
    }

    /// Applies `f` to the tree.
    ///
    /// Advances the epoch unless the calling thread is inside a bridge write.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut AttributeNode) -> R) -> R {
        let result = {
            let mut root = self.inner.root.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut root)
        };
        if in_bridge_write() {
            trace!("source tree: bridge-originated write, epoch unchanged");
        } else {
            self.inner.epoch.send_modify(|epoch| *epoch += 1);
            trace!("source tree: mutation, epoch now {}", self.epoch());
        }
        result
    }

    /// Replaces the whole tree.
    pub fn replace(&self, root: AttributeNode) {
        self.mutate(|current| *current = root);
    }

    /// Number of external mutations observed so far.
    pub fn epoch(&self) -> u64 {
        *self.inner.epoch.borrow()
    }

    /// Subscribes to epoch changes. The current epoch counts as seen.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.epoch.subscribe()
    }

    pub fn downgrade(&self) -> WeakSourceTree {
        WeakSourceTree {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl WeakSourceTree {
    pub fn upgrade(&self) -> Option<SourceTree> {
        self.inner.upgrade().map(|inner| SourceTree { inner })
    }
}

impl fmt::Debug for SourceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceTree")
            .field("root", &self.root_tag())
            .field("epoch", &self.epoch())
            .field("registry", &self.inner.registry)
            .finish()
    }
}

impl fmt::Debug for WeakSourceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSourceTree")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
