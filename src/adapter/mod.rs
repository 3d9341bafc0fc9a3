//! A minimal component adapter.
//!
//! Serializes declarative [`ComponentSpec`] trees into a [`SourceTree`]
//! the way a UI framework binding would: every component gets registry
//! entries for its props and style, and TEXT components with a render
//! template get a pagination callback that rewrites their text.
//!
//! [`SourceTree`]: polypdf_core::SourceTree

mod mount;
mod spec;
pub mod template;

pub use mount::MountedDocument;
pub use spec::ComponentSpec;
