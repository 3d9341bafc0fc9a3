//! A reference [`LayoutEngine`](polypdf_render_core::LayoutEngine) built on `lopdf`.
//!
//! The layout policy is deliberately flat: every PAGE child of the DOCUMENT
//! becomes exactly one physical page and every TEXT node one line of
//! Helvetica. There is no text flow and no page breaking. What it does
//! faithfully is the part the bridge depends on: render functions are called
//! with each node's real pagination data, and their output is what gets drawn.

mod engine;
mod flow;
mod writer;

pub use engine::LopdfEngine;
pub use flow::{PageSize, TextLine};
