use crate::{PropMap, RenderFn, Style};
use polypdf_types::NodeKind;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Adapter-native content returned by a render function.
///
/// A node projected from a dynamic document node keeps its render function,
/// so pagination data still reaches it when it is nested inside another
/// dynamic node's output.
#[derive(Clone, Serialize)]
#[serde(untagged)]
pub enum Element {
    Text(String),
    Node {
        #[serde(rename = "type")]
        kind: NodeKind,
        style: Style,
        props: PropMap,
        #[serde(skip)]
        render: Option<RenderFn>,
        children: Vec<Element>,
    },
}

impl Element {
    pub fn text_content(&self) -> String {
        match self {
            Element::Text(value) => value.clone(),
            Element::Node { children, .. } => children.iter().map(Element::text_content).collect(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Element::Text(_) => NodeKind::TextInstance,
            Element::Node { kind, .. } => *kind,
        }
    }

    pub fn render_fn(&self) -> Option<&RenderFn> {
        match self {
            Element::Text(_) => None,
            Element::Node { render, .. } => render.as_ref(),
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Element::Node {
                kind,
                style,
                props,
                render,
                children,
            } => f
                .debug_struct("Node")
                .field("kind", kind)
                .field("style", style)
                .field("props", props)
                .field("render", &render.as_ref().map(|_| "<fn>"))
                .field("children", children)
                .finish(),
        }
    }
}

/// Render functions compare by identity.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::Text(a), Element::Text(b)) => a == b,
            (
                Element::Node {
                    kind,
                    style,
                    props,
                    render,
                    children,
                },
                Element::Node {
                    kind: other_kind,
                    style: other_style,
                    props: other_props,
                    render: other_render,
                    children: other_children,
                },
            ) => {
                let same_render = match (render, other_render) {
                    (None, None) => true,
                    (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                    _ => false,
                };
                kind == other_kind
                    && style == other_style
                    && props == other_props
                    && same_render
                    && children == other_children
            }
            _ => false,
        }
    }
}
