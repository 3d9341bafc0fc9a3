use crate::{Element, PropMap, Style};
use polypdf_types::{NodeKind, PaginationInfo};
use std::fmt;
use std::sync::Arc;

/// A render function attached to a dynamic node.
///
/// The engine calls it with live pagination data while it lays the node out
/// and draws whatever elements it returns in place of the node's children.
pub type RenderFn = Arc<dyn Fn(&PaginationInfo) -> Vec<Element> + Send + Sync>;

/// Resolved props of an element node.
#[derive(Clone, Default)]
pub struct NodeProps {
    pub values: PropMap,
    pub render: Option<RenderFn>,
}

impl NodeProps {
    pub fn new(values: PropMap) -> Self {
        Self {
            values,
            render: None,
        }
    }

    pub fn with_render(mut self, render: RenderFn) -> Self {
        self.render = Some(render);
        self
    }

    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_str())
    }
}

impl fmt::Debug for NodeProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeProps")
            .field("values", &self.values)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// A typed, engine-ready element with resolved style and props.
#[derive(Debug, Clone)]
pub struct ElementNode {
    pub kind: NodeKind,
    pub style: Style,
    pub props: NodeProps,
    pub children: Vec<DocumentNode>,
}

/// One node of the document tree handed to the layout engine.
///
/// Text instances are leaves by construction; every other node may hold
/// children. Which children are legal under which parent is the engine's
/// business, not the bridge's.
#[derive(Debug, Clone)]
pub enum DocumentNode {
    TextInstance(String),
    Element(ElementNode),
}

impl DocumentNode {
    pub fn element(kind: NodeKind, style: Style, props: NodeProps, children: Vec<DocumentNode>) -> Self {
        DocumentNode::Element(ElementNode {
            kind,
            style,
            props,
            children,
        })
    }

    pub fn text(value: impl Into<String>) -> Self {
        DocumentNode::TextInstance(value.into())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            DocumentNode::TextInstance(_) => NodeKind::TextInstance,
            DocumentNode::Element(el) => el.kind,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            DocumentNode::Element(el) => Some(el),
            DocumentNode::TextInstance(_) => None,
        }
    }

    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Element(el) => &el.children,
            DocumentNode::TextInstance(_) => &[],
        }
    }

    pub fn render_fn(&self) -> Option<&RenderFn> {
        self.as_element().and_then(|el| el.props.render.as_ref())
    }

    /// Concatenated literal text of every text instance in this subtree.
    pub fn text_content(&self) -> String {
        match self {
            DocumentNode::TextInstance(value) => value.clone(),
            DocumentNode::Element(el) => el.children.iter().map(DocumentNode::text_content).collect(),
        }
    }

    /// Projects this node into the adapter-native element shape.
    ///
    /// Render functions travel with the projection so that a dynamic node
    /// nested in another dynamic node's output still gets pagination data.
    pub fn to_element(&self) -> Element {
        match self {
            DocumentNode::TextInstance(value) => Element::Text(value.clone()),
            DocumentNode::Element(el) => Element::Node {
                kind: el.kind,
                style: el.style.clone(),
                props: el.props.values.clone(),
                render: el.props.render.clone(),
                children: el.children.iter().map(DocumentNode::to_element).collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn styled(kind: NodeKind, children: Vec<DocumentNode>) -> DocumentNode {
        let style = json!({ "fontSize": 10 }).as_object().cloned().unwrap_or_default();
        DocumentNode::element(kind, style, NodeProps::default(), children)
    }

    #[test]
    fn text_instance_has_no_children() {
        let node = DocumentNode::text("X");
        assert_eq!(node.kind(), NodeKind::TextInstance);
        assert!(node.children().is_empty());
        assert_eq!(node.text_content(), "X");
    }

    #[test]
    fn projection_keeps_shape_and_style() {
        let tree = styled(
            NodeKind::Text,
            vec![DocumentNode::text("a"), styled(NodeKind::Text, vec![DocumentNode::text("b")])],
        );
        match tree.to_element() {
            Element::Node { kind, style, children, .. } => {
                assert_eq!(kind, NodeKind::Text);
                assert_eq!(style.get("fontSize"), Some(&json!(10)));
                assert_eq!(children.len(), 2);
                assert_eq!(children[0], Element::Text("a".to_string()));
            }
            other => panic!("expected a node, got {other:?}"),
        }
        assert_eq!(tree.to_element().text_content(), "ab");
    }

    #[test]
    fn debug_output_hides_render_closure() {
        let render: RenderFn = Arc::new(|_| Vec::new());
        let props = NodeProps::default().with_render(render);
        assert!(format!("{props:?}").contains("<fn>"));
    }
}
