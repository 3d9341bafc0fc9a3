use polypdf_types::RegistryKey;
use serde::{Deserialize, Serialize};

/// One node of the attribute tree an adapter mounts.
///
/// `tag` is an open string because the tree may share space with markup that
/// has nothing to do with the document; a node without a tag, or with a tag
/// outside the known node kinds, is skipped by the converter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props_key: Option<RegistryKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_key: Option<RegistryKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_key: Option<RegistryKey>,
    /// Bumped by adapters whenever registry-held values change, so the change
    /// is visible as a tree mutation.
    #[serde(default)]
    pub revision: u64,
    /// Literal text owned directly by this node.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<AttributeNode>,
}

impl AttributeNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Default::default()
        }
    }

    /// A node that carries no type tag, i.e. markup unrelated to the document.
    pub fn untagged() -> Self {
        Self::default()
    }

    pub fn with_props_key(mut self, key: impl Into<RegistryKey>) -> Self {
        self.props_key = Some(key.into());
        self
    }

    pub fn with_style_key(mut self, key: impl Into<RegistryKey>) -> Self {
        self.style_key = Some(key.into());
        self
    }

    pub fn with_render_key(mut self, key: impl Into<RegistryKey>) -> Self {
        self.render_key = Some(key.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: AttributeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = AttributeNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// The node's own text followed by the text of all descendants, in order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Depth-first search for the first node matching `predicate`.
    pub fn find(&self, predicate: &dyn Fn(&AttributeNode) -> bool) -> Option<&AttributeNode> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(predicate))
    }

    /// Mutable counterpart of [`AttributeNode::find`].
    pub fn find_mut(
        &mut self,
        predicate: &dyn Fn(&AttributeNode) -> bool,
    ) -> Option<&mut AttributeNode> {
        if predicate(self) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(predicate))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(AttributeNode::node_count).sum::<usize>()
    }
}
