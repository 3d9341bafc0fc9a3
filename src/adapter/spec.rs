use polypdf_idf::PropMap;
use serde::{Deserialize, Serialize};

/// A declarative component description, as a framework would hand it over.
///
/// `type` is kept as a string so that markup foreign to the document can be
/// mounted alongside it and skipped at conversion time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "PropMap::is_empty")]
    pub props: PropMap,
    #[serde(default, skip_serializing_if = "PropMap::is_empty")]
    pub style: PropMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Text template re-rendered with pagination data, e.g.
    /// `"page {pageNumber} of {totalPages}"`. TEXT components only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentSpec>,
}

impl ComponentSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn with_props(mut self, props: PropMap) -> Self {
        self.props = props;
        self
    }

    pub fn with_style(mut self, style: PropMap) -> Self {
        self.style = style;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_render(mut self, template: impl Into<String>) -> Self {
        self.render = Some(template.into());
        self
    }

    pub fn with_child(mut self, child: ComponentSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ComponentSpec>) -> Self {
        self.children.extend(children);
        self
    }
}
