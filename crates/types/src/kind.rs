use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of node types the layout engine understands.
///
/// Attribute trees carry these as string tags (`"DOCUMENT"`, `"CLIP_PATH"`, ...);
/// anything else is foreign markup and is never turned into a document node.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Document,
    Page,
    View,
    Text,
    TextInstance,
    Image,
    Link,
    Note,
    Canvas,
    Svg,
    Line,
    Polyline,
    Polygon,
    Path,
    Rect,
    Circle,
    Ellipse,
    Tspan,
    G,
    Stop,
    Defs,
    ClipPath,
    LinearGradient,
    RadialGradient,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown node type '{0}'")]
pub struct UnknownNodeKind(pub String);

impl NodeKind {
    pub const ALL: [NodeKind; 24] = [
        NodeKind::Document,
        NodeKind::Page,
        NodeKind::View,
        NodeKind::Text,
        NodeKind::TextInstance,
        NodeKind::Image,
        NodeKind::Link,
        NodeKind::Note,
        NodeKind::Canvas,
        NodeKind::Svg,
        NodeKind::Line,
        NodeKind::Polyline,
        NodeKind::Polygon,
        NodeKind::Path,
        NodeKind::Rect,
        NodeKind::Circle,
        NodeKind::Ellipse,
        NodeKind::Tspan,
        NodeKind::G,
        NodeKind::Stop,
        NodeKind::Defs,
        NodeKind::ClipPath,
        NodeKind::LinearGradient,
        NodeKind::RadialGradient,
    ];

    /// The tag used for this kind in attribute trees.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Document => "DOCUMENT",
            NodeKind::Page => "PAGE",
            NodeKind::View => "VIEW",
            NodeKind::Text => "TEXT",
            NodeKind::TextInstance => "TEXT_INSTANCE",
            NodeKind::Image => "IMAGE",
            NodeKind::Link => "LINK",
            NodeKind::Note => "NOTE",
            NodeKind::Canvas => "CANVAS",
            NodeKind::Svg => "SVG",
            NodeKind::Line => "LINE",
            NodeKind::Polyline => "POLYLINE",
            NodeKind::Polygon => "POLYGON",
            NodeKind::Path => "PATH",
            NodeKind::Rect => "RECT",
            NodeKind::Circle => "CIRCLE",
            NodeKind::Ellipse => "ELLIPSE",
            NodeKind::Tspan => "TSPAN",
            NodeKind::G => "G",
            NodeKind::Stop => "STOP",
            NodeKind::Defs => "DEFS",
            NodeKind::ClipPath => "CLIP_PATH",
            NodeKind::LinearGradient => "LINEAR_GRADIENT",
            NodeKind::RadialGradient => "RADIAL_GRADIENT",
        }
    }

    /// Leaf components never own children in the adapters' component sets.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::TextInstance
                | NodeKind::Image
                | NodeKind::Link
                | NodeKind::Note
                | NodeKind::Canvas
                | NodeKind::Line
                | NodeKind::Polyline
                | NodeKind::Polygon
                | NodeKind::Path
                | NodeKind::Rect
                | NodeKind::Circle
                | NodeKind::Ellipse
                | NodeKind::Stop
        )
    }
}

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| UnknownNodeKind(tag.to_string()))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
