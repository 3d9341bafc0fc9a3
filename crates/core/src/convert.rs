//! Attribute tree → document tree conversion.

use crate::error::{ConversionError, ConvertError, StructuralError};
use crate::source::bridge_write;
use log::debug;
use polypdf_idf::{AttributeNode, DocumentNode, Element, NodeProps, PropMap, RenderFn};
use polypdf_registry::{PaginationCallback, Registry, RegistryValue};
use polypdf_types::{NodeKind, RegistryKey};
use std::sync::Arc;

/// A node whose content depends on pagination data, as declared by the
/// render key it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationDependency {
    pub kind: NodeKind,
    pub render_key: RegistryKey,
}

/// The result of converting one attribute tree.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: DocumentNode,
    pub dependencies: Vec<PaginationDependency>,
}

impl Conversion {
    /// Whether any node needs pagination data that only layout can provide.
    pub fn is_dynamic(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Treat a props or style key with no registry entry as an error instead
    /// of an empty map.
    pub strict_keys: bool,
}

/// Fails unless `root` is tagged as a DOCUMENT.
pub fn check_root(root: &AttributeNode) -> Result<(), StructuralError> {
    match root.tag.as_deref() {
        Some(tag) if tag == NodeKind::Document.as_str() => Ok(()),
        other => Err(StructuralError {
            found: other.map(str::to_string),
        }),
    }
}

/// Converts a mounted attribute tree into a document tree.
///
/// Nodes without a tag, or with a tag outside [`NodeKind`], are dropped with
/// their whole subtree; unrelated markup may share the tree with the document.
pub fn to_document(
    root: &AttributeNode,
    registry: &Registry,
    options: ConvertOptions,
) -> Result<Conversion, ConvertError> {
    check_root(root)?;

    let mut converter = Converter {
        registry,
        options,
        dependencies: Vec::new(),
        skipped: 0,
    };
    let document = converter
        .convert_node(root)?
        .ok_or_else(|| StructuralError {
            found: root.tag.clone(),
        })?;

    if converter.skipped > 0 {
        debug!("Conversion skipped {} foreign node(s).", converter.skipped);
    }
    debug!(
        "Converted document tree ({} dynamic node(s)).",
        converter.dependencies.len()
    );

    Ok(Conversion {
        document,
        dependencies: converter.dependencies,
    })
}

struct Converter<'a> {
    registry: &'a Registry,
    options: ConvertOptions,
    dependencies: Vec<PaginationDependency>,
    skipped: usize,
}

#[derive(Clone, Copy)]
enum MapSlot {
    Props,
    Style,
}

impl MapSlot {
    fn name(self) -> &'static str {
        match self {
            MapSlot::Props => "props",
            MapSlot::Style => "style",
        }
    }
}

impl Converter<'_> {
    fn convert_node(&mut self, node: &AttributeNode) -> Result<Option<DocumentNode>, ConversionError> {
        let Some(tag) = node.tag.as_deref() else {
            self.skipped += 1;
            return Ok(None);
        };
        let kind = match tag.parse::<NodeKind>() {
            Ok(kind) => kind,
            Err(e) => {
                debug!("Skipping node: {}", e);
                self.skipped += 1;
                return Ok(None);
            }
        };

        if kind == NodeKind::TextInstance {
            return Ok(Some(DocumentNode::text(node.text_content())));
        }

        let props = self.resolve_map(kind, node.props_key.as_ref(), MapSlot::Props)?;
        let style = self.resolve_map(kind, node.style_key.as_ref(), MapSlot::Style)?;
        let callback = self.resolve_callback(kind, node.render_key.as_ref())?;

        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            if let Some(converted) = self.convert_node(child)? {
                children.push(converted);
            }
        }
        if kind == NodeKind::Text && node.children.is_empty() {
            children.push(DocumentNode::text(node.text_content()));
        }

        let mut node_props = NodeProps::new(props);
        if let (Some(callback), Some(render_key)) = (callback, node.render_key.as_ref()) {
            self.dependencies.push(PaginationDependency {
                kind,
                render_key: render_key.clone(),
            });
            node_props = node_props.with_render(render_wrapper(callback, &children));
        }

        Ok(Some(DocumentNode::element(kind, style, node_props, children)))
    }

    fn resolve_map(
        &self,
        kind: NodeKind,
        key: Option<&RegistryKey>,
        slot: MapSlot,
    ) -> Result<PropMap, ConversionError> {
        let Some(key) = key else {
            return Ok(PropMap::new());
        };
        match (self.registry.get(key), slot) {
            (Some(RegistryValue::Props(map)), MapSlot::Props)
            | (Some(RegistryValue::Style(map)), MapSlot::Style) => Ok(map),
            (Some(other), _) => Err(ConversionError::UnexpectedEntry {
                key: key.clone(),
                kind,
                expected: slot.name(),
                found: other.kind_name(),
            }),
            (None, _) if self.options.strict_keys => Err(ConversionError::MissingEntry {
                key: key.clone(),
                kind,
            }),
            (None, _) => Ok(PropMap::new()),
        }
    }

    /// Adapters emit a render key on every parent component, registering the
    /// callback only when the component actually has a render prop. An absent
    /// entry is therefore normal and means "static".
    fn resolve_callback(
        &self,
        kind: NodeKind,
        key: Option<&RegistryKey>,
    ) -> Result<Option<PaginationCallback>, ConversionError> {
        let Some(key) = key else {
            return Ok(None);
        };
        match self.registry.get(key) {
            None => Ok(None),
            Some(RegistryValue::Pagination(callback)) => Ok(Some(callback)),
            Some(other) => Err(ConversionError::UnexpectedEntry {
                key: key.clone(),
                kind,
                expected: "pagination callback",
                found: other.kind_name(),
            }),
        }
    }
}

/// Builds the render function for a dynamic node: forward the live pagination
/// data to the owning component, then hand back this pass's children.
fn render_wrapper(callback: PaginationCallback, children: &[DocumentNode]) -> RenderFn {
    let elements: Arc<[Element]> = children.iter().map(DocumentNode::to_element).collect();
    Arc::new(move |info| {
        bridge_write(|| callback(info));
        elements.to_vec()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polypdf_types::PaginationInfo;
    use serde_json::json;
    use std::sync::Mutex;

    fn map(value: serde_json::Value) -> PropMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn convert(root: &AttributeNode, registry: &Registry) -> Result<Conversion, ConvertError> {
        to_document(root, registry, ConvertOptions::default())
    }

    #[test]
    fn non_document_root_is_structural_error() {
        let registry = Registry::new();
        let err = convert(&AttributeNode::new("PAGE"), &registry).unwrap_err();
        assert_eq!(
            err,
            ConvertError::Structural(StructuralError {
                found: Some("PAGE".into())
            })
        );

        let err = convert(&AttributeNode::untagged(), &registry).unwrap_err();
        assert!(err.to_string().contains("root element must be a document"));
    }

    #[test]
    fn text_without_children_gets_implicit_text_instance() {
        let registry = Registry::new();
        let root = AttributeNode::new("DOCUMENT")
            .with_child(AttributeNode::new("PAGE").with_child(AttributeNode::new("TEXT").with_text("X")));

        let conversion = convert(&root, &registry).unwrap();
        let text = &conversion.document.children()[0].children()[0];

        assert_eq!(text.kind(), NodeKind::Text);
        assert_eq!(text.children().len(), 1);
        match &text.children()[0] {
            DocumentNode::TextInstance(value) => assert_eq!(value, "X"),
            other => panic!("expected text instance, got {other:?}"),
        }
        assert!(!conversion.is_dynamic());
    }

    #[test]
    fn text_instance_ignores_declared_children() {
        let registry = Registry::new();
        let root = AttributeNode::new("DOCUMENT").with_child(
            AttributeNode::new("TEXT").with_child(
                AttributeNode::new("TEXT_INSTANCE")
                    .with_text("a")
                    .with_child(AttributeNode::new("VIEW").with_text("b")),
            ),
        );

        let conversion = convert(&root, &registry).unwrap();
        let instance = &conversion.document.children()[0].children()[0];
        assert_eq!(instance.kind(), NodeKind::TextInstance);
        assert!(instance.children().is_empty());
        assert_eq!(instance.text_content(), "ab");
    }

    #[test]
    fn foreign_nodes_are_filtered_with_their_subtree() {
        let registry = Registry::new();
        let root = AttributeNode::new("DOCUMENT").with_children([
            AttributeNode::untagged().with_child(AttributeNode::new("PAGE")),
            AttributeNode::new("DIV"),
            AttributeNode::new("PAGE"),
        ]);

        let conversion = convert(&root, &registry).unwrap();
        let kinds: Vec<_> = conversion.document.children().iter().map(DocumentNode::kind).collect();
        assert_eq!(kinds, vec![NodeKind::Page]);
    }

    #[test]
    fn props_and_style_are_resolved_from_registry() {
        let registry = Registry::new();
        registry.set("p", RegistryValue::Props(map(json!({ "title": "T" })))).unwrap();
        registry.set("s", RegistryValue::Style(map(json!({ "padding": 30 })))).unwrap();
        let root = AttributeNode::new("DOCUMENT").with_props_key("p").with_style_key("s");

        let conversion = convert(&root, &registry).unwrap();
        let doc = conversion.document.as_element().unwrap();
        assert_eq!(doc.props.get_str("title"), Some("T"));
        assert_eq!(doc.style.get("padding"), Some(&json!(30)));
    }

    #[test]
    fn missing_entries_are_tolerated_unless_strict() {
        let registry = Registry::new();
        let root = AttributeNode::new("DOCUMENT").with_props_key("gone");

        let lenient = convert(&root, &registry).unwrap();
        assert!(lenient.document.as_element().unwrap().props.values.is_empty());

        let strict = to_document(&root, &registry, ConvertOptions { strict_keys: true });
        assert!(matches!(
            strict,
            Err(ConvertError::Conversion(ConversionError::MissingEntry { .. }))
        ));
    }

    #[test]
    fn mismatched_entry_is_conversion_error() {
        let registry = Registry::new();
        registry.set("s", RegistryValue::Style(PropMap::new())).unwrap();
        let root = AttributeNode::new("DOCUMENT")
            .with_child(AttributeNode::new("TEXT").with_render_key("s"));

        match convert(&root, &registry) {
            Err(ConvertError::Conversion(ConversionError::UnexpectedEntry { expected, found, .. })) => {
                assert_eq!(expected, "pagination callback");
                assert_eq!(found, "style");
            }
            other => panic!("expected conversion error, got {other:?}"),
        }
    }

    #[test]
    fn render_key_without_entry_is_static() {
        let registry = Registry::new();
        let root = AttributeNode::new("DOCUMENT").with_render_key("node-0-render");
        let conversion = convert(&root, &registry).unwrap();
        assert!(!conversion.is_dynamic());
        assert!(conversion.document.render_fn().is_none());
    }

    #[test]
    fn render_wrapper_forwards_pagination_then_returns_children() {
        let registry = Registry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        registry
            .set(
                "r",
                RegistryValue::pagination(move |info| sink.lock().unwrap().push(*info)),
            )
            .unwrap();
        let root = AttributeNode::new("DOCUMENT").with_child(
            AttributeNode::new("TEXT").with_render_key("r").with_text("page 0 of 0"),
        );

        let conversion = convert(&root, &registry).unwrap();
        assert!(conversion.is_dynamic());
        assert_eq!(
            conversion.dependencies,
            vec![PaginationDependency {
                kind: NodeKind::Text,
                render_key: RegistryKey::from("r"),
            }]
        );

        let text = &conversion.document.children()[0];
        let render = text.render_fn().expect("dynamic node has render fn");
        let info = PaginationInfo::new(2, 3);
        let elements = render(&info);

        assert_eq!(*seen.lock().unwrap(), vec![info]);
        assert_eq!(elements, vec![Element::Text("page 0 of 0".into())]);
    }

    #[test]
    fn callback_runs_inside_bridge_write_scope() {
        let registry = Registry::new();
        let flagged = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&flagged);
        registry
            .set(
                "r",
                RegistryValue::pagination(move |_| {
                    *sink.lock().unwrap() = Some(crate::source::in_bridge_write());
                }),
            )
            .unwrap();
        let root = AttributeNode::new("DOCUMENT").with_render_key("r");

        let conversion = convert(&root, &registry).unwrap();
        let render = conversion.document.render_fn().unwrap();
        render(&PaginationInfo::new(1, 1));
        assert_eq!(*flagged.lock().unwrap(), Some(true));
    }
}
