use super::spec::ComponentSpec;
use super::template;
use crate::error::PipelineError;
use log::{debug, trace};
use polypdf_core::{SourceTree, WeakSourceTree};
use polypdf_idf::{AttributeNode, PropMap};
use polypdf_registry::{Registry, RegistryValue};
use polypdf_types::{ComponentId, NodeKind, PaginationInfo, RegistryKey};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// A component tree mounted into a [`SourceTree`].
///
/// Each mounted component owns the registry entries it wrote. Dropping the
/// document unmounts every component and removes those entries.
pub struct MountedDocument {
    source: SourceTree,
    components: Vec<(ComponentId, NodeKind)>,
}

impl MountedDocument {
    /// Mounts `spec` into a fresh source tree with its own registry.
    pub fn mount(spec: &ComponentSpec) -> Result<Self, PipelineError> {
        Self::mount_in(spec, Arc::new(Registry::new()))
    }

    /// Parses a JSON component description and mounts it.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let spec: ComponentSpec = serde_json::from_str(json)?;
        Self::mount(&spec)
    }

    /// Mounts `spec` using an existing registry.
    pub fn mount_in(spec: &ComponentSpec, registry: Arc<Registry>) -> Result<Self, PipelineError> {
        let mut mounter = Mounter {
            registry: &registry,
            components: Vec::new(),
            templates: Vec::new(),
        };
        let root = match mounter.mount_node(spec) {
            Ok(root) => root,
            Err(e) => {
                mounter.rollback();
                return Err(e);
            }
        };
        let Mounter {
            components, templates, ..
        } = mounter;

        let source = SourceTree::new(root, Arc::clone(&registry));
        for (id, render) in templates {
            if let Err(e) = registry.set(id.render_key(), pagination_callback(source.downgrade(), id, render)) {
                release(&registry, &components);
                return Err(e.into());
            }
        }
        debug!("Mounted {} component(s).", components.len());

        Ok(Self { source, components })
    }

    pub fn source(&self) -> &SourceTree {
        &self.source
    }

    pub fn registry(&self) -> &Arc<Registry> {
        self.source.registry()
    }

    /// Mounted component ids in depth-first order.
    pub fn components(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components.iter().map(|(id, _)| *id)
    }

    /// Mounted components of `kind`, in depth-first order.
    pub fn components_of(&self, kind: NodeKind) -> Vec<ComponentId> {
        self.components
            .iter()
            .filter(|(_, k)| *k == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Replaces a component's props.
    pub fn set_props(&self, id: ComponentId, props: PropMap) -> Result<(), PipelineError> {
        self.ensure_mounted(id)?;
        self.registry().set(id.props_key(), RegistryValue::Props(props))?;
        self.touch(id, |_| {});
        Ok(())
    }

    /// Replaces a component's style.
    pub fn set_style(&self, id: ComponentId, style: PropMap) -> Result<(), PipelineError> {
        self.ensure_mounted(id)?;
        self.registry().set(id.style_key(), RegistryValue::Style(style))?;
        self.touch(id, |_| {});
        Ok(())
    }

    /// Replaces a component's own text.
    pub fn set_text(&self, id: ComponentId, text: impl Into<String>) -> Result<(), PipelineError> {
        self.ensure_mounted(id)?;
        let text = text.into();
        self.touch(id, move |node| node.text = text);
        Ok(())
    }

    fn ensure_mounted(&self, id: ComponentId) -> Result<(), PipelineError> {
        let key = id.props_key();
        let mounted = self.components.iter().any(|(c, _)| *c == id)
            && self.source.read(|root| root.find(&|n| owns(n, &key)).is_some());
        if mounted {
            Ok(())
        } else {
            Err(PipelineError::Config(format!("component {} is not mounted", id)))
        }
    }

    /// Applies `f` to the component's node and bumps its revision, so that a
    /// registry-only change shows up as a tree mutation.
    fn touch(&self, id: ComponentId, f: impl FnOnce(&mut AttributeNode)) {
        let key = id.props_key();
        self.source.mutate(|root| {
            if let Some(node) = root.find_mut(&|n| owns(n, &key)) {
                f(node);
                node.revision += 1;
            }
        });
    }
}

impl Drop for MountedDocument {
    fn drop(&mut self) {
        release(self.source.registry(), &self.components);
        debug!("Unmounted {} component(s).", self.components.len());
    }
}

impl fmt::Debug for MountedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedDocument")
            .field("source", &self.source)
            .field("components", &self.components.len())
            .finish()
    }
}

struct Mounter<'a> {
    registry: &'a Registry,
    components: Vec<(ComponentId, NodeKind)>,
    templates: Vec<(ComponentId, String)>,
}

impl Mounter<'_> {
    fn mount_node(&mut self, spec: &ComponentSpec) -> Result<AttributeNode, PipelineError> {
        let kind = match spec.kind.parse::<NodeKind>() {
            Ok(NodeKind::TextInstance) => {
                return Ok(AttributeNode::new(NodeKind::TextInstance.as_str())
                    .with_text(spec.text.clone().unwrap_or_default()));
            }
            Ok(kind) => kind,
            Err(_) => return self.mount_foreign(spec),
        };
        if spec.render.is_some() && kind != NodeKind::Text {
            return Err(PipelineError::Config(format!(
                "render templates are only supported on TEXT components, found {}",
                kind
            )));
        }
        if spec.render.is_some() && !spec.children.is_empty() {
            return Err(PipelineError::Config(
                "a TEXT component with a render template cannot also declare children".to_string(),
            ));
        }

        let id = self.registry.allocate_id();
        self.components.push((id, kind));
        self.registry.set(id.props_key(), RegistryValue::Props(spec.props.clone()))?;
        self.registry.set(id.style_key(), RegistryValue::Style(spec.style.clone()))?;

        let mut node = AttributeNode::new(kind.as_str())
            .with_props_key(id.props_key())
            .with_style_key(id.style_key())
            .with_render_key(id.render_key());
        match (&spec.render, &spec.text) {
            (Some(render), _) => {
                node.text = template::fill(render, &PaginationInfo::default());
                self.templates.push((id, render.clone()));
            }
            (None, Some(text)) => node.text = text.clone(),
            (None, None) => {}
        }

        for child in &spec.children {
            node.children.push(self.mount_node(child)?);
        }
        Ok(node)
    }

    /// Markup the document does not know is mounted as-is, without registry
    /// entries.
    fn mount_foreign(&mut self, spec: &ComponentSpec) -> Result<AttributeNode, PipelineError> {
        trace!("Mounting foreign node '{}'.", spec.kind);
        let mut node = if spec.kind.is_empty() {
            AttributeNode::untagged()
        } else {
            AttributeNode::new(spec.kind.clone())
        };
        node.text = spec.text.clone().unwrap_or_default();
        for child in &spec.children {
            node.children.push(self.mount_node(child)?);
        }
        Ok(node)
    }

    fn rollback(&self) {
        release(self.registry, &self.components);
    }
}

fn owns(node: &AttributeNode, props_key: &RegistryKey) -> bool {
    node.props_key.as_ref() == Some(props_key)
}

fn release(registry: &Registry, components: &[(ComponentId, NodeKind)]) {
    for (id, _) in components {
        for key in id.keys() {
            registry.remove(&key);
        }
    }
}

/// The callback behind a render template.
///
/// Keeps the component's own pagination state and rewrites the component's
/// text from it. Holds the tree weakly: the callback lives in the tree's own
/// registry.
fn pagination_callback(source: WeakSourceTree, id: ComponentId, render: String) -> RegistryValue {
    let local = Mutex::new(PaginationInfo::default());
    let key = id.props_key();
    RegistryValue::pagination(move |update| {
        let info = {
            let mut local = local.lock().unwrap_or_else(PoisonError::into_inner);
            local.refresh(update);
            *local
        };
        let Some(source) = source.upgrade() else {
            trace!("Pagination update for {} after its tree was dropped.", id);
            return;
        };
        let text = template::fill(&render, &info);
        trace!("{} now reads '{}'.", id, text);
        source.mutate(|root| {
            if let Some(node) = root.find_mut(&|n| owns(n, &key)) {
                node.text = text;
            }
        });
    })
}
