//! The builder itself: cursor state over a borrowed document

use dom::{Document, ListenerId, NodeId};
use uuid::Uuid;

use crate::config::BuilderConfig;
use crate::error::{BuilderError, Result};
use crate::gate::GateState;
use crate::registry::{Registry, RegistryEntry};
use crate::target::Target;

/// Fluent cursor over a document
///
/// Holds the current node, the current node set, a registry of saved and
/// detached nodes, and the condition gate that decides whether the next
/// gated call runs. Every instance owns its own state; nested builders
/// handed to callbacks start fresh and share only the document.
#[derive(Debug)]
pub struct Builder<'d> {
    pub(crate) doc: &'d mut Document,
    pub(crate) id: Uuid,
    pub(crate) config: BuilderConfig,
    pub(crate) current: Option<NodeId>,
    pub(crate) current_set: Vec<NodeId>,
    pub(crate) registry: Registry,
    pub(crate) gate: GateState,
    pub(crate) last_listener: Option<ListenerId>,
}

impl<'d> Builder<'d> {
    /// Builder with no current node
    pub fn new(doc: &'d mut Document) -> Self {
        Self::with_config(doc, BuilderConfig::default())
    }

    pub fn with_config(doc: &'d mut Document, config: BuilderConfig) -> Self {
        let id = Uuid::now_v7();
        tracing::trace!("Builder {} created", id);
        Self {
            doc,
            id,
            config,
            current: None,
            current_set: Vec::new(),
            registry: Registry::default(),
            gate: GateState::default(),
            last_listener: None,
        }
    }

    /// Builder whose current node is `node`
    pub fn on(doc: &'d mut Document, node: NodeId) -> Self {
        let mut builder = Self::new(doc);
        builder.current = builder.doc.get(node).ok().map(|n| n.node_id);
        builder
    }

    /// Builder positioned on the connected element with this `id`
    pub fn by_id(doc: &'d mut Document, id: &str) -> Self {
        let mut builder = Self::new(doc);
        builder.current = builder.doc.find_by_id(id);
        builder
    }

    /// Fresh builder over the same document, used for callbacks
    pub(crate) fn child(&mut self, current: Option<NodeId>) -> Builder<'_> {
        let mut child = Builder::with_config(&mut *self.doc, self.config.clone());
        child.current = current;
        child
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    /// Current node, `None` after a navigation that found nothing
    pub fn node(&self) -> Option<NodeId> {
        self.current
    }

    /// Current node set
    pub fn nodes(&self) -> &[NodeId] {
        &self.current_set
    }

    /// Registry entries in insertion order
    pub fn stored(&self) -> &[RegistryEntry] {
        self.registry.entries()
    }

    pub fn document(&self) -> &Document {
        &*self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut *self.doc
    }

    pub fn instance_id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Operand resolution
    // ------------------------------------------------------------------

    pub(crate) fn require_current(&self) -> Result<NodeId> {
        self.current.ok_or(BuilderError::NoCurrentNode)
    }

    /// Resolve for navigation: a miss is not an error
    pub(crate) fn resolve(&self, target: Target<'_>) -> Option<NodeId> {
        match target {
            Target::Current => self.current,
            Target::Node(id) => self.doc.get(id).ok().map(|n| n.node_id),
            Target::Saved(name) => self.registry.find_saved(name).map(|e| e.node),
        }
    }

    /// Resolve for mutation: a miss is a fault
    pub(crate) fn resolve_required(&self, target: Target<'_>) -> Result<NodeId> {
        match target {
            Target::Current => self.require_current(),
            Target::Node(id) => Ok(self.doc.get(id)?.node_id),
            Target::Saved(name) => self
                .registry
                .find_saved(name)
                .map(|e| e.node)
                .ok_or_else(|| BuilderError::NotFound(format!("saved node '{}'", name))),
        }
    }

    // ------------------------------------------------------------------
    // Escape hatches
    // ------------------------------------------------------------------

    /// Run `f` with the document and the current node
    pub fn perform<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Document, Option<NodeId>),
    {
        f(&mut *self.doc, self.current);
        self
    }

    /// Run `f` with the document, current node, current set and registry
    pub fn perform_all<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Document, Option<NodeId>, &[NodeId], &[RegistryEntry]),
    {
        f(
            &mut *self.doc,
            self.current,
            &self.current_set,
            self.registry.entries(),
        );
        self
    }

    /// Run `f` with this builder, for steps that do not chain
    pub fn callback<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        f(self)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_position_cursor() {
        let mut doc = Document::parse_html("<div id=\"app\"></div>").unwrap();
        let app = doc.find_by_id("app").unwrap();

        assert_eq!(Builder::by_id(&mut doc, "app").node(), Some(app));
        assert_eq!(Builder::by_id(&mut doc, "missing").node(), None);
        assert_eq!(Builder::on(&mut doc, app).node(), Some(app));
        assert_eq!(Builder::on(&mut doc, 9999).node(), None);
        assert_eq!(Builder::new(&mut doc).node(), None);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut doc = Document::parse_html("<div id=\"app\"></div>").unwrap();
        let app = doc.find_by_id("app").unwrap();

        let mut outer = Builder::on(&mut doc, app);
        outer.save_as("app").unwrap();
        let outer_id = outer.instance_id();

        let child = outer.child(Some(app));
        assert!(child.stored().is_empty());
        assert_ne!(child.instance_id(), outer_id);
    }

    #[test]
    fn test_perform_all_sees_state() {
        let mut doc = Document::parse_html("<p>a</p><p>b</p>").unwrap();
        let mut builder = Builder::new(&mut doc);
        builder.query_all("p").unwrap();

        let mut seen = 0;
        builder.perform_all(|_, current, set, stored| {
            assert!(current.is_none());
            assert!(stored.is_empty());
            seen = set.len();
        });
        assert_eq!(seen, 2);
    }
}
