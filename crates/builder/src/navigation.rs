//! Cursor navigation
//!
//! Navigation never fails on a miss: the cursor (or node set) becomes empty
//! and the next operation that needs a node reports `NoCurrentNode`.
//! Only selector parse errors surface here, since they are the caller's
//! mistake and not a property of the document.

use dom::{Document, NodeId};

use crate::builder::Builder;
use crate::error::Result;
use crate::target::{Scope, Target};

impl Builder<'_> {
    fn land(&mut self, op: &str, node: Option<NodeId>) -> &mut Self {
        match node {
            Some(id) => tracing::trace!("Builder {}: {} -> {}", self.id, op, id),
            None => tracing::warn!("Builder {}: {} found nothing", self.id, op),
        }
        self.current = node;
        self
    }

    fn land_set(&mut self, op: &str, nodes: Vec<NodeId>) -> &mut Self {
        if nodes.is_empty() {
            tracing::warn!("Builder {}: {} found nothing", self.id, op);
        } else {
            tracing::trace!("Builder {}: {} -> {} nodes", self.id, op, nodes.len());
        }
        self.current_set = nodes;
        self
    }

    fn step<F>(&mut self, op: &str, from: Target<'_>, step: F) -> &mut Self
    where
        F: FnOnce(&Document, NodeId) -> Option<NodeId>,
    {
        let node = self.resolve(from).and_then(|start| step(&*self.doc, start));
        self.land(op, node)
    }

    fn step_set<F>(&mut self, op: &str, from: Target<'_>, step: F) -> &mut Self
    where
        F: FnOnce(&Document, NodeId) -> Vec<NodeId>,
    {
        let nodes = self
            .resolve(from)
            .map(|start| step(&*self.doc, start))
            .unwrap_or_default();
        self.land_set(op, nodes)
    }

    fn scope_root(&self, scope: Scope<'_>) -> Option<NodeId> {
        match scope {
            Scope::Document => Some(self.doc.root_id()),
            Scope::This => self.current,
            Scope::Saved(name) => self.resolve(Target::Saved(name)),
            Scope::Node(id) => self.resolve(Target::Node(id)),
        }
    }

    /// Make `node` current
    pub fn select(&mut self, node: NodeId) -> &mut Self {
        let node = self.resolve(Target::Node(node));
        self.land("select", node)
    }

    /// Make the connected element with this `id` attribute current
    pub fn select_id(&mut self, id: &str) -> &mut Self {
        let node = self.doc.find_by_id(id);
        self.land("select_id", node)
    }

    /// First match of `selector` in the whole document
    pub fn query(&mut self, selector: &str) -> Result<&mut Self> {
        self.query_in(selector, Scope::Document)
    }

    /// First match of `selector` under the current node
    pub fn query_on(&mut self, selector: &str) -> Result<&mut Self> {
        self.query_in(selector, Scope::This)
    }

    /// First match of `selector` under `scope`
    ///
    /// `"this"` scopes to the current node, any other string to a saved
    /// node of that name.
    pub fn query_in<'s>(&mut self, selector: &str, scope: impl Into<Scope<'s>>) -> Result<&mut Self> {
        let found = match self.scope_root(scope.into()) {
            Some(root) => self.doc.query_selector(root, selector)?,
            None => None,
        };
        Ok(self.land("query", found))
    }

    /// All matches of `selector` in the document into the node set
    pub fn query_all(&mut self, selector: &str) -> Result<&mut Self> {
        self.query_all_in(selector, Scope::Document)
    }

    pub fn query_all_on(&mut self, selector: &str) -> Result<&mut Self> {
        self.query_all_in(selector, Scope::This)
    }

    pub fn query_all_in<'s>(
        &mut self,
        selector: &str,
        scope: impl Into<Scope<'s>>,
    ) -> Result<&mut Self> {
        let found = match self.scope_root(scope.into()) {
            Some(root) => self.doc.query_selector_all(root, selector)?,
            None => Vec::new(),
        };
        Ok(self.land_set("query_all", found))
    }

    pub fn parent(&mut self) -> &mut Self {
        self.parent_of(Target::Current)
    }

    pub fn parent_of<'t>(&mut self, node: impl Into<Target<'t>>) -> &mut Self {
        self.step("parent", node.into(), |doc, n| doc.parent(n))
    }

    /// First child node, text nodes included
    pub fn first_child(&mut self) -> &mut Self {
        self.first_child_of(Target::Current)
    }

    pub fn first_child_of<'t>(&mut self, node: impl Into<Target<'t>>) -> &mut Self {
        self.step("first_child", node.into(), |doc, n| doc.first_child(n))
    }

    /// Last child node, text nodes included
    pub fn last_child(&mut self) -> &mut Self {
        self.last_child_of(Target::Current)
    }

    pub fn last_child_of<'t>(&mut self, node: impl Into<Target<'t>>) -> &mut Self {
        self.step("last_child", node.into(), |doc, n| doc.last_child(n))
    }

    /// Previous element sibling
    pub fn previous(&mut self) -> &mut Self {
        self.previous_of(Target::Current)
    }

    pub fn previous_of<'t>(&mut self, node: impl Into<Target<'t>>) -> &mut Self {
        self.step("previous", node.into(), |doc, n| doc.previous_element_sibling(n))
    }

    /// Next element sibling
    pub fn next(&mut self) -> &mut Self {
        self.next_of(Target::Current)
    }

    pub fn next_of<'t>(&mut self, node: impl Into<Target<'t>>) -> &mut Self {
        self.step("next", node.into(), |doc, n| doc.next_element_sibling(n))
    }

    /// Element children of the current node into the node set
    pub fn children(&mut self) -> &mut Self {
        self.children_of(Target::Current)
    }

    pub fn children_of<'t>(&mut self, node: impl Into<Target<'t>>) -> &mut Self {
        self.step_set("children", node.into(), |doc, n| doc.element_children(n))
    }

    /// Element siblings of the current node into the node set
    pub fn siblings(&mut self) -> &mut Self {
        self.siblings_of(Target::Current)
    }

    pub fn siblings_of<'t>(&mut self, node: impl Into<Target<'t>>) -> &mut Self {
        self.step_set("siblings", node.into(), |doc, n| doc.element_siblings(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuilderError;

    fn page() -> Document {
        Document::parse_html(
            "<form id=\"f\"><input name=\"a\"><input name=\"b\"></form>\
             <ul id=\"list\"><li>1</li><li class=\"x\">2</li><li>3</li></ul>",
        )
        .unwrap()
    }

    #[test]
    fn test_query_scopes() {
        let mut doc = page();
        let form = doc.find_by_id("f").unwrap();
        let mut builder = Builder::new(&mut doc);

        builder.query("li.x").unwrap();
        assert_eq!(builder.document().text_content(builder.node().unwrap()).unwrap(), "2");

        builder.select(form).save_as("form").unwrap();
        builder.query_in("input", "form").unwrap();
        assert_eq!(builder.document().get_attribute(builder.node().unwrap(), "name"), Some("a"));

        builder.select(form).query_on("li").unwrap();
        assert_eq!(builder.node(), None);

        builder.query_all_in("input", "form").unwrap();
        assert_eq!(builder.nodes().len(), 2);
    }

    #[test]
    fn test_unknown_scope_name_finds_nothing() {
        let mut doc = page();
        let mut builder = Builder::new(&mut doc);
        builder.query_in("li", "nowhere").unwrap();
        assert_eq!(builder.node(), None);
    }

    #[test]
    fn test_bad_selector_is_reported() {
        let mut doc = page();
        let mut builder = Builder::new(&mut doc);
        let err = builder.query("li >").unwrap_err();
        assert!(matches!(err, BuilderError::Dom(dom::DomError::UnsupportedSelector(_))));
    }

    #[test]
    fn test_sibling_navigation() {
        let mut doc = page();
        let list = doc.find_by_id("list").unwrap();
        let items = doc.element_children(list);
        let mut builder = Builder::on(&mut doc, items[1]);

        builder.previous();
        assert_eq!(builder.node(), Some(items[0]));
        builder.next().next();
        assert_eq!(builder.node(), Some(items[2]));
        builder.next();
        assert_eq!(builder.node(), None);

        builder.parent();
        assert_eq!(builder.node(), None);
        builder.parent_of(items[0]);
        assert_eq!(builder.node(), Some(list));
        builder.last_child();
        assert_eq!(builder.node(), Some(items[2]));
        builder.first_child_of(list);
        assert_eq!(builder.node(), Some(items[0]));
    }

    #[test]
    fn test_miss_then_mutation_faults() {
        let mut doc = page();
        let mut builder = Builder::new(&mut doc);
        builder.select_id("missing");
        let err = builder.append_new("div").unwrap_err();
        assert!(matches!(err, BuilderError::NoCurrentNode));
    }

    #[test]
    fn test_set_navigation() {
        let mut doc = page();
        let list = doc.find_by_id("list").unwrap();
        let items = doc.element_children(list);
        let mut builder = Builder::on(&mut doc, list);

        builder.children();
        assert_eq!(builder.nodes(), items.as_slice());

        builder.siblings_of(items[0]);
        assert_eq!(builder.nodes(), &items[1..]);

        builder.select_id("missing").children();
        assert!(builder.nodes().is_empty());
    }
}
