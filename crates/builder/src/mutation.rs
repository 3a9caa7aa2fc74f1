//! Structural edits, creation and copy
//!
//! Edits that move existing nodes are gated. Creation and copy are not:
//! they only produce nodes, and the gate is reserved for changes to nodes
//! that already exist.

use dom::NodeId;

use crate::builder::Builder;
use crate::error::Result;
use crate::props::Props;
use crate::target::Target;

impl Builder<'_> {
    // ------------------------------------------------------------------
    // Gated structural edits
    // ------------------------------------------------------------------

    /// Append `child` to the current node and move onto it
    pub fn append<'t>(&mut self, child: impl Into<Target<'t>>) -> Result<&mut Self> {
        self.append_child(child.into(), false)
    }

    /// Append `child` to the current node and stay on the parent
    pub fn append_keep<'t>(&mut self, child: impl Into<Target<'t>>) -> Result<&mut Self> {
        self.append_child(child.into(), true)
    }

    fn append_child(&mut self, child: Target<'_>, keep: bool) -> Result<&mut Self> {
        if !self.pass_gate("append") {
            return Ok(self);
        }
        let parent = self.require_current()?;
        let child = self.resolve_required(child)?;
        self.doc.append_child(parent, child)?;
        tracing::trace!("Builder {}: appended {} to {}", self.id, child, parent);
        if !keep {
            self.current = Some(child);
        }
        Ok(self)
    }

    /// Append several nodes to the current node, in order
    pub fn append_many<'t, I, T>(&mut self, children: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Target<'t>>,
    {
        if !self.pass_gate("append_many") {
            return Ok(self);
        }
        let parent = self.require_current()?;
        for child in children {
            let child = self.resolve_required(child.into())?;
            self.doc.append_child(parent, child)?;
        }
        Ok(self)
    }

    /// Put `node` right before the current node
    pub fn insert_before<'t>(&mut self, node: impl Into<Target<'t>>) -> Result<&mut Self> {
        if !self.pass_gate("insert_before") {
            return Ok(self);
        }
        let reference = self.require_current()?;
        let node = self.resolve_required(node.into())?;
        self.doc.insert_before(reference, node)?;
        Ok(self)
    }

    /// Put `node` right after the current node
    pub fn insert_after<'t>(&mut self, node: impl Into<Target<'t>>) -> Result<&mut Self> {
        if !self.pass_gate("insert_after") {
            return Ok(self);
        }
        let reference = self.require_current()?;
        let node = self.resolve_required(node.into())?;
        self.doc.insert_after(reference, node)?;
        Ok(self)
    }

    /// Put the current node right before `target`
    pub fn place_before<'t>(&mut self, target: impl Into<Target<'t>>) -> Result<&mut Self> {
        if !self.pass_gate("place_before") {
            return Ok(self);
        }
        let node = self.require_current()?;
        let reference = self.resolve_required(target.into())?;
        self.doc.insert_before(reference, node)?;
        Ok(self)
    }

    /// Put the current node right after `target`
    pub fn place_after<'t>(&mut self, target: impl Into<Target<'t>>) -> Result<&mut Self> {
        if !self.pass_gate("place_after") {
            return Ok(self);
        }
        let node = self.require_current()?;
        let reference = self.resolve_required(target.into())?;
        self.doc.insert_after(reference, node)?;
        Ok(self)
    }

    /// Append the current node to `parent`
    pub fn append_to<'t>(&mut self, parent: impl Into<Target<'t>>) -> Result<&mut Self> {
        if !self.pass_gate("append_to") {
            return Ok(self);
        }
        let node = self.require_current()?;
        let parent = self.resolve_required(parent.into())?;
        self.doc.append_child(parent, node)?;
        Ok(self)
    }

    /// Swap with the previous element sibling, or hop out before the parent
    pub fn move_up(&mut self) -> Result<&mut Self> {
        if !self.pass_gate("move_up") {
            return Ok(self);
        }
        let node = self.require_current()?;
        let reference = self
            .doc
            .previous_element_sibling(node)
            .or_else(|| self.doc.parent(node));
        if let Some(reference) = reference {
            self.doc.insert_before(reference, node)?;
        }
        Ok(self)
    }

    /// Swap with the next element sibling, or hop out after the parent
    pub fn move_down(&mut self) -> Result<&mut Self> {
        if !self.pass_gate("move_down") {
            return Ok(self);
        }
        let node = self.require_current()?;
        let reference = self
            .doc
            .next_element_sibling(node)
            .or_else(|| self.doc.parent(node));
        if let Some(reference) = reference {
            self.doc.insert_after(reference, node)?;
        }
        Ok(self)
    }

    /// Remove the current node; the cursor moves to its previous element
    /// sibling, else its parent
    pub fn remove(&mut self) -> Result<&mut Self> {
        self.remove_target(Target::Current, false)
    }

    /// Remove `node`; the cursor moves as for `remove`
    pub fn remove_node<'t>(&mut self, node: impl Into<Target<'t>>) -> Result<&mut Self> {
        self.remove_target(node.into(), false)
    }

    /// Remove `node` and leave the cursor alone
    pub fn remove_node_keep<'t>(&mut self, node: impl Into<Target<'t>>) -> Result<&mut Self> {
        self.remove_target(node.into(), true)
    }

    fn remove_target(&mut self, target: Target<'_>, keep: bool) -> Result<&mut Self> {
        if !self.pass_gate("remove") {
            return Ok(self);
        }
        let node = self.resolve_required(target)?;
        let next = self
            .doc
            .previous_element_sibling(node)
            .or_else(|| self.doc.parent(node));
        self.doc.remove(node)?;
        tracing::trace!("Builder {}: removed {}", self.id, node);
        if !keep {
            self.current = next;
        }
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a detached element and move onto it
    pub fn create(&mut self, tag: &str) -> &mut Self {
        let node = self.doc.create_element(tag);
        tracing::trace!("Builder {}: created <{}> {}", self.id, tag, node);
        self.current = Some(node);
        self
    }

    /// Create a detached element and hand it to `f` in a fresh builder
    ///
    /// `f` also receives this builder's current node. The cursor here does
    /// not move.
    pub fn create_with<F>(&mut self, tag: &str, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Builder<'_>, Option<NodeId>) -> Result<()>,
    {
        let node = self.doc.create_element(tag);
        let outer = self.current;
        let mut inner = self.child(Some(node));
        f(&mut inner, outer)?;
        Ok(self)
    }

    /// Create a detached element with attributes and move onto it
    pub fn create_set(&mut self, tag: &str, props: impl Into<Props>) -> Result<&mut Self> {
        let node = self.new_element_with(tag, props.into())?;
        self.current = Some(node);
        Ok(self)
    }

    fn new_element_with(&mut self, tag: &str, props: Props) -> Result<NodeId> {
        let node = self.doc.create_element(tag);
        self.apply_props(node, props)?;
        Ok(node)
    }

    /// Create an element as last child of the current node and move onto it
    pub fn append_new(&mut self, tag: &str) -> Result<&mut Self> {
        self.append_created(tag, None, false)
    }

    /// Create an element as last child of the current node and stay
    pub fn append_new_keep(&mut self, tag: &str) -> Result<&mut Self> {
        self.append_created(tag, None, true)
    }

    pub fn append_new_set(&mut self, tag: &str, props: impl Into<Props>) -> Result<&mut Self> {
        self.append_created(tag, Some(props.into()), false)
    }

    pub fn append_new_set_keep(&mut self, tag: &str, props: impl Into<Props>) -> Result<&mut Self> {
        self.append_created(tag, Some(props.into()), true)
    }

    fn append_created(&mut self, tag: &str, props: Option<Props>, keep: bool) -> Result<&mut Self> {
        let parent = self.require_current()?;
        let node = match props {
            Some(props) => self.new_element_with(tag, props)?,
            None => self.doc.create_element(tag),
        };
        self.doc.append_child(parent, node)?;
        tracing::trace!("Builder {}: appended new <{}> {} to {}", self.id, tag, node, parent);
        if !keep {
            self.current = Some(node);
        }
        Ok(self)
    }

    /// Create an element right before the current node and move onto it
    pub fn add_before(&mut self, tag: &str) -> Result<&mut Self> {
        let reference = self.require_current()?;
        let node = self.doc.create_element(tag);
        self.doc.insert_before(reference, node)?;
        self.current = Some(node);
        Ok(self)
    }

    /// Create an element right after the current node and move onto it
    pub fn add_after(&mut self, tag: &str) -> Result<&mut Self> {
        self.added_after(tag, None, false)
    }

    pub fn add_after_set(&mut self, tag: &str, props: impl Into<Props>) -> Result<&mut Self> {
        self.added_after(tag, Some(props.into()), false)
    }

    /// As `add_after_set`, staying on the original node
    pub fn add_after_set_keep(&mut self, tag: &str, props: impl Into<Props>) -> Result<&mut Self> {
        self.added_after(tag, Some(props.into()), true)
    }

    fn added_after(&mut self, tag: &str, props: Option<Props>, keep: bool) -> Result<&mut Self> {
        let reference = self.require_current()?;
        let node = match props {
            Some(props) => self.new_element_with(tag, props)?,
            None => self.doc.create_element(tag),
        };
        self.doc.insert_after(reference, node)?;
        if !keep {
            self.current = Some(node);
        }
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Copy
    // ------------------------------------------------------------------

    /// Deep-copy the current node right after itself and move onto the copy
    pub fn copy(&mut self) -> Result<&mut Self> {
        self.copy_to(Target::Current, true, true)
    }

    /// Copy `source` right after the current node and move onto the copy
    pub fn copy_after<'t>(&mut self, source: impl Into<Target<'t>>, deep: bool) -> Result<&mut Self> {
        self.copy_to(source.into(), deep, true)
    }

    /// Copy `source` right before the current node and move onto the copy
    pub fn copy_before<'t>(&mut self, source: impl Into<Target<'t>>, deep: bool) -> Result<&mut Self> {
        self.copy_to(source.into(), deep, false)
    }

    fn copy_to(&mut self, source: Target<'_>, deep: bool, after: bool) -> Result<&mut Self> {
        let reference = self.require_current()?;
        let source = self.resolve_required(source)?;
        let clone = self.doc.clone_node(source, deep)?;
        if after {
            self.doc.insert_after(reference, clone)?;
        } else {
            self.doc.insert_before(reference, clone)?;
        }
        tracing::trace!("Builder {}: copied {} as {}", self.id, source, clone);
        self.current = Some(clone);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuilderError;
    use dom::{Document, DomError};

    fn list() -> (Document, NodeId, Vec<NodeId>) {
        let doc = Document::parse_html(
            "<ul id=\"list\"><li id=\"a\">a</li><li id=\"b\">b</li><li id=\"c\">c</li></ul>",
        )
        .unwrap();
        let ul = doc.find_by_id("list").unwrap();
        let items = doc.element_children(ul);
        (doc, ul, items)
    }

    #[test]
    fn test_append_moves_cursor_unless_kept() {
        let (mut doc, ul, _) = list();
        let mut builder = Builder::on(&mut doc, ul);

        builder.append_new("li").unwrap();
        let first = builder.node().unwrap();
        assert_eq!(builder.document().parent(first), Some(ul));

        builder.select(ul).append_new_keep("li").unwrap();
        assert_eq!(builder.node(), Some(ul));
        assert_eq!(builder.document().children(ul).len(), 5);
    }

    #[test]
    fn test_append_existing_and_keep() {
        let (mut doc, ul, items) = list();
        let mut builder = Builder::on(&mut doc, ul);

        builder.append_keep(items[0]).unwrap();
        assert_eq!(builder.node(), Some(ul));
        assert_eq!(builder.document().children(ul), &[items[1], items[2], items[0]]);

        builder.append(items[1]).unwrap();
        assert_eq!(builder.node(), Some(items[1]));
    }

    #[test]
    fn test_append_into_self_is_rejected() {
        let (mut doc, ul, items) = list();
        let mut builder = Builder::on(&mut doc, items[0]);
        let err = builder.append(ul).unwrap_err();
        assert!(matches!(err, BuilderError::Dom(DomError::HierarchyRequest { .. })));
    }

    #[test]
    fn test_append_many_in_order() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let a = doc.create_element("i");
        let b = doc.create_element("b");
        let mut builder = Builder::on(&mut doc, root);
        builder.create("p").append_to(root).unwrap();
        builder.append_many([a, b]).unwrap();

        let p = builder.node().unwrap();
        assert_eq!(builder.document().children(p), &[a, b]);
    }

    #[test]
    fn test_relative_inserts() {
        let (mut doc, ul, items) = list();
        let mut builder = Builder::on(&mut doc, items[1]);

        builder.insert_before(items[2]).unwrap();
        assert_eq!(builder.document().children(ul), &[items[0], items[2], items[1]]);

        builder.place_before(items[0]).unwrap();
        assert_eq!(builder.document().children(ul), &[items[1], items[0], items[2]]);

        builder.insert_after(items[2]).unwrap();
        assert_eq!(builder.document().children(ul), &[items[1], items[2], items[0]]);

        builder.place_after(items[0]).unwrap();
        assert_eq!(builder.document().children(ul), &[items[2], items[0], items[1]]);
    }

    #[test]
    fn test_move_up_middle_child() {
        let (mut doc, ul, items) = list();
        let mut builder = Builder::on(&mut doc, items[1]);

        builder.move_up().unwrap();
        assert_eq!(builder.document().children(ul), &[items[1], items[0], items[2]]);
    }

    #[test]
    fn test_move_hops_over_parent() {
        let (mut doc, ul, items) = list();
        let body = doc.parent(ul).unwrap();
        let mut builder = Builder::on(&mut doc, items[0]);

        builder.move_up().unwrap();
        assert_eq!(builder.document().children(body), &[items[0], ul]);

        builder.select(items[2]).move_down().unwrap();
        assert_eq!(builder.document().children(body), &[items[0], ul, items[2]]);
        assert_eq!(builder.document().children(ul), &[items[1]]);
    }

    #[test]
    fn test_remove_moves_cursor() {
        let (mut doc, ul, items) = list();
        let mut builder = Builder::on(&mut doc, items[1]);

        builder.remove().unwrap();
        assert_eq!(builder.node(), Some(items[0]));
        builder.remove().unwrap();
        assert_eq!(builder.node(), Some(ul));
        assert_eq!(builder.document().children(ul), &[items[2]]);

        builder.remove_node_keep(items[2]).unwrap();
        assert_eq!(builder.node(), Some(ul));
        assert!(builder.document().children(ul).is_empty());
    }

    #[test]
    fn test_remove_saved_node() {
        let (mut doc, ul, items) = list();
        let mut builder = Builder::on(&mut doc, items[2]);
        builder.save_as("last").unwrap();

        builder.select(ul).remove_node("last").unwrap();
        assert_eq!(builder.node(), Some(items[1]));
    }

    #[test]
    fn test_gated_off_edit_is_noop() {
        let (mut doc, ul, items) = list();
        let mut builder = Builder::on(&mut doc, items[1]);

        builder.condition(false).remove().unwrap();
        assert_eq!(builder.node(), Some(items[1]));
        assert_eq!(builder.document().children(ul).len(), 3);

        builder.remove().unwrap();
        assert_eq!(builder.document().children(ul).len(), 2);
    }

    #[test]
    fn test_creation_is_not_gated() {
        let (mut doc, ul, _) = list();
        let mut builder = Builder::on(&mut doc, ul);

        builder.condition(false).append_new("li").unwrap();
        assert_eq!(builder.document().children(ul).len(), 4);
        // the pending decision is still there for the next gated call
        assert!(!builder.gate().value);
    }

    #[test]
    fn test_create_with_does_not_move_cursor() {
        let (mut doc, ul, _) = list();
        let mut builder = Builder::on(&mut doc, ul);

        builder
            .create_with("li", |item, parent| {
                item.text("made")?.append_to(parent)?;
                Ok(())
            })
            .unwrap();
        assert_eq!(builder.node(), Some(ul));
        let last = builder.document().last_child(ul).unwrap();
        assert_eq!(builder.document().text_content(last).unwrap(), "made");
    }

    #[test]
    fn test_set_variants() {
        let (mut doc, ul, items) = list();
        let mut builder = Builder::on(&mut doc, ul);

        builder.append_new_set_keep("li", ("class", "new")).unwrap();
        assert_eq!(builder.node(), Some(ul));
        let added = builder.document().last_child(ul).unwrap();
        assert!(builder.document().has_class(added, "new"));

        builder.select(items[0]).add_after_set_keep("li", ("id", "a2")).unwrap();
        assert_eq!(builder.node(), Some(items[0]));
        let a2 = builder.document().find_by_id("a2").unwrap();
        assert_eq!(builder.document().next_element_sibling(items[0]), Some(a2));

        builder.add_before("li").unwrap();
        assert_eq!(builder.document().next_element_sibling(builder.node().unwrap()), Some(items[0]));

        builder.create_set("span", ("title", "t")).unwrap();
        let span = builder.node().unwrap();
        assert!(!builder.document().is_connected(span));
        assert_eq!(builder.document().get_attribute(span, "title"), Some("t"));
    }

    #[test]
    fn test_copy_variants() {
        let (mut doc, ul, items) = list();
        let mut builder = Builder::on(&mut doc, items[0]);

        builder.copy().unwrap();
        let deep = builder.node().unwrap();
        assert_eq!(builder.document().text_content(deep).unwrap(), "a");
        assert_eq!(builder.document().children(ul)[1], deep);

        builder.select(items[2]).copy_before(items[1], false).unwrap();
        let shallow = builder.node().unwrap();
        assert!(builder.document().children(shallow).is_empty());
        assert_eq!(builder.document().next_element_sibling(shallow), Some(items[2]));
    }
}
