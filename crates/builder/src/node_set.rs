//! Node set operations
//!
//! The node set is a plain list that lives next to the cursor. It is filled
//! by `query_all`, `children` and `siblings` or by hand, and none of these
//! calls consult the condition gate.

use dom::{Document, NodeId};

use crate::builder::Builder;
use crate::error::Result;
use crate::target::Target;

impl Builder<'_> {
    /// Push a node onto the set
    pub fn set_add<'t>(&mut self, node: impl Into<Target<'t>>) -> Result<&mut Self> {
        let node = self.resolve_required(node.into())?;
        self.current_set.push(node);
        Ok(self)
    }

    pub fn set_get(&self, index: usize) -> Option<NodeId> {
        self.current_set.get(index).copied()
    }

    /// Make the set member at `index` current (nothing when out of range)
    pub fn set_select(&mut self, index: usize) -> &mut Self {
        self.current = self.set_get(index);
        self
    }

    /// Make the first member whose attribute `name` is non-empty and equals
    /// `value` current
    pub fn set_select_by_attr(&mut self, name: &str, value: &str) -> &mut Self {
        let doc: &Document = &*self.doc;
        self.current = self.current_set.iter().copied().find(|&node| {
            doc.get_attribute(node, name)
                .is_some_and(|v| !v.is_empty() && v == value)
        });
        self
    }

    /// Drop the first occurrence of a node from the set; a miss is a no-op
    pub fn set_remove<'t>(&mut self, node: impl Into<Target<'t>>) -> &mut Self {
        if let Some(node) = self.resolve(node.into()) {
            if let Some(index) = self.current_set.iter().position(|&n| n == node) {
                self.current_set.remove(index);
            }
        }
        self
    }

    pub fn set_remove_last(&mut self) -> &mut Self {
        self.current_set.pop();
        self
    }

    pub fn set_flush(&mut self) -> &mut Self {
        self.current_set.clear();
        self
    }

    /// Append `child` to every member in turn
    ///
    /// A node has one parent, so a single child ends up under the last
    /// member.
    pub fn set_append<'t>(&mut self, child: impl Into<Target<'t>>) -> Result<&mut Self> {
        let child = self.resolve_required(child.into())?;
        for &member in &self.current_set {
            self.doc.append_child(member, child)?;
        }
        Ok(self)
    }

    /// Append every member to `parent`, in set order
    pub fn set_append_to<'t>(&mut self, parent: impl Into<Target<'t>>) -> Result<&mut Self> {
        let parent = self.resolve_required(parent.into())?;
        for &member in &self.current_set {
            self.doc.append_child(parent, member)?;
        }
        Ok(self)
    }

    /// Run `f` once per member with a fresh builder positioned on it
    ///
    /// `f` receives the member builder, its index and this builder's
    /// current node. Nothing carries over between iterations.
    pub fn for_each<F>(&mut self, mut f: F) -> Result<&mut Self>
    where
        F: FnMut(&mut Builder<'_>, usize, Option<NodeId>) -> Result<()>,
    {
        let members = self.current_set.clone();
        let outer = self.current;
        for (index, node) in members.into_iter().enumerate() {
            let mut member = self.child(Some(node));
            f(&mut member, index, outer)?;
        }
        Ok(self)
    }

    /// Run `f` with the document and the node set
    pub fn perform_set<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Document, &[NodeId]),
    {
        f(&mut *self.doc, &self.current_set);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (Document, Vec<NodeId>) {
        let doc = Document::parse_html(
            "<div class=\"cell\" data-k=\"a\"></div>\
             <div class=\"cell\" data-k=\"\"></div>\
             <div class=\"cell\" data-k=\"b\"></div>",
        )
        .unwrap();
        let cells = doc.find_by_tag("div");
        (doc, cells)
    }

    #[test]
    fn test_manual_set() {
        let (mut doc, cells) = table();
        let mut builder = Builder::on(&mut doc, cells[0]);

        builder.set_add(Target::Current).unwrap().set_add(cells[2]).unwrap();
        assert_eq!(builder.nodes(), &[cells[0], cells[2]]);
        assert_eq!(builder.set_get(1), Some(cells[2]));
        assert_eq!(builder.set_get(5), None);

        builder.set_remove(cells[1]);
        assert_eq!(builder.nodes().len(), 2);
        builder.set_remove(cells[0]).set_remove_last();
        assert!(builder.nodes().is_empty());
    }

    #[test]
    fn test_select_from_set() {
        let (mut doc, cells) = table();
        let mut builder = Builder::new(&mut doc);
        builder.query_all(".cell").unwrap();

        builder.set_select(2);
        assert_eq!(builder.node(), Some(cells[2]));
        builder.set_select_by_attr("data-k", "");
        assert_eq!(builder.node(), None);
        builder.set_select_by_attr("data-k", "a");
        assert_eq!(builder.node(), Some(cells[0]));
        builder.set_select(9);
        assert_eq!(builder.node(), None);
    }

    #[test]
    fn test_set_append_to_and_for_each() {
        let (mut doc, cells) = table();
        let mut builder = Builder::new(&mut doc);

        builder.create("section").save_as("target").unwrap();
        builder.query_all(".cell").unwrap().set_append_to("target").unwrap();
        let section = builder.node().unwrap();
        assert_eq!(builder.document().children(section), cells.as_slice());

        builder
            .for_each(|cell, index, outer| {
                assert_eq!(outer, Some(section));
                cell.text(&index.to_string())?;
                Ok(())
            })
            .unwrap();
        assert_eq!(builder.document().text_content(section).unwrap(), "012");
    }

    #[test]
    fn test_set_append_lands_in_last_member() {
        let (mut doc, cells) = table();
        let mut builder = Builder::new(&mut doc);
        builder.query_all(".cell").unwrap().create("em");
        let em = builder.node().unwrap();

        builder.set_append(em).unwrap();
        assert_eq!(builder.document().parent(em), Some(cells[2]));
    }

    #[test]
    fn test_set_is_independent_of_cursor() {
        let (mut doc, cells) = table();
        let mut builder = Builder::new(&mut doc);
        builder.query_all(".cell").unwrap().select(cells[1]).set_flush();
        assert_eq!(builder.node(), Some(cells[1]));
        assert!(builder.nodes().is_empty());
    }
}
