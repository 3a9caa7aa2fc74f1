//! Arena-based document tree
//!
//! "Bad programmers worry about the code. Good programmers worry about
//! data structures and their relationships."
//!
//! Every node of a document lives in one `Vec<DomNode>` and is addressed by
//! its index. Removing a node from the tree only unlinks it; the slot stays,
//! so a `NodeId` held by a caller (a builder cursor, a saved entry) remains
//! valid and can be reinserted later.
//!
//! ## Memory Layout
//!
//! ```text
//! Document: Vec<DomNode>
//!           [#document][html][head][body]...
//!            ↑ 4-byte index, not 8-byte pointer
//! ```

use crate::error::{DomError, Result};
use crate::events::ListenerRegistry;
use crate::types::{DomNode, NodeId, NodeType};

/// Arena-backed document
///
/// Design:
/// - Single Vec<DomNode> for sequential allocation
/// - Node 0 is always the `#document` root
/// - No Rc/Arc: use indices everywhere
/// - Nodes are never freed. Children dropped by `replace_children`,
///   `set_text_content` or `set_inner_html` stay in the arena, unlinked,
///   so a document whose content is rewritten repeatedly keeps growing.
///   Long-lived documents should edit text nodes in place instead.
#[derive(Debug)]
pub struct Document {
    /// All nodes stored sequentially, connected or not
    nodes: Vec<DomNode>,

    /// Root node ID
    root_id: NodeId,

    /// Event listeners keyed by node
    pub(crate) listeners: ListenerRegistry,
}

impl Document {
    /// Create a new empty document holding only the root node
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create document with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(DomNode::new(0, NodeType::Document, "#document".to_string()));
        Self {
            nodes,
            root_id: 0,
            listeners: ListenerRegistry::default(),
        }
    }

    fn push_node(&mut self, node_type: NodeType, node_name: String, value: String) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        let mut node = DomNode::new(node_id, node_type, node_name);
        node.node_value = value;
        self.nodes.push(node);
        node_id
    }

    /// Create a detached element, returns its ID
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeType::Element, tag.to_ascii_lowercase(), String::new())
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeType::Text, "#text".to_string(), text.to_string())
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push_node(NodeType::Comment, "#comment".to_string(), text.to_string())
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get element by ID, failing for non-element nodes
    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        let node = self.get_mut(node_id)?;
        if node.node_type != NodeType::Element {
            return Err(DomError::InvalidNodeType {
                expected: "element".to_string(),
                actual: node.node_name.clone(),
            });
        }
        Ok(node)
    }

    /// Get root node ID
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// Total number of nodes, connected or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The root is always present, so this is only true for a broken arena
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check whether a node is an element
    pub fn is_element(&self, node_id: NodeId) -> bool {
        self.get(node_id).map(|n| n.is_element()).unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Navigation. Unknown IDs navigate to nothing.
    // ------------------------------------------------------------------

    /// Parent of a node
    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id as usize).and_then(|n| n.parent_id)
    }

    /// All child nodes in order
    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id as usize)
            .map(|n| n.children_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Element children in order
    pub fn element_children(&self, node_id: NodeId) -> Vec<NodeId> {
        self.children(node_id)
            .iter()
            .copied()
            .filter(|&id| self.is_element(id))
            .collect()
    }

    pub fn first_child(&self, node_id: NodeId) -> Option<NodeId> {
        self.children(node_id).first().copied()
    }

    pub fn last_child(&self, node_id: NodeId) -> Option<NodeId> {
        self.children(node_id).last().copied()
    }

    fn index_in_parent(&self, node_id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(node_id)?;
        let index = self.children(parent).iter().position(|&c| c == node_id)?;
        Some((parent, index))
    }

    pub fn previous_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(node_id)?;
        index.checked_sub(1).map(|i| self.children(parent)[i])
    }

    pub fn next_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(node_id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Closest preceding sibling that is an element
    pub fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(node_id)?;
        self.children(parent)[..index]
            .iter()
            .rev()
            .copied()
            .find(|&id| self.is_element(id))
    }

    /// Closest following sibling that is an element
    pub fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(node_id)?;
        self.children(parent)[index + 1..]
            .iter()
            .copied()
            .find(|&id| self.is_element(id))
    }

    /// Element siblings of a node, excluding the node itself
    pub fn element_siblings(&self, node_id: NodeId) -> Vec<NodeId> {
        match self.parent(node_id) {
            Some(parent) => self
                .element_children(parent)
                .into_iter()
                .filter(|&id| id != node_id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Inclusive ancestor check
    pub fn contains(&self, ancestor: NodeId, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }

    /// Whether the node is reachable from the document root
    pub fn is_connected(&self, node_id: NodeId) -> bool {
        self.contains(self.root_id, node_id)
    }

    /// Traverse subtree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Descendants of a node in document order, excluding the node itself
    pub fn descendants(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node_id).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Find connected element by ID attribute
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root_id)
            .into_iter()
            .find(|&node_id| {
                self.get(node_id)
                    .map(|n| n.is_element() && n.attr("id") == Some(id))
                    .unwrap_or(false)
            })
    }

    /// Find all connected elements by tag name
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root_id)
            .into_iter()
            .filter(|&node_id| {
                self.get(node_id)
                    .map(|n| n.is_element() && n.node_name.eq_ignore_ascii_case(tag))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// The `<body>` element, if the document has one
    pub fn body(&self) -> Option<NodeId> {
        self.find_by_tag("body").first().copied()
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_node = self.get(parent)?;
        let child_node = self.get(child)?;
        if matches!(parent_node.node_type, NodeType::Text | NodeType::Comment)
            || child_node.node_type == NodeType::Document
            || self.contains(child, parent)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    /// Unlink a node from its parent. Parentless nodes are left alone.
    pub fn remove(&mut self, node_id: NodeId) -> Result<()> {
        let parent = self.get(node_id)?.parent_id;
        if let Some(parent_id) = parent {
            let parent = self.get_mut(parent_id)?;
            parent.children_ids.retain(|c| *c != node_id);
            self.get_mut(node_id)?.parent_id = None;
        }
        Ok(())
    }

    fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        let parent_node = self.get_mut(parent)?;
        let index = index.min(parent_node.children_ids.len());
        parent_node.children_ids.insert(index, child);
        self.get_mut(child)?.parent_id = Some(parent);
        Ok(())
    }

    /// Append `child` as last child of `parent`, moving it if attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insert(parent, child)?;
        self.remove(child)?;
        let end = self.children(parent).len();
        self.insert_at(parent, end, child)
    }

    /// Insert `node` immediately before `reference`
    ///
    /// No-op when `reference` has no parent.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        self.insert_relative(reference, node, 0)
    }

    /// Insert `node` immediately after `reference`
    ///
    /// No-op when `reference` has no parent.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        self.insert_relative(reference, node, 1)
    }

    fn insert_relative(&mut self, reference: NodeId, node: NodeId, offset: usize) -> Result<()> {
        self.get(node)?;
        let Some(parent) = self.get(reference)?.parent_id else {
            tracing::trace!("Relative insert against parentless node {}", reference);
            return Ok(());
        };
        if node == reference {
            return Ok(());
        }
        self.check_insert(parent, node)?;
        self.remove(node)?;
        // Index is computed after unlinking, the reference may have shifted
        let index = self
            .children(parent)
            .iter()
            .position(|&c| c == reference)
            .map(|i| i + offset)
            .unwrap_or(self.children(parent).len());
        self.insert_at(parent, index, node)
    }

    /// Replace all children of a node with the given detached nodes
    ///
    /// The old children are unlinked, not freed.
    pub fn replace_children(&mut self, node_id: NodeId, new_children: &[NodeId]) -> Result<()> {
        let old: Vec<NodeId> = self.children(node_id).to_vec();
        for child in old {
            self.remove(child)?;
        }
        for &child in new_children {
            self.append_child(node_id, child)?;
        }
        Ok(())
    }

    /// Clone a node; `deep` copies the whole subtree. Listeners are not copied.
    pub fn clone_node(&mut self, node_id: NodeId, deep: bool) -> Result<NodeId> {
        let copy = self.shallow_copy(node_id)?;
        if !deep {
            return Ok(copy);
        }

        // (source child, destination parent)
        let mut stack: Vec<(NodeId, NodeId)> = self
            .children(node_id)
            .iter()
            .rev()
            .map(|&c| (c, copy))
            .collect();

        while let Some((source, dest_parent)) = stack.pop() {
            let child_copy = self.shallow_copy(source)?;
            self.append_child(dest_parent, child_copy)?;
            for &grandchild in self.children(source).iter().rev() {
                stack.push((grandchild, child_copy));
            }
        }

        Ok(copy)
    }

    fn shallow_copy(&mut self, node_id: NodeId) -> Result<NodeId> {
        let source = self.get(node_id)?;
        if source.node_type == NodeType::Document {
            return Err(DomError::InvalidNodeType {
                expected: "element, text or comment".to_string(),
                actual: source.node_name.clone(),
            });
        }
        let mut node = source.clone();
        let copy_id = self.nodes.len() as NodeId;
        node.node_id = copy_id;
        node.parent_id = None;
        node.children_ids.clear();
        self.nodes.push(node);
        Ok(copy_id)
    }

    // ------------------------------------------------------------------
    // Attributes & element state
    // ------------------------------------------------------------------

    pub fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.get(node_id).ok().and_then(|n| n.attr(name))
    }

    pub fn has_attribute(&self, node_id: NodeId, name: &str) -> bool {
        self.get_attribute(node_id, name).is_some()
    }

    pub fn set_attribute(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        self.element_mut(node_id)?
            .set_attr(&name.to_ascii_lowercase(), value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        self.element_mut(node_id)?
            .remove_attr(&name.to_ascii_lowercase());
        Ok(())
    }

    /// `value` property, falling back to the `value` attribute
    pub fn value(&self, node_id: NodeId) -> Option<&str> {
        let node = self.get(node_id).ok()?;
        node.state.value.as_deref().or_else(|| node.attr("value"))
    }

    pub fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.element_mut(node_id)?.state.value = Some(value.to_string());
        Ok(())
    }

    pub fn checked(&self, node_id: NodeId) -> bool {
        self.get(node_id).map(|n| n.state.checked).unwrap_or(false)
    }

    pub fn set_checked(&mut self, node_id: NodeId, checked: bool) -> Result<()> {
        self.element_mut(node_id)?.state.checked = checked;
        Ok(())
    }

    /// `disabled` reflects the presence of the `disabled` attribute
    pub fn disabled(&self, node_id: NodeId) -> bool {
        self.has_attribute(node_id, "disabled")
    }

    pub fn set_disabled(&mut self, node_id: NodeId, disabled: bool) -> Result<()> {
        if disabled {
            self.set_attribute(node_id, "disabled", "")
        } else {
            self.remove_attribute(node_id, "disabled")
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
