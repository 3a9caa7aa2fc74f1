//! Core type definitions for the host tree
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Use SmallVec for small arrays (avoid heap allocation)
//! 3. Keep attribute order stable so serialization is deterministic

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node identifier (index into arena)
///
/// Identity is the index itself: two handles are the same node iff they are
/// equal. Nodes are never freed, so a handle stays valid for the lifetime of
/// its document.
pub type NodeId = u32;

/// Node type, numbered like the DOM specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
}

/// Per-element state that is a property rather than an attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// `value` property (form controls)
    pub value: Option<String>,
    /// `checked` property (checkboxes, radios)
    pub checked: bool,
}

/// The main tree node structure
///
/// Design philosophy:
/// - Small fixed-size fields first (better packing)
/// - Use indices instead of pointers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    // Navigation indices
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>, // Most nodes have <4 children

    /// Lower-case tag name for elements, `#text` / `#comment` / `#document` otherwise
    pub node_name: String,
    /// Character data for text and comment nodes
    pub node_value: String,
    /// Attributes in insertion order
    pub attributes: Vec<(String, String)>,

    pub state: ElementState,
}

impl DomNode {
    /// Create a new node with required fields
    pub fn new(node_id: NodeId, node_type: NodeType, node_name: String) -> Self {
        Self {
            node_id,
            node_type,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name,
            node_value: String::new(),
            attributes: Vec::new(),
            state: ElementState::default(),
        }
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.node_name)
        } else {
            None
        }
    }

    /// Check if node is an element
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if node is text
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set or overwrite an attribute, keeping its original slot
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => {
                existing.clear();
                existing.push_str(value);
            }
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove an attribute, returns whether it was present
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(key, _)| key != name);
        before != self.attributes.len()
    }
}

/// Elements that never have children or a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];
