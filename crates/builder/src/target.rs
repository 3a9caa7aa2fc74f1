//! Ways to name a node in a builder call
//!
//! Most operations act on the current node, an explicit `NodeId`, or a node
//! saved in the registry under a name. `Target` covers the three; `Scope`
//! adds the whole document for queries.

use dom::NodeId;

/// Node operand of a builder call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// The builder's current node
    Current,
    Node(NodeId),
    /// First saved (non-detached) registry entry with this name
    Saved(&'a str),
}

impl From<NodeId> for Target<'_> {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(name: &'a str) -> Self {
        Target::Saved(name)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(name: &'a String) -> Self {
        Target::Saved(name)
    }
}

impl From<Option<NodeId>> for Target<'_> {
    fn from(node: Option<NodeId>) -> Self {
        node.map_or(Target::Current, Target::Node)
    }
}

/// Search root for selector queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    Document,
    /// The builder's current node (`"this"`)
    This,
    Saved(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for Scope<'a> {
    fn from(name: &'a str) -> Self {
        if name == "this" {
            Scope::This
        } else {
            Scope::Saved(name)
        }
    }
}

impl From<NodeId> for Scope<'_> {
    fn from(node: NodeId) -> Self {
        Scope::Node(node)
    }
}

impl From<Option<NodeId>> for Scope<'_> {
    fn from(node: Option<NodeId>) -> Self {
        node.map_or(Scope::Document, Scope::Node)
    }
}

/// Key for removing a registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey<'a> {
    Name(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for StoreKey<'a> {
    fn from(name: &'a str) -> Self {
        StoreKey::Name(name)
    }
}

impl From<NodeId> for StoreKey<'_> {
    fn from(node: NodeId) -> Self {
        StoreKey::Node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_this_keyword() {
        assert_eq!(Scope::from("this"), Scope::This);
        assert_eq!(Scope::from("form"), Scope::Saved("form"));
        assert_eq!(Scope::from(None), Scope::Document);
    }

    #[test]
    fn test_target_conversions() {
        assert_eq!(Target::from(4u32), Target::Node(4));
        assert_eq!(Target::from(None), Target::Current);
        assert_eq!(Target::from("row"), Target::Saved("row"));
    }
}
