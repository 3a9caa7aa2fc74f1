//! Saved and detached nodes
//!
//! The registry is an ordered list of entries. A *saved* entry is a plain
//! bookmark. A *detached* entry also carries the position the node was
//! unlinked from, so it can be put back later.
//!
//! Lookup rules:
//! - `load` / `Target::Saved` take the first saved entry with the name
//!   (the last saved entry when unnamed)
//! - `reattach` takes the last detached entry with the name (the last
//!   detached entry when unnamed)

use dom::{Document, NodeId};
use serde::{Deserialize, Serialize};

use crate::builder::Builder;
use crate::error::{BuilderError, Result};
use crate::target::{StoreKey, Target};

/// Where a detached node used to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    /// Right after this element sibling
    After(NodeId),
    /// Right before this element sibling
    Before(NodeId),
    /// Inside this parent
    Inside(NodeId),
}

impl Position {
    /// Previous element sibling wins, then next, then the parent
    pub fn capture(doc: &Document, node: NodeId) -> Option<Position> {
        doc.previous_element_sibling(node)
            .map(Position::After)
            .or_else(|| doc.next_element_sibling(node).map(Position::Before))
            .or_else(|| doc.parent(node).map(Position::Inside))
    }

    pub fn restore(self, doc: &mut Document, node: NodeId) -> dom::Result<()> {
        match self {
            Position::After(sibling) => doc.insert_after(sibling, node),
            Position::Before(sibling) => doc.insert_before(sibling, node),
            Position::Inside(parent) => doc.append_child(parent, node),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub node: NodeId,
    pub name: Option<String>,
    /// Set for detached entries
    pub position: Option<Position>,
}

impl RegistryEntry {
    pub fn is_detached(&self) -> bool {
        self.position.is_some()
    }

    fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: RegistryEntry) {
        self.entries.push(entry);
    }

    pub fn find_saved(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|e| !e.is_detached() && e.is_named(name))
    }

    pub fn last_saved(&self) -> Option<&RegistryEntry> {
        self.entries.iter().rev().find(|e| !e.is_detached())
    }

    /// Index of the detached entry `reattach` would use
    pub fn find_detached(&self, name: Option<&str>) -> Option<usize> {
        self.entries.iter().rposition(|e| {
            e.is_detached() && name.map_or(true, |n| e.is_named(n))
        })
    }

    /// Remove the first entry matching the key
    pub fn remove(&mut self, key: StoreKey<'_>) -> Option<RegistryEntry> {
        let index = self.entries.iter().position(|e| match key {
            StoreKey::Name(name) => e.is_named(name),
            StoreKey::Node(node) => e.node == node,
        })?;
        Some(self.entries.remove(index))
    }

    pub fn remove_at(&mut self, index: usize) -> Option<RegistryEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn pop(&mut self) -> Option<RegistryEntry> {
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Builder<'_> {
    /// Save the current node
    pub fn save(&mut self) -> Result<&mut Self> {
        self.save_target(Target::Current, None)
    }

    /// Save the current node under `name`
    pub fn save_as(&mut self, name: &str) -> Result<&mut Self> {
        self.save_target(Target::Current, Some(name))
    }

    /// Save any node, optionally named
    pub fn save_node<'t>(
        &mut self,
        node: impl Into<Target<'t>>,
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.save_target(node.into(), name)
    }

    fn save_target(&mut self, target: Target<'_>, name: Option<&str>) -> Result<&mut Self> {
        let node = self.resolve_required(target)?;
        tracing::debug!("Builder {}: saved node {} as {:?}", self.id, node, name);
        self.registry.push(RegistryEntry {
            node,
            name: name.map(str::to_string),
            position: None,
        });
        Ok(self)
    }

    /// Make the most recently saved node current
    pub fn load(&mut self) -> Result<&mut Self> {
        let entry = self
            .registry
            .last_saved()
            .ok_or_else(|| BuilderError::NotFound("saved node".to_string()))?;
        self.current = Some(entry.node);
        Ok(self)
    }

    /// Make the saved node named `name` current. The entry stays.
    pub fn load_named(&mut self, name: &str) -> Result<&mut Self> {
        let entry = self
            .registry
            .find_saved(name)
            .ok_or_else(|| BuilderError::NotFound(format!("saved node '{}'", name)))?;
        self.current = Some(entry.node);
        Ok(self)
    }

    /// Unlink the current node, recording where it was
    pub fn detach(&mut self) -> Result<&mut Self> {
        self.detach_target(Target::Current, None)
    }

    pub fn detach_as(&mut self, name: &str) -> Result<&mut Self> {
        self.detach_target(Target::Current, Some(name))
    }

    pub fn detach_node<'t>(
        &mut self,
        node: impl Into<Target<'t>>,
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.detach_target(node.into(), name)
    }

    /// Fails without touching document or registry when there is no
    /// position to record (root or already detached)
    fn detach_target(&mut self, target: Target<'_>, name: Option<&str>) -> Result<&mut Self> {
        let node = self.resolve_required(target)?;
        let position =
            Position::capture(&*self.doc, node).ok_or(BuilderError::NoPositionToRecord(node))?;
        self.doc.remove(node)?;
        tracing::debug!(
            "Builder {}: detached node {} from {:?} as {:?}",
            self.id,
            node,
            position,
            name
        );
        self.registry.push(RegistryEntry {
            node,
            name: name.map(str::to_string),
            position: Some(position),
        });
        Ok(self)
    }

    /// Put the most recently detached node back
    pub fn reattach(&mut self) -> Result<&mut Self> {
        self.reattach_entry(None)
    }

    /// Put the most recently detached node named `name` back
    pub fn reattach_named(&mut self, name: &str) -> Result<&mut Self> {
        self.reattach_entry(Some(name))
    }

    fn reattach_entry(&mut self, name: Option<&str>) -> Result<&mut Self> {
        let index = self
            .registry
            .find_detached(name)
            .ok_or_else(|| BuilderError::NothingToReattach(name.map(str::to_string)))?;
        let entry = &self.registry.entries()[index];
        let (node, position) = match entry.position {
            Some(position) => (entry.node, position),
            None => return Err(BuilderError::NothingToReattach(name.map(str::to_string))),
        };

        position.restore(&mut *self.doc, node)?;
        tracing::debug!("Builder {}: reattached node {} at {:?}", self.id, node, position);

        if self.config.consume_on_reattach {
            self.registry.remove_at(index);
        }
        Ok(self)
    }

    /// Remove the first entry with this name or node; a miss is a no-op
    pub fn store_remove<'k>(&mut self, key: impl Into<StoreKey<'k>>) -> &mut Self {
        let key = key.into();
        if self.registry.remove(key).is_none() {
            tracing::trace!("Builder {}: no registry entry for {:?}", self.id, key);
        }
        self
    }

    pub fn store_remove_last(&mut self) -> &mut Self {
        self.registry.pop();
        self
    }

    pub fn store_flush(&mut self) -> &mut Self {
        self.registry.clear();
        self
    }

    /// Run `f` with the document and the registry entries
    pub fn perform_store<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Document, &[RegistryEntry]),
    {
        f(&mut *self.doc, self.registry.entries());
        self
    }
}
