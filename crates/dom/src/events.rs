//! Event listeners - registration and dispatch
//!
//! Design: listeners are plain `Rc` closures stored per node. Every
//! registration hands back a `ListenerId`, and removal by callback compares
//! `Rc` pointers, so a caller that keeps either one can always unregister.
//!
//! Dispatch is driven by the embedder (the "event loop"): it calls
//! `Document::dispatch_event` whenever something happens. Listeners get the
//! document mutably and may rebuild parts of the tree.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;

use crate::arena::Document;
use crate::error::Result;
use crate::types::NodeId;

/// Event delivered to a listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomEvent {
    pub event_type: String,
    /// Node the event was dispatched to
    pub target: NodeId,
    /// Node whose listener is running (differs from `target` while bubbling)
    pub current_target: NodeId,
}

/// Listener callback
pub type Listener = Rc<dyn Fn(&mut Document, &DomEvent)>;

/// Handle returned by every registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

struct RegisteredListener {
    id: ListenerId,
    event_type: String,
    callback: Listener,
}

impl fmt::Debug for RegisteredListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredListener")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}

/// Per-document listener table
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    by_node: AHashMap<NodeId, SmallVec<[RegisteredListener; 2]>>,
    next_id: u32,
}

impl ListenerRegistry {
    fn add(&mut self, node_id: NodeId, event_type: &str, callback: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.by_node.entry(node_id).or_default().push(RegisteredListener {
            id,
            event_type: event_type.to_string(),
            callback,
        });
        id
    }

    fn remove_where<F>(&mut self, node_id: Option<NodeId>, predicate: F) -> bool
    where
        F: Fn(&RegisteredListener) -> bool,
    {
        let mut emptied = None;
        let mut removed = false;
        for (node, listeners) in self.by_node.iter_mut() {
            if node_id.is_some_and(|n| n != *node) {
                continue;
            }
            if let Some(index) = listeners.iter().position(&predicate) {
                listeners.remove(index);
                if listeners.is_empty() {
                    emptied = Some(*node);
                }
                removed = true;
                break;
            }
        }
        if let Some(node) = emptied {
            self.by_node.remove(&node);
        }
        removed
    }

    #[cfg(test)]
    fn tracked_nodes(&self) -> usize {
        self.by_node.len()
    }

    fn matching(&self, node_id: NodeId, event_type: &str) -> Vec<Listener> {
        self.by_node
            .get(&node_id)
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|l| l.event_type == event_type)
                    .map(|l| Rc::clone(&l.callback))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn count(&self, node_id: NodeId) -> usize {
        self.by_node.get(&node_id).map(|l| l.len()).unwrap_or(0)
    }
}

impl Document {
    /// Register a listener on a node
    pub fn add_event_listener(
        &mut self,
        node_id: NodeId,
        event_type: &str,
        callback: Listener,
    ) -> Result<ListenerId> {
        self.get(node_id)?;
        let id = self.listeners.add(node_id, event_type, callback);
        tracing::trace!("Listener {:?} added for '{}' on node {}", id, event_type, node_id);
        Ok(id)
    }

    /// Remove the first listener on `node_id` for `event_type` that is the same `Rc` as `callback`
    pub fn remove_event_listener(
        &mut self,
        node_id: NodeId,
        event_type: &str,
        callback: &Listener,
    ) -> bool {
        self.listeners.remove_where(Some(node_id), |l| {
            l.event_type == event_type && Rc::ptr_eq(&l.callback, callback)
        })
    }

    /// Remove a listener by its handle, wherever it is registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove_where(None, |l| l.id == id)
    }

    /// Number of listeners registered on a node
    pub fn listener_count(&self, node_id: NodeId) -> usize {
        self.listeners.count(node_id)
    }

    /// Dispatch an event at `target` and bubble it up through the ancestors
    ///
    /// Listeners are collected per node right before that node is visited,
    /// so a listener added during dispatch on an ancestor still runs.
    /// Returns the number of listeners invoked.
    pub fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<usize> {
        self.get(target)?;

        let mut path = vec![target];
        let mut cursor = self.parent(target);
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.parent(id);
        }

        let mut invoked = 0;
        for current_target in path {
            let event = DomEvent {
                event_type: event_type.to_string(),
                target,
                current_target,
            };
            for callback in self.listeners.matching(current_target, event_type) {
                callback(self, &event);
                invoked += 1;
            }
        }

        tracing::debug!("Dispatched '{}' at node {}: {} listener(s)", event_type, target, invoked);
        Ok(invoked)
    }
}
