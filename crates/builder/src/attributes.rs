//! Attribute, property, class, style and event setters
//!
//! All setters here are gated. Single-pair `set` is a raw attribute write;
//! the bulk form understands the reserved keys `text`, `html` and `event`
//! and converts camelCase keys to kebab-case.

use std::rc::Rc;

use dom::utils::camel_to_kebab;
use dom::{Document, DomEvent, Listener, ListenerId, NodeId};

use crate::builder::Builder;
use crate::error::{BuilderError, Result};
use crate::props::{Props, Value};

impl Builder<'_> {
    /// Write props onto `node` without consulting the gate
    pub(crate) fn apply_props(&mut self, node: NodeId, props: Props) -> Result<()> {
        match props {
            Props::Single(key, value) => match value.attribute_text() {
                Some(text) => self.doc.set_attribute(node, &key, text)?,
                None => self.doc.remove_attribute(node, &key)?,
            },
            Props::Bulk(pairs) => {
                for (key, value) in pairs {
                    self.apply_bulk_pair(node, &key, value)?;
                }
            }
        }
        Ok(())
    }

    fn apply_bulk_pair(&mut self, node: NodeId, key: &str, value: Value) -> Result<()> {
        match key {
            "text" => self.doc.set_text_content(node, value.as_text())?,
            "html" => self.doc.set_inner_html(node, value.as_text())?,
            "event" => match value {
                Value::Listener { event, callback } => {
                    self.last_listener = Some(self.doc.add_event_listener(node, &event, callback)?);
                }
                _ => return Err(BuilderError::InvalidEventProp),
            },
            _ => {
                let name = camel_to_kebab(key);
                match value.attribute_text() {
                    Some(text) => self.doc.set_attribute(node, &name, text)?,
                    None => self.doc.remove_attribute(node, &name)?,
                }
            }
        }
        Ok(())
    }

    /// Gate, then run `apply` against the current node
    fn gated<F>(&mut self, op: &str, apply: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self, NodeId) -> Result<()>,
    {
        if !self.pass_gate(op) {
            return Ok(self);
        }
        let node = self.require_current()?;
        apply(self, node)?;
        tracing::trace!("Builder {}: {} on {}", self.id, op, node);
        Ok(self)
    }

    /// Set attributes on the current node
    ///
    /// A single pair is written as given, a falsy value removes it. A list
    /// of pairs also accepts `text`, `html` and `event`.
    pub fn set(&mut self, props: impl Into<Props>) -> Result<&mut Self> {
        let props = props.into();
        self.gated("set", |b, node| b.apply_props(node, props))
    }

    /// Set inline style declarations; empty values remove a single
    /// declaration and are skipped in a list
    pub fn style(&mut self, props: impl Into<Props<String>>) -> Result<&mut Self> {
        let props = props.into();
        self.gated("style", |b, node| {
            match props {
                Props::Single(property, value) => {
                    b.doc.set_style_property(node, &property, &value)?
                }
                Props::Bulk(pairs) => {
                    for (property, value) in pairs.iter().filter(|(_, v)| !v.is_empty()) {
                        b.doc.set_style_property(node, property, value)?;
                    }
                }
            }
            Ok(())
        })
    }

    fn attribute(&mut self, op: &str, name: &str, value: &str) -> Result<&mut Self> {
        self.gated(op, |b, node| Ok(b.doc.set_attribute(node, name, value)?))
    }

    pub fn id(&mut self, value: &str) -> Result<&mut Self> {
        self.attribute("id", "id", value)
    }

    pub fn name(&mut self, value: &str) -> Result<&mut Self> {
        self.attribute("name", "name", value)
    }

    /// `type` attribute
    pub fn input_type(&mut self, value: &str) -> Result<&mut Self> {
        self.attribute("input_type", "type", value)
    }

    /// `for` attribute
    pub fn label_for(&mut self, value: &str) -> Result<&mut Self> {
        self.attribute("label_for", "for", value)
    }

    pub fn placeholder(&mut self, value: &str) -> Result<&mut Self> {
        self.attribute("placeholder", "placeholder", value)
    }

    pub fn href(&mut self, value: &str) -> Result<&mut Self> {
        self.attribute("href", "href", value)
    }

    /// Replace the whole `class` attribute
    pub fn class(&mut self, value: &str) -> Result<&mut Self> {
        self.attribute("class", "class", value)
    }

    /// `value` property (not the attribute)
    pub fn value(&mut self, value: &str) -> Result<&mut Self> {
        self.gated("value", |b, node| Ok(b.doc.set_value(node, value)?))
    }

    /// Replace the content with one text node
    pub fn text(&mut self, text: &str) -> Result<&mut Self> {
        self.gated("text", |b, node| Ok(b.doc.set_text_content(node, text)?))
    }

    /// Replace the content with parsed markup
    pub fn html(&mut self, html: &str) -> Result<&mut Self> {
        self.gated("html", |b, node| Ok(b.doc.set_inner_html(node, html)?))
    }

    /// Toggle each whitespace-separated class
    pub fn toggle(&mut self, classes: &str) -> Result<&mut Self> {
        self.gated("toggle", |b, node| {
            for class in classes.split_whitespace() {
                b.doc.toggle_class(node, class)?;
            }
            Ok(())
        })
    }

    pub fn class_add(&mut self, classes: &str) -> Result<&mut Self> {
        self.gated("class_add", |b, node| {
            let tokens: Vec<&str> = classes.split_whitespace().collect();
            Ok(b.doc.add_class(node, &tokens)?)
        })
    }

    pub fn class_remove(&mut self, classes: &str) -> Result<&mut Self> {
        self.gated("class_remove", |b, node| {
            let tokens: Vec<&str> = classes.split_whitespace().collect();
            Ok(b.doc.remove_class(node, &tokens)?)
        })
    }

    pub fn class_toggle(&mut self, classes: &str) -> Result<&mut Self> {
        self.toggle(classes)
    }

    /// Whether the current node has `class`. Not gated.
    pub fn has_class(&self, class: &str) -> bool {
        self.current
            .map(|node| self.doc.has_class(node, class))
            .unwrap_or(false)
    }

    pub fn disable(&mut self) -> Result<&mut Self> {
        self.gated("disable", |b, node| Ok(b.doc.set_disabled(node, true)?))
    }

    /// Disable when `disabled` holds, otherwise leave the node as it is
    pub fn disable_if(&mut self, disabled: bool) -> Result<&mut Self> {
        self.gated("disable_if", |b, node| {
            if disabled {
                b.doc.set_disabled(node, true)?;
            }
            Ok(())
        })
    }

    pub fn enable(&mut self) -> Result<&mut Self> {
        self.gated("enable", |b, node| Ok(b.doc.set_disabled(node, false)?))
    }

    /// Enable when `enabled` holds, otherwise leave the node as it is
    pub fn enable_if(&mut self, enabled: bool) -> Result<&mut Self> {
        self.gated("enable_if", |b, node| {
            if enabled {
                b.doc.set_disabled(node, false)?;
            }
            Ok(())
        })
    }

    pub fn checked(&mut self, checked: bool) -> Result<&mut Self> {
        self.gated("checked", |b, node| Ok(b.doc.set_checked(node, checked)?))
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register `callback` for `event_type` on the current node
    ///
    /// The handle is available from `last_listener()` afterwards.
    pub fn event<F>(&mut self, event_type: &str, callback: F) -> Result<&mut Self>
    where
        F: Fn(&mut Document, &DomEvent) + 'static,
    {
        self.event_listener(event_type, Rc::new(callback))
    }

    /// Register a listener the caller keeps a reference to
    pub fn event_listener(&mut self, event_type: &str, listener: Listener) -> Result<&mut Self> {
        self.gated("event", |b, node| {
            b.last_listener = Some(b.doc.add_event_listener(node, event_type, listener)?);
            Ok(())
        })
    }

    /// Remove a listener by identity
    pub fn event_remove(&mut self, event_type: &str, listener: &Listener) -> Result<&mut Self> {
        self.gated("event_remove", |b, node| {
            if !b.doc.remove_event_listener(node, event_type, listener) {
                tracing::trace!("Builder {}: no {} listener to remove on {}", b.id, event_type, node);
            }
            Ok(())
        })
    }

    /// Remove a listener by handle. Gated, but needs no current node.
    pub fn listener_remove(&mut self, id: ListenerId) -> &mut Self {
        if self.pass_gate("listener_remove") {
            self.doc.remove_listener(id);
        }
        self
    }

    /// Handle of the most recently registered listener
    pub fn last_listener(&self) -> Option<ListenerId> {
        self.last_listener
    }
}
