//! Host document tree for the node builder
//!
//! An arena-backed stand-in for the browser document API: node creation,
//! attributes, class list and inline style, tree navigation, structural
//! insert/remove/clone, HTML parsing and serialization, selector queries and
//! event listener registration.
//!
//! ## Core Design
//!
//! ```text
//! markup ──html5ever──→ Document (Vec<DomNode>) ──→ outer_html / text_content
//!                            ↓
//!                      NodeId (u32 index)
//! ```
//!
//! A `NodeId` is the node's identity. Removing a node only unlinks it, so
//! any handle kept elsewhere stays valid and the node can be put back.

pub mod arena;
pub mod error;
pub mod events;
pub mod parser;
pub mod selector;
pub mod serializer;
pub mod style;
pub mod types;
pub mod utils;

pub use arena::Document;
pub use error::{DomError, Result};
pub use events::{DomEvent, Listener, ListenerId};
pub use selector::Selector;
pub use serializer::{HtmlSerializer, SerializerConfig};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_serialize() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let text = doc.create_text("hi");
        doc.append_child(doc.root_id(), div).unwrap();
        doc.append_child(div, text).unwrap();
        doc.set_attribute(div, "id", "greeting").unwrap();

        assert_eq!(doc.find_by_id("greeting"), Some(div));
        assert_eq!(doc.outer_html(div).unwrap(), "<div id=\"greeting\">hi</div>");
    }
}
