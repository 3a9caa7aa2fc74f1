//! HTML parsing - markup into arena nodes
//!
//! Uses html5ever's RcDom and converts it into the arena. This is simpler
//! than implementing a TreeSink and the conversion is a straight walk.
//!
//! Whitespace-only text nodes are dropped during conversion so that child
//! navigation over parsed markup lands on meaningful nodes.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::arena::Document;
use crate::error::Result;
use crate::types::{NodeId, NodeType};

fn parse_rcdom(html: &str) -> Result<RcDom> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;
    Ok(dom)
}

/// Depth-first search for the first element with the given local name
fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let RcNodeData::Element { name, .. } = &handle.data {
        if &*name.local == tag {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

impl Document {
    /// Parse a complete HTML document
    ///
    /// Fragments get wrapped in `html`/`head`/`body` the way browsers do.
    pub fn parse_html(html: &str) -> Result<Document> {
        let dom = parse_rcdom(html)?;
        let mut document = Document::new();
        let root = document.root_id();
        document.convert_node(&dom.document, root)?;
        tracing::debug!("Parsed {} nodes", document.len());
        Ok(document)
    }

    /// Replace the children of `node_id` with parsed markup (`innerHTML`)
    ///
    /// The markup is parsed in body context; content that is only valid
    /// elsewhere (table rows, head-only elements) is dropped by the parser.
    pub fn set_inner_html(&mut self, node_id: NodeId, html: &str) -> Result<()> {
        self.element_mut(node_id)?;
        let dom = parse_rcdom(html)?;
        self.replace_children(node_id, &[])?;
        if let Some(body) = find_element(&dom.document, "body") {
            self.convert_children(&body, node_id)?;
        }
        Ok(())
    }

    /// Replace the content of a node with a single text node (`innerText`)
    ///
    /// For text and comment nodes the character data itself is replaced.
    pub fn set_text_content(&mut self, node_id: NodeId, text: &str) -> Result<()> {
        let node = self.get_mut(node_id)?;
        if matches!(node.node_type, NodeType::Text | NodeType::Comment) {
            node.node_value = text.to_string();
            return Ok(());
        }
        if text.is_empty() {
            return self.replace_children(node_id, &[]);
        }
        let text_id = self.create_text(text);
        self.replace_children(node_id, &[text_id])
    }

    fn convert_children(&mut self, handle: &Handle, parent: NodeId) -> Result<()> {
        for child in handle.children.borrow().iter() {
            self.convert_node(child, parent)?;
        }
        Ok(())
    }

    /// Recursively convert an RcDom node under `parent`
    fn convert_node(&mut self, handle: &Handle, parent: NodeId) -> Result<()> {
        match &handle.data {
            RcNodeData::Document => self.convert_children(handle, parent),
            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => Ok(()),
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() {
                    return Ok(());
                }
                let id = self.create_text(&text);
                self.append_child(parent, id)
            }
            RcNodeData::Comment { contents } => {
                let id = self.create_comment(&contents.to_string());
                self.append_child(parent, id)
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = self.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    self.get_mut(id)?.set_attr(&attr.name.local, &attr.value);
                }
                self.append_child(parent, id)?;
                self.convert_children(handle, id)
            }
        }
    }
}
