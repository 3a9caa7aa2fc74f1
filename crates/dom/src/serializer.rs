//! HTML serializer - tree back to markup
//!
//! This module handles:
//! - `outerHTML` / `innerHTML` style serialization
//! - Text content extraction
//! - Path generation for identifying a node in log output

use crate::arena::Document;
use crate::error::Result;
use crate::types::*;
use crate::utils::{cap_text_length, escape_attr, escape_text};

/// Serializer configuration
#[derive(Debug, Clone, Default)]
pub struct SerializerConfig {
    /// Cap every text node to this many bytes (None = unlimited)
    pub max_text_length: Option<usize>,
}

/// Markup serializer
pub struct HtmlSerializer {
    config: SerializerConfig,
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize a node including itself
    pub fn serialize(&self, doc: &Document, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        self.serialize_node(doc, node_id, &mut output)?;
        Ok(output)
    }

    /// Serialize only the children of a node
    pub fn serialize_children(&self, doc: &Document, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        for &child_id in &doc.get(node_id)?.children_ids {
            self.serialize_node(doc, child_id, &mut output)?;
        }
        Ok(output)
    }

    fn serialize_node(&self, doc: &Document, node_id: NodeId, output: &mut String) -> Result<()> {
        let node = doc.get(node_id)?;

        match node.node_type {
            NodeType::Element => {
                output.push('<');
                output.push_str(&node.node_name);
                for (name, value) in &node.attributes {
                    if value.is_empty() {
                        output.push_str(&format!(" {}", name));
                    } else {
                        output.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
                    }
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&node.node_name.as_str()) {
                    return Ok(());
                }

                for &child_id in &node.children_ids {
                    self.serialize_node(doc, child_id, output)?;
                }

                output.push_str("</");
                output.push_str(&node.node_name);
                output.push('>');
            }
            NodeType::Text => {
                let text = match self.config.max_text_length {
                    Some(max) => cap_text_length(&node.node_value, max),
                    None => node.node_value.clone(),
                };
                output.push_str(&escape_text(&text));
            }
            NodeType::Comment => {
                output.push_str("<!--");
                output.push_str(&node.node_value);
                output.push_str("-->");
            }
            NodeType::Document => {
                for &child_id in &node.children_ids {
                    self.serialize_node(doc, child_id, output)?;
                }
            }
        }

        Ok(())
    }

    /// Generate an XPath-like location for a node, e.g. `/html[1]/body[1]/div[2]`
    ///
    /// Detached subtrees produce a path relative to their own top node.
    pub fn node_path(&self, doc: &Document, node_id: NodeId) -> Result<String> {
        let mut path_parts = Vec::new();
        let mut current_id = Some(node_id);

        while let Some(id) = current_id {
            let node = doc.get(id)?;

            if node.node_type == NodeType::Element {
                // Position among siblings with same tag name
                let position = match node.parent_id {
                    Some(parent_id) => doc
                        .children(parent_id)
                        .iter()
                        .filter_map(|&child_id| doc.get(child_id).ok())
                        .filter(|child| child.is_element() && child.node_name == node.node_name)
                        .position(|child| child.node_id == node.node_id)
                        .map(|p| p + 1) // XPath is 1-indexed
                        .unwrap_or(1),
                    None => 1,
                };

                path_parts.push(format!("{}[{}]", node.node_name, position));
            } else if node.node_type != NodeType::Document {
                path_parts.push(node.node_name.clone());
            }

            current_id = node.parent_id;
        }

        path_parts.reverse();
        Ok(format!("/{}", path_parts.join("/")))
    }
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Markup of the node itself and its subtree
    pub fn outer_html(&self, node_id: NodeId) -> Result<String> {
        HtmlSerializer::new().serialize(self, node_id)
    }

    /// Markup of the node's children
    pub fn inner_html(&self, node_id: NodeId) -> Result<String> {
        HtmlSerializer::new().serialize_children(self, node_id)
    }

    /// Concatenated character data of all descendant text nodes
    pub fn text_content(&self, node_id: NodeId) -> Result<String> {
        let mut text = String::new();
        self.traverse_df(node_id, |node| {
            if node.node_type == NodeType::Text {
                text.push_str(&node.node_value);
            }
            Ok(())
        })?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_html_roundtrips_structure() {
        let doc = Document::parse_html(
            "<div id=\"a\" class=\"x y\"><input disabled><span>1 &lt; 2</span><!--note--></div>",
        )
        .unwrap();
        let div = doc.find_by_id("a").unwrap();

        assert_eq!(
            doc.outer_html(div).unwrap(),
            "<div id=\"a\" class=\"x y\"><input disabled><span>1 &lt; 2</span><!--note--></div>"
        );
        assert_eq!(
            doc.inner_html(div).unwrap(),
            "<input disabled><span>1 &lt; 2</span><!--note-->"
        );
        assert_eq!(doc.text_content(div).unwrap(), "1 < 2");
    }

    #[test]
    fn test_text_is_capped() {
        let doc = Document::parse_html("<p id=\"p\">abcdefghij</p>").unwrap();
        let p = doc.find_by_id("p").unwrap();
        let serializer = HtmlSerializer::with_config(SerializerConfig {
            max_text_length: Some(3),
        });

        assert_eq!(serializer.serialize(&doc, p).unwrap(), "<p id=\"p\">abc...</p>");
    }

    #[test]
    fn test_node_path() {
        let doc = Document::parse_html("<div></div><div><span id=\"s\"></span></div>").unwrap();
        let span = doc.find_by_id("s").unwrap();

        let path = HtmlSerializer::new().node_path(&doc, span).unwrap();
        assert_eq!(path, "/html[1]/body[1]/div[2]/span[1]");
    }
}
