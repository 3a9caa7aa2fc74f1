//! Class list and inline style
//!
//! Both live in plain attributes (`class`, `style`) so serialization and
//! selector matching see a single source of truth. The helpers here parse,
//! edit and write the attribute back.

use crate::arena::Document;
use crate::error::Result;
use crate::types::NodeId;
use crate::utils::camel_to_kebab;

fn class_tokens(doc: &Document, node_id: NodeId) -> Vec<String> {
    doc.get_attribute(node_id, "class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn write_classes(doc: &mut Document, node_id: NodeId, tokens: &[String]) -> Result<()> {
    doc.set_attribute(node_id, "class", &tokens.join(" "))
}

/// Parse `a: b; c: d` into ordered declarations
fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            let value = value.trim();
            if prop.is_empty() || value.is_empty() {
                None
            } else {
                Some((prop.to_ascii_lowercase(), value.to_string()))
            }
        })
        .collect()
}

impl Document {
    pub fn has_class(&self, node_id: NodeId, class: &str) -> bool {
        class_tokens(self, node_id).iter().any(|c| c == class)
    }

    /// Add each token that is not present yet
    pub fn add_class(&mut self, node_id: NodeId, classes: &[&str]) -> Result<()> {
        let mut tokens = class_tokens(self, node_id);
        for class in classes {
            if !class.is_empty() && !tokens.iter().any(|t| t == class) {
                tokens.push(class.to_string());
            }
        }
        write_classes(self, node_id, &tokens)
    }

    pub fn remove_class(&mut self, node_id: NodeId, classes: &[&str]) -> Result<()> {
        let mut tokens = class_tokens(self, node_id);
        tokens.retain(|t| !classes.contains(&t.as_str()));
        write_classes(self, node_id, &tokens)
    }

    /// Toggle one token, returns whether it is present afterwards
    pub fn toggle_class(&mut self, node_id: NodeId, class: &str) -> Result<bool> {
        if self.has_class(node_id, class) {
            self.remove_class(node_id, &[class])?;
            Ok(false)
        } else {
            self.add_class(node_id, &[class])?;
            Ok(true)
        }
    }

    /// Inline style value of a property (camelCase or kebab-case name)
    pub fn style_property(&self, node_id: NodeId, property: &str) -> Option<String> {
        let property = camel_to_kebab(property);
        self.get_attribute(node_id, "style").and_then(|style| {
            parse_declarations(style)
                .into_iter()
                .find(|(p, _)| *p == property)
                .map(|(_, v)| v)
        })
    }

    /// Set one inline style property; an empty value removes the declaration
    pub fn set_style_property(&mut self, node_id: NodeId, property: &str, value: &str) -> Result<()> {
        let property = camel_to_kebab(property);
        let value = value.trim();
        let mut decls = self
            .get_attribute(node_id, "style")
            .map(parse_declarations)
            .unwrap_or_default();

        let existing = decls.iter().position(|(p, _)| *p == property);
        match (existing, value.is_empty()) {
            (Some(index), false) => decls[index].1 = value.to_string(),
            (Some(index), true) => {
                decls.remove(index);
            }
            (None, false) => decls.push((property, value.to_string())),
            (None, true) => {}
        }

        if decls.is_empty() {
            return self.remove_attribute(node_id, "style");
        }
        let serialized = decls
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(node_id, "style", &serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list() {
        let mut doc = Document::new();
        let node = doc.create_element("div");

        doc.add_class(node, &["a", "b", "a"]).unwrap();
        assert_eq!(doc.get_attribute(node, "class"), Some("a b"));

        assert!(!doc.toggle_class(node, "a").unwrap());
        assert!(doc.toggle_class(node, "c").unwrap());
        assert_eq!(doc.get_attribute(node, "class"), Some("b c"));

        doc.remove_class(node, &["b", "missing"]).unwrap();
        assert!(doc.has_class(node, "c"));
        assert!(!doc.has_class(node, "b"));
    }

    #[test]
    fn test_inline_style() {
        let mut doc = Document::new();
        let node = doc.create_element("div");

        doc.set_style_property(node, "backgroundColor", "red").unwrap();
        doc.set_style_property(node, "width", "10px").unwrap();
        assert_eq!(
            doc.get_attribute(node, "style"),
            Some("background-color: red; width: 10px;")
        );
        assert_eq!(doc.style_property(node, "background-color").as_deref(), Some("red"));

        doc.set_style_property(node, "background-color", "blue").unwrap();
        assert_eq!(doc.style_property(node, "backgroundColor").as_deref(), Some("blue"));

        doc.set_style_property(node, "backgroundColor", "").unwrap();
        doc.set_style_property(node, "width", "").unwrap();
        assert_eq!(doc.get_attribute(node, "style"), None);
    }
}
