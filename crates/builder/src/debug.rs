//! Builder state dump for troubleshooting chains

use dom::utils::cap_text_length;
use dom::{HtmlSerializer, NodeId};
use serde::Serialize;

use crate::builder::Builder;
use crate::gate::GateState;
use crate::registry::RegistryEntry;

/// One node as it shows up in a dump
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub node_id: NodeId,
    pub path: String,
    pub html: String,
}

/// Serializable view of a builder
#[derive(Debug, Clone, Serialize)]
pub struct BuilderSnapshot {
    pub builder_id: String,
    pub current: Option<NodeSnapshot>,
    pub current_set: Vec<NodeSnapshot>,
    pub registry: Vec<RegistryEntry>,
    pub gate: GateState,
}

impl Builder<'_> {
    fn node_snapshot(&self, serializer: &HtmlSerializer, node_id: NodeId) -> NodeSnapshot {
        let path = serializer
            .node_path(&*self.doc, node_id)
            .unwrap_or_else(|e| format!("<{}>", e));
        let html = serializer
            .serialize(&*self.doc, node_id)
            .map(|html| cap_text_length(&html, self.config.debug_max_html))
            .unwrap_or_else(|e| format!("<{}>", e));
        NodeSnapshot {
            node_id,
            path,
            html,
        }
    }

    pub fn snapshot(&self) -> BuilderSnapshot {
        let serializer = HtmlSerializer::new();
        BuilderSnapshot {
            builder_id: self.id.to_string(),
            current: self
                .current
                .map(|node| self.node_snapshot(&serializer, node)),
            current_set: self
                .current_set
                .iter()
                .map(|&node| self.node_snapshot(&serializer, node))
                .collect(),
            registry: self.registry.entries().to_vec(),
            gate: self.gate,
        }
    }

    /// Log the builder state as JSON at debug level
    pub fn debug(&mut self) -> &mut Self {
        match serde_json::to_string_pretty(&self.snapshot()) {
            Ok(json) => tracing::debug!("Builder {} state:\n{}", self.id, json),
            Err(e) => tracing::warn!("Builder {}: state dump failed: {}", self.id, e),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuilderConfig;
    use dom::Document;

    #[test]
    fn test_snapshot_contents() {
        let mut doc = Document::parse_html("<p id=\"p\">some long paragraph text</p>").unwrap();
        let p = doc.find_by_id("p").unwrap();
        let config = BuilderConfig {
            debug_max_html: 10,
            ..BuilderConfig::default()
        };
        let mut builder = Builder::with_config(&mut doc, config);
        builder.select(p).save_as("para").unwrap().condition(false);

        let snapshot = builder.snapshot();
        let current = snapshot.current.unwrap();
        assert_eq!(current.path, "/html[1]/body[1]/p[1]");
        assert_eq!(current.html, "<p id=\"p\">...");
        assert_eq!(snapshot.registry[0].name.as_deref(), Some("para"));
        assert!(!snapshot.gate.value);

        let json = serde_json::to_value(builder.snapshot()).unwrap();
        assert_eq!(json["registry"][0]["node"], p);
    }

    #[test]
    fn test_debug_does_not_consume_gate() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();

        let mut doc = Document::parse_html("<p id=\"p\"></p>").unwrap();
        let mut builder = Builder::by_id(&mut doc, "p");
        builder.condition(false).debug();
        assert!(!builder.gate().value);
    }
}
