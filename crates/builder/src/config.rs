//! Builder configuration

use serde::{Deserialize, Serialize};

/// Builder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Drop a detached entry from the registry once it has been reattached.
    /// Off by default: an entry can be reattached again at the position
    /// recorded when it was detached.
    pub consume_on_reattach: bool,

    /// Cap for node markup in `debug()` / `snapshot()` output (bytes)
    pub debug_max_html: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            consume_on_reattach: false,
            debug_max_html: 200,
        }
    }
}
