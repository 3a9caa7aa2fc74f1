//! Fluent node builder over a `dom::Document`
//!
//! A `Builder` keeps a cursor (the current node), a node set, a registry of
//! saved and detached nodes, and a condition gate. Chain methods read and
//! move that state while editing the borrowed document.
//!
//! ## Core Design
//!
//! ```text
//! Builder<'d> ──&mut──→ Document
//!   ├─ current: Option<NodeId>    navigation / creation
//!   ├─ current_set: Vec<NodeId>   query_all / children / set_*
//!   ├─ registry: Registry         save / load / detach / reattach
//!   └─ gate: GateState            condition / else_if / otherwise
//! ```
//!
//! Navigation that finds nothing leaves the cursor empty instead of
//! failing; the next call that needs a node returns
//! [`BuilderError::NoCurrentNode`]. Gated calls skipped by a false
//! condition return the builder untouched.
//!
//! ```no_run
//! use dom::Document;
//! use dom_builder::Builder;
//!
//! # fn main() -> dom_builder::Result<()> {
//! let mut doc = Document::parse_html("<ul id=\"todo\"></ul>")?;
//! let mut builder = Builder::by_id(&mut doc, "todo");
//! builder
//!     .append_new("li")?
//!     .text("write tests")?
//!     .condition(true)
//!     .class_add("urgent")?;
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod builder;
pub mod config;
pub mod debug;
pub mod error;
pub mod gate;
pub mod mutation;
pub mod navigation;
pub mod node_set;
pub mod props;
pub mod registry;
pub mod target;

pub use builder::Builder;
pub use config::BuilderConfig;
pub use debug::{BuilderSnapshot, NodeSnapshot};
pub use error::{BuilderError, FaultKind, Result};
pub use gate::{GateState, Predicate};
pub use props::{Props, Value};
pub use registry::{Position, Registry, RegistryEntry};
pub use target::{Scope, StoreKey, Target};
