//! Builder errors
//!
//! Failures fall into three tiers (see [`FaultKind`]). Only the first two
//! ever surface as a `BuilderError`; gated-off calls and not-found removals
//! are silent no-ops by contract.

use dom::{DomError, NodeId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuilderError>;

/// How a failure behaves in a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// A precondition of the call itself was violated
    ImmediateFatal,
    /// An earlier navigation found nothing and this call tripped over it
    DeferredFault,
    /// Skipped without effect (gated-off calls, not-found removals)
    SilentNoop,
}

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("No current node: the last navigation found nothing")]
    NoCurrentNode,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot detach node {0}: it has no sibling or parent to record a position against")]
    NoPositionToRecord(NodeId),

    #[error("Nothing to reattach{}", .0.as_ref().map(|n| format!(" under '{}'", n)).unwrap_or_default())]
    NothingToReattach(Option<String>),

    #[error("The 'event' prop needs a listener value")]
    InvalidEventProp,

    #[error(transparent)]
    Dom(#[from] DomError),
}

impl BuilderError {
    pub fn kind(&self) -> FaultKind {
        match self {
            BuilderError::NoCurrentNode | BuilderError::NotFound(_) => FaultKind::DeferredFault,
            BuilderError::Dom(DomError::NodeNotFound(_)) => FaultKind::DeferredFault,
            BuilderError::NoPositionToRecord(_)
            | BuilderError::NothingToReattach(_)
            | BuilderError::InvalidEventProp
            | BuilderError::Dom(_) => FaultKind::ImmediateFatal,
        }
    }
}
