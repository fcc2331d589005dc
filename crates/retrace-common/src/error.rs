use crate::protocol::NodeId;
use thiserror::Error;

/// A selector that cannot be evaluated structurally against a tree.
///
/// Always recoverable: callers treat it as "no matches" and move on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Relative constraint references unknown node {0}")]
    UnknownReference(NodeId),

    #[error("Reference selector for node {0} matched {1} nodes")]
    UnresolvedReference(NodeId, usize),

    #[error("Reference node {0} has no bounds")]
    MissingBounds(NodeId),

    #[error("Nested selector cannot use '{0}'")]
    UnsupportedNestedConstraint(&'static str),
}
