use retrace_common::{ElementSelector, NodeId};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// The caller asked for a node that is not in the captured tree.
    #[error("Target node {0} is not part of the captured tree")]
    UnreachableTarget(NodeId),

    /// Every strategy came back empty. The caller has to re-identify the element another way.
    #[error("No selector identifies node {target} (tried: {attempted:?})")]
    NoSelectorFound {
        target: NodeId,
        attempted: Vec<String>,
    },
}

/// A verified selector and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSelector {
    pub selector: ElementSelector,
    pub strategy: &'static str,
}

/// One ranked row of [`crate::SelectorResolver::resolve_all_candidates`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub selector: ElementSelector,
    pub strategy: &'static str,
    pub justification: String,
}
