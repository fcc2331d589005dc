//! Selector evaluation against a captured tree.
//!
//! Synthesis verifies candidates with this module and replay re-locates persisted selectors with
//! it, so the two always agree on what a selector means.

use crate::error::QueryError;
use crate::matcher::TextPattern;
use crate::protocol::{Bounds, TreeNode};
use crate::selector::{ElementSelector, RelativeConstraint};
use std::collections::HashSet;

/// Result of evaluating one selector.
#[derive(Debug, Clone)]
pub enum MatchOutcome<'a> {
    NoMatches,
    SingleMatch {
        node: &'a TreeNode,
        selector: ElementSelector,
    },
    MultipleMatches {
        nodes: Vec<&'a TreeNode>,
        selector: ElementSelector,
    },
}

impl<'a> MatchOutcome<'a> {
    pub fn from_matches(mut nodes: Vec<&'a TreeNode>, selector: &ElementSelector) -> Self {
        match nodes.len() {
            0 => MatchOutcome::NoMatches,
            1 => MatchOutcome::SingleMatch {
                node: nodes.remove(0),
                selector: selector.clone(),
            },
            _ => MatchOutcome::MultipleMatches {
                nodes,
                selector: selector.clone(),
            },
        }
    }

    pub fn single(&self) -> Option<&'a TreeNode> {
        match self {
            MatchOutcome::SingleMatch { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, MatchOutcome::SingleMatch { .. })
    }

    pub fn len(&self) -> usize {
        match self {
            MatchOutcome::NoMatches => 0,
            MatchOutcome::SingleMatch { .. } => 1,
            MatchOutcome::MultipleMatches { nodes, .. } => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MatchOutcome::NoMatches)
    }
}

/// Evaluates selectors over one tree.
///
/// Relative constraints always look their reference node up in `root`, even when the search is
/// narrowed to a subtree with [`Query::find_all_in`].
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    root: &'a TreeNode,
}

impl<'a> Query<'a> {
    pub fn new(root: &'a TreeNode) -> Self {
        Self { root }
    }

    pub fn evaluate(&self, selector: &ElementSelector) -> Result<MatchOutcome<'a>, QueryError> {
        self.evaluate_in(self.root, selector)
    }

    pub fn evaluate_in(
        &self,
        scope: &'a TreeNode,
        selector: &ElementSelector,
    ) -> Result<MatchOutcome<'a>, QueryError> {
        let nodes = self.find_all_in(scope, selector)?;
        Ok(MatchOutcome::from_matches(nodes, selector))
    }

    pub fn find_all(&self, selector: &ElementSelector) -> Result<Vec<&'a TreeNode>, QueryError> {
        self.find_all_in(self.root, selector)
    }

    /// Every node of `scope` (itself included) satisfying `selector`, in pre-order.
    pub fn find_all_in(
        &self,
        scope: &'a TreeNode,
        selector: &ElementSelector,
    ) -> Result<Vec<&'a TreeNode>, QueryError> {
        let mut candidates = match &selector.child_of {
            Some(parent) => {
                let parents = self.find_all_in(scope, parent)?;
                let inside: HashSet<*const TreeNode> = parents
                    .iter()
                    .flat_map(|p| p.descendants())
                    .map(|n| n as *const TreeNode)
                    .collect();
                scope
                    .flatten()
                    .into_iter()
                    .filter(|n| inside.contains(&(*n as *const TreeNode)))
                    .collect()
            }
            None => scope.flatten(),
        };

        if let Some(pattern) = &selector.text_regex {
            let pattern = TextPattern::compile(pattern);
            candidates.retain(|n| pattern.matches_text_of(n));
        }

        if let Some(pattern) = &selector.id_regex {
            let pattern = TextPattern::compile(pattern);
            candidates.retain(|n| pattern.matches_id_of(n));
        }

        if let Some(child) = &selector.contains_child {
            let child = NestedPredicate::compile(child)?;
            candidates.retain(|n| n.children.iter().any(|c| child.matches(c)));
        }

        if !selector.contains_descendants.is_empty() {
            let wanted = selector
                .contains_descendants
                .iter()
                .map(NestedPredicate::compile)
                .collect::<Result<Vec<_>, _>>()?;
            candidates.retain(|n| {
                wanted
                    .iter()
                    .all(|p| n.any_descendant(&|d: &TreeNode| p.matches(d)))
            });
        }

        for constraint in &selector.relative {
            let reference = self.reference_bounds(constraint)?;
            candidates.retain(|n| {
                n.bounds
                    .is_some_and(|b| constraint.relation.holds(&b, &reference))
            });
        }

        if let Some(index) = selector.index {
            candidates = candidates.get(index).copied().into_iter().collect();
        }

        Ok(candidates)
    }

    /// Bounds of the node a relative constraint points at. The reference selector wins over the
    /// id and is always evaluated over the whole tree.
    fn reference_bounds(&self, constraint: &RelativeConstraint) -> Result<Bounds, QueryError> {
        let id = constraint.reference_node_id;
        let reference = match constraint.reference.as_deref() {
            Some(selector) => match self.find_all(selector)?.as_slice() {
                [node] => *node,
                found => return Err(QueryError::UnresolvedReference(id, found.len())),
            },
            None => self.root.find(id).ok_or(QueryError::UnknownReference(id))?,
        };
        reference.bounds.ok_or(QueryError::MissingBounds(id))
    }
}

/// Node-local form of a selector nested inside `contains_child`/`contains_descendants`.
///
/// Only text, id and further contains-constraints make sense relative to a single node.
struct NestedPredicate {
    text: Option<TextPattern>,
    id: Option<TextPattern>,
    child: Option<Box<NestedPredicate>>,
    descendants: Vec<NestedPredicate>,
}

impl NestedPredicate {
    fn compile(selector: &ElementSelector) -> Result<Self, QueryError> {
        if selector.child_of.is_some() {
            return Err(QueryError::UnsupportedNestedConstraint("child_of"));
        }
        if selector.index.is_some() {
            return Err(QueryError::UnsupportedNestedConstraint("index"));
        }
        if !selector.relative.is_empty() {
            return Err(QueryError::UnsupportedNestedConstraint("relative"));
        }

        Ok(Self {
            text: selector.text_regex.as_deref().map(TextPattern::compile),
            id: selector.id_regex.as_deref().map(TextPattern::compile),
            child: selector
                .contains_child
                .as_deref()
                .map(Self::compile)
                .transpose()?
                .map(Box::new),
            descendants: selector
                .contains_descendants
                .iter()
                .map(Self::compile)
                .collect::<Result<_, _>>()?,
        })
    }

    fn matches(&self, node: &TreeNode) -> bool {
        self.text.as_ref().is_none_or(|p| p.matches_text_of(node))
            && self.id.as_ref().is_none_or(|p| p.matches_id_of(node))
            && self
                .child
                .as_ref()
                .is_none_or(|c| node.children.iter().any(|n| c.matches(n)))
            && self
                .descendants
                .iter()
                .all(|d| node.any_descendant(&|n: &TreeNode| d.matches(n)))
    }
}
