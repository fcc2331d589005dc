//! Re-locating a persisted selector in a fresh capture.

use crate::resolution::context::evaluate_lenient;
use retrace_common::{ElementSelector, MatchOutcome, Query, TreeNode};

/// Evaluate `selector` against a newly captured tree with the same machinery synthesis used.
pub fn locate<'a>(root: &'a TreeNode, selector: &ElementSelector) -> MatchOutcome<'a> {
    evaluate_lenient(Query::new(root), root, selector)
}

/// Is `found` the element `expected` described, ignoring snapshot-local ids?
pub fn relocates_same_element(expected: &TreeNode, found: &TreeNode, tolerance_px: i32) -> bool {
    expected.structurally_equal(found, true, tolerance_px)
}
