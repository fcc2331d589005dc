use super::{CandidateIter, SelectorStrategy};
use crate::resolution::context::SearchContext;
use retrace_common::formatter::describe_selector;
use retrace_common::{ElementSelector, TreeNode};
use std::ptr;

/// Position of the target among the nodes sharing its own properties, or among all nodes.
///
/// Always succeeds for a reachable target, and breaks as soon as the hierarchy is reordered.
pub struct IndexStrategy;

impl SelectorStrategy for IndexStrategy {
    fn name(&self) -> &'static str {
        "index"
    }

    fn is_performant(&self) -> bool {
        false
    }

    fn is_last_resort(&self) -> bool {
        true
    }

    fn candidates<'c>(&self, ctx: &'c SearchContext<'_>) -> CandidateIter<'c> {
        let target = ctx.target();
        let base = ctx.target_properties();
        let scoped = if base.has_own_properties() {
            position_among(ctx, &base, target).map(|i| base.clone().at_index(i))
        } else {
            None
        };
        let positional = position_among(ctx, &ElementSelector::default(), target)
            .map(|i| ElementSelector::default().at_index(i));
        Box::new(scoped.into_iter().chain(positional))
    }

    fn justify(&self, _ctx: &SearchContext<'_>, selector: &ElementSelector) -> String {
        let Some(index) = selector.index else {
            return describe_selector(selector);
        };
        if selector.is_index_only() {
            return format!("position {} in pre-order of the whole tree", index);
        }
        let base = ElementSelector {
            index: None,
            ..selector.clone()
        };
        format!(
            "position {} among nodes matching [{}]",
            index,
            describe_selector(&base)
        )
    }
}

fn position_among(
    ctx: &SearchContext<'_>,
    selector: &ElementSelector,
    target: &TreeNode,
) -> Option<usize> {
    ctx.query()
        .find_all(selector)
        .ok()?
        .iter()
        .position(|node| ptr::eq(*node, target))
}
