use super::{CandidateIter, SelectorStrategy, describe_scope, no_candidates, unscoped};
use crate::resolution::context::SearchContext;
use retrace_common::ElementSelector;
use retrace_common::formatter::describe_selector;

/// Own properties scoped under an ancestor that is unique in the tree, nearest ancestor first.
pub struct UniqueParentStrategy;

impl SelectorStrategy for UniqueParentStrategy {
    fn name(&self) -> &'static str {
        "unique_parent"
    }

    fn is_performant(&self) -> bool {
        true
    }

    fn candidates<'c>(&self, ctx: &'c SearchContext<'_>) -> CandidateIter<'c> {
        let own = ctx.target_properties();
        if !own.has_own_properties() {
            return no_candidates();
        }
        Box::new(
            ctx.unique_ancestors()
                .iter()
                .map(move |ancestor| own.clone().child_of(ancestor.selector.clone())),
        )
    }

    fn justify(&self, ctx: &SearchContext<'_>, selector: &ElementSelector) -> String {
        match selector.child_of.as_deref() {
            Some(parent) => format!(
                "{} is unique under {}",
                describe_selector(&unscoped(selector)),
                describe_scope(ctx, parent)
            ),
            None => describe_selector(selector),
        }
    }
}
