use super::{CandidateIter, SelectorStrategy, describe_scope, no_candidates, unscoped};
use crate::resolution::context::SearchContext;
use retrace_common::ElementSelector;
use retrace_common::formatter::describe_selector;

/// "Has this child": own properties plus the target's most specific direct child, then the same
/// scoped under the nearest unique ancestor.
pub struct UniqueChildStrategy;

impl SelectorStrategy for UniqueChildStrategy {
    fn name(&self) -> &'static str {
        "unique_child"
    }

    fn is_performant(&self) -> bool {
        true
    }

    fn candidates<'c>(&self, ctx: &'c SearchContext<'_>) -> CandidateIter<'c> {
        let Some(child) = ctx.best_child_selector() else {
            return no_candidates();
        };
        let selector = ctx.target_properties().containing_child(child.clone());
        let scoped = ctx
            .unique_ancestor()
            .map(|ancestor| selector.clone().child_of(ancestor.selector.clone()));
        Box::new(std::iter::once(selector).chain(scoped))
    }

    fn justify(&self, ctx: &SearchContext<'_>, selector: &ElementSelector) -> String {
        let Some(child) = selector.contains_child.as_deref() else {
            return describe_selector(selector);
        };
        let own = ElementSelector {
            contains_child: None,
            ..unscoped(selector)
        };
        let mut reason = format!(
            "only [{}] with direct child [{}]",
            describe_selector(&own),
            describe_selector(child)
        );
        if let Some(parent) = selector.child_of.as_deref() {
            reason.push_str(&format!(" under {}", describe_scope(ctx, parent)));
        }
        reason
    }
}
