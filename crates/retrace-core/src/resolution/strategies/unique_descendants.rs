use super::{CandidateIter, SelectorStrategy, no_candidates};
use crate::resolution::context::SearchContext;
use retrace_common::ElementSelector;
use retrace_common::formatter::describe_selector;

/// Own properties plus "contains these unique descendants": all of them first, then each alone.
pub struct UniqueDescendantsStrategy;

impl SelectorStrategy for UniqueDescendantsStrategy {
    fn name(&self) -> &'static str {
        "unique_descendants"
    }

    fn is_performant(&self) -> bool {
        true
    }

    fn candidates<'c>(&self, ctx: &'c SearchContext<'_>) -> CandidateIter<'c> {
        let descendants = ctx.unique_descendant_selectors();
        if descendants.is_empty() {
            return no_candidates();
        }
        let own = ctx.target_properties();
        let all = own.clone().containing_descendants(descendants.to_vec());
        let singles = descendants
            .iter()
            .filter(move |_| descendants.len() > 1)
            .map(move |d| own.clone().containing_descendants(vec![d.clone()]));
        Box::new(std::iter::once(all).chain(singles))
    }

    fn justify(&self, _ctx: &SearchContext<'_>, selector: &ElementSelector) -> String {
        let descendants: Vec<String> = selector
            .contains_descendants
            .iter()
            .map(describe_selector)
            .collect();
        format!(
            "contains {} descendant(s) that occur once in the tree: [{}]",
            descendants.len(),
            descendants.join("; ")
        )
    }
}
