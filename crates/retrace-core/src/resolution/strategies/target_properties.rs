use super::{CandidateIter, SelectorStrategy};
use crate::resolution::context::SearchContext;
use retrace_common::ElementSelector;
use retrace_common::formatter::describe_selector;

/// The target's own text or id, when either is unique across the tree.
pub struct TargetPropertiesStrategy;

impl SelectorStrategy for TargetPropertiesStrategy {
    fn name(&self) -> &'static str {
        "target_properties"
    }

    fn is_performant(&self) -> bool {
        true
    }

    fn candidates<'c>(&self, ctx: &'c SearchContext<'_>) -> CandidateIter<'c> {
        let report = ctx.uniqueness();
        let mut out = Vec::new();
        if report.text_is_unique
            && let Some(text) = &report.text
        {
            out.push(ElementSelector::text(text.clone()));
        }
        if report.id_is_unique
            && let Some(identifier) = &report.identifier
        {
            out.push(ElementSelector::id(identifier.clone()));
        }
        Box::new(out.into_iter())
    }

    fn justify(&self, _ctx: &SearchContext<'_>, selector: &ElementSelector) -> String {
        match (&selector.text_regex, &selector.id_regex) {
            (Some(text), None) => format!("text {:?} occurs once in the tree", text),
            (None, Some(id)) => format!("id {:?} occurs once in the tree", id),
            _ => describe_selector(selector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::strategies::fixtures::screen;
    use retrace_common::{Platform, TreeNode};

    fn context(root: &TreeNode, target: u32) -> SearchContext<'_> {
        SearchContext::new(root, target, Platform::Android, 1080, 2400).unwrap()
    }

    #[test]
    fn test_unique_text_is_used_alone() {
        let root = screen();
        let ctx = context(&root, 11);
        assert_eq!(
            TargetPropertiesStrategy.find_first(&ctx),
            Some(ElementSelector::text("Terms"))
        );
    }

    #[test]
    fn test_unique_id() {
        let root = screen();
        let ctx = context(&root, 10);
        assert_eq!(
            TargetPropertiesStrategy.find_first(&ctx),
            Some(ElementSelector::id("terms"))
        );
    }

    #[test]
    fn test_justification_states_tree_uniqueness() {
        let root = screen();
        let ctx = context(&root, 10);
        let candidates = TargetPropertiesStrategy.find_all_with_context(&ctx);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].strategy, "target_properties");
        assert_eq!(candidates[0].justification, r#"id "terms" occurs once in the tree"#);
    }

    #[test]
    fn test_shared_text_yields_nothing() {
        let root = screen();
        let ctx = context(&root, 6);
        assert!(TargetPropertiesStrategy.find_first(&ctx).is_none());
        assert!(TargetPropertiesStrategy.find_all(&ctx).is_empty());
    }
}
