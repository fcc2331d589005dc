use super::{CandidateIter, SelectorStrategy, ancestor_depth, unscoped};
use crate::resolution::context::SearchContext;
use crate::resolution::properties::own_properties;
use retrace_common::formatter::describe_selector;
use retrace_common::{ElementSelector, TreeNode};

/// How an ancestor is pinned down when its own properties are not enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    /// Own properties plus the ancestor's most specific direct child.
    ContainsChild,
    /// Own properties plus every unique descendant of the ancestor.
    ContainsDescendants,
}

/// Walks up the ancestors, nearest first, anchoring each one by its content and scoping the
/// target's local selector under the first anchor that verifies.
pub struct MultiParentStrategy {
    anchor: AnchorKind,
}

impl MultiParentStrategy {
    pub fn new(anchor: AnchorKind) -> Self {
        Self { anchor }
    }

    fn anchor_for(&self, ctx: &SearchContext<'_>, ancestor: &TreeNode) -> Option<ElementSelector> {
        let base = own_properties(ancestor);
        let anchor = match self.anchor {
            AnchorKind::ContainsChild => {
                base.containing_child(ctx.most_specific_child_selector_of(ancestor)?)
            }
            AnchorKind::ContainsDescendants => {
                let descendants = ctx.unique_descendant_selectors_of(ancestor);
                if descendants.is_empty() {
                    return None;
                }
                base.containing_descendants(descendants)
            }
        };
        ctx.matches_only(&anchor, ancestor).then_some(anchor)
    }
}

impl SelectorStrategy for MultiParentStrategy {
    fn name(&self) -> &'static str {
        match self.anchor {
            AnchorKind::ContainsChild => "contains_child_multi_parent",
            AnchorKind::ContainsDescendants => "contains_descendants_multi_parent",
        }
    }

    fn is_performant(&self) -> bool {
        false
    }

    fn candidates<'c>(&self, ctx: &'c SearchContext<'_>) -> CandidateIter<'c> {
        let strategy = Self::new(self.anchor);
        let local = ctx.target_local_selector();
        Box::new(
            ctx.ancestors_nearest_first()
                .take(ctx.max_ancestor_depth())
                .filter_map(move |ancestor| {
                    let anchor = strategy.anchor_for(ctx, ancestor)?;
                    Some(local.clone().child_of(anchor))
                }),
        )
    }

    fn justify(&self, ctx: &SearchContext<'_>, selector: &ElementSelector) -> String {
        let Some(anchor) = selector.child_of.as_deref() else {
            return describe_selector(selector);
        };
        let anchored_by = match self.anchor {
            AnchorKind::ContainsChild => anchor
                .contains_child
                .as_deref()
                .map_or_else(String::new, |child| {
                    format!("child [{}]", describe_selector(child))
                }),
            AnchorKind::ContainsDescendants => {
                let inner: Vec<String> = anchor
                    .contains_descendants
                    .iter()
                    .map(describe_selector)
                    .collect();
                format!("descendants [{}]", inner.join("; "))
            }
        };
        let scope = match ancestor_depth(ctx, anchor) {
            Some(depth) => format!("ancestor at depth {}", depth),
            None => "ancestor".to_string(),
        };
        format!(
            "{} scoped under {} anchored by {}",
            describe_selector(&unscoped(selector)),
            scope,
            anchored_by
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use retrace_common::Platform;

    /// root(1)
    /// ├── card(2) id=card ── header(3) "Plan A" ── price(4) "$5"
    /// │                  └── button(5) "Buy"
    /// └── card(6) id=card ── header(7) "Plan B" ── price(8) "$9"
    ///                    └── button(9) "Buy"
    fn cards() -> TreeNode {
        let card = |id: u32, plan: &str, price: &str| {
            TreeNode::new(id).with_resource_id("com.shop:id/card").with_children(vec![
                TreeNode::new(id + 1)
                    .with_text(plan)
                    .with_children(vec![TreeNode::new(id + 2).with_text(price)]),
                TreeNode::new(id + 3).with_text("Buy"),
            ])
        };
        TreeNode::new(1).with_children(vec![card(2, "Plan A", "$5"), card(6, "Plan B", "$9")])
    }

    fn context(root: &TreeNode, target: u32) -> SearchContext<'_> {
        SearchContext::new(root, target, Platform::Android, 1080, 2400).unwrap()
    }

    #[test]
    fn test_anchor_by_child() {
        let root = cards();
        let ctx = context(&root, 5);
        let strategy = MultiParentStrategy::new(AnchorKind::ContainsChild);
        assert_eq!(
            strategy.find_first(&ctx),
            Some(ElementSelector::text("Buy").child_of(
                ElementSelector::id("card").containing_child(ElementSelector::text("Plan A"))
            ))
        );
    }

    #[test]
    fn test_anchor_by_descendants() {
        let root = cards();
        let ctx = context(&root, 9);
        let strategy = MultiParentStrategy::new(AnchorKind::ContainsDescendants);
        assert_eq!(
            strategy.find_first(&ctx),
            Some(ElementSelector::text("Buy").child_of(
                ElementSelector::id("card").containing_descendants(vec![
                    ElementSelector::text("Plan B"),
                    ElementSelector::text(r"\$9"),
                ])
            ))
        );
    }

    #[test]
    fn test_justification_names_anchor() {
        let root = cards();
        let ctx = context(&root, 5);
        let by_child = MultiParentStrategy::new(AnchorKind::ContainsChild).find_all_with_context(&ctx);
        assert_eq!(
            by_child[0].justification,
            r#"text "Buy" scoped under ancestor at depth 1 anchored by child [text "Plan A"]"#
        );

        let ctx = context(&root, 9);
        let by_descendants =
            MultiParentStrategy::new(AnchorKind::ContainsDescendants).find_all_with_context(&ctx);
        assert_eq!(
            by_descendants[0].justification,
            r#"text "Buy" scoped under ancestor at depth 1 anchored by descendants [text "Plan B"; text "\\$9"]"#
        );
    }

    #[test]
    fn test_depth_limit() {
        let root = cards();
        let config = ResolverConfig {
            max_ancestor_depth: 0,
            ..ResolverConfig::default()
        };
        let ctx = context(&root, 5).with_config(&config);
        let strategy = MultiParentStrategy::new(AnchorKind::ContainsChild);
        assert!(strategy.find_first(&ctx).is_none());
    }

    #[test]
    fn test_names() {
        assert_eq!(
            MultiParentStrategy::new(AnchorKind::ContainsChild).name(),
            "contains_child_multi_parent"
        );
        assert!(!MultiParentStrategy::new(AnchorKind::ContainsDescendants).is_performant());
    }
}
