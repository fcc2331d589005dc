use super::{CandidateIter, SelectorStrategy, no_candidates};
use crate::resolution::context::SearchContext;
use retrace_common::formatter::describe_selector;
use retrace_common::{ElementSelector, RelativeConstraint, SpatialHint, TreeNode};
use std::ptr;
use tracing::warn;

/// Own properties plus one caller-supplied positional hint, hints tried in the order given.
///
/// The reference is persisted as its own tree-unique selector, so the constraint still finds it
/// once the screen is captured again under new ids.
pub struct SpatialHintsStrategy;

impl SelectorStrategy for SpatialHintsStrategy {
    fn name(&self) -> &'static str {
        "spatial_hints"
    }

    fn is_performant(&self) -> bool {
        true
    }

    fn candidates<'c>(&self, ctx: &'c SearchContext<'_>) -> CandidateIter<'c> {
        let Some(hints) = ctx.spatial_hints() else {
            return no_candidates();
        };
        let own = ctx.target_properties();
        Box::new(
            hints
                .iter()
                .filter_map(move |hint| portable_constraint(ctx, hint))
                .map(move |constraint| own.clone().with_relative(constraint)),
        )
    }

    fn justify(&self, _ctx: &SearchContext<'_>, selector: &ElementSelector) -> String {
        let Some(constraint) = selector.relative.first() else {
            return describe_selector(selector);
        };
        let reference = match constraint.reference.as_deref() {
            Some(reference) => format!("[{}]", describe_selector(reference)),
            None => format!("#{}", constraint.reference_node_id),
        };
        format!(
            "only match {} the reference {}",
            constraint.relation.name(),
            reference
        )
    }
}

/// The hint as a constraint that can be replayed, or `None` when the hint is unusable.
fn portable_constraint(ctx: &SearchContext<'_>, hint: &SpatialHint) -> Option<RelativeConstraint> {
    let id = hint.reference_node_id;
    let Some(reference) = ctx.root().find(id) else {
        warn!("Skipping spatial hint: node {} is not in the capture", id);
        return None;
    };
    if ptr::eq(reference, ctx.target()) {
        warn!("Skipping spatial hint: node {} is the target itself", id);
        return None;
    }
    if !on_screen(ctx, reference) {
        warn!("Skipping spatial hint: node {} lies outside the screen", id);
        return None;
    }
    let holds = match (ctx.target().bounds, reference.bounds) {
        (Some(target), Some(reference)) => hint.relation.holds(&target, &reference),
        _ => false,
    };
    if !holds {
        warn!(
            "Skipping spatial hint: target is not {} node {}",
            hint.relation.name(),
            id
        );
        return None;
    }
    let Some(reference_selector) = ctx.tree_unique_selector_for(reference) else {
        warn!("Skipping spatial hint: node {} has no unique selector", id);
        return None;
    };
    Some(RelativeConstraint::new(id, hint.relation).with_reference(reference_selector))
}

fn on_screen(ctx: &SearchContext<'_>, node: &TreeNode) -> bool {
    node.bounds
        .is_some_and(|b| b.overlaps_screen(ctx.screen_width(), ctx.screen_height()))
}
