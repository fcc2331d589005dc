//! Ordered selector-building strategies.
//!
//! Each strategy proposes candidate selectors for the target; a candidate only counts once
//! [`SearchContext::verify`] accepts it. The set and its order are fixed, see
//! [`default_strategies`].

mod index;
mod multi_parent;
mod spatial_hints;
mod target_properties;
mod unique_child;
mod unique_descendants;
mod unique_parent;

pub use index::IndexStrategy;
pub use multi_parent::{AnchorKind, MultiParentStrategy};
pub use spatial_hints::SpatialHintsStrategy;
pub use target_properties::TargetPropertiesStrategy;
pub use unique_child::UniqueChildStrategy;
pub use unique_descendants::UniqueDescendantsStrategy;
pub use unique_parent::UniqueParentStrategy;

use super::context::SearchContext;
use super::result::Candidate;
use retrace_common::ElementSelector;
use retrace_common::formatter::describe_selector;
use std::ptr;
use tracing::debug;

pub type CandidateIter<'c> = Box<dyn Iterator<Item = ElementSelector> + 'c>;

pub trait SelectorStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Cheap enough to run on every resolution.
    fn is_performant(&self) -> bool;

    /// Runs even when expensive strategies are disabled.
    fn is_last_resort(&self) -> bool {
        false
    }

    /// Unverified proposals, best first. Evaluated lazily so `find_first` can stop early.
    fn candidates<'c>(&self, ctx: &'c SearchContext<'_>) -> CandidateIter<'c>;

    fn find_first(&self, ctx: &SearchContext<'_>) -> Option<ElementSelector> {
        let found = self.candidates(ctx).find(|selector| ctx.verify(selector));
        debug!(
            "Strategy {} for node {}: {}",
            self.name(),
            ctx.target_id(),
            if found.is_some() { "verified" } else { "nothing" }
        );
        found
    }

    /// Why a verified `selector` picks out the target and nothing else.
    fn justify(&self, ctx: &SearchContext<'_>, selector: &ElementSelector) -> String;

    /// Every verified candidate, duplicates removed, in proposal order.
    fn find_all(&self, ctx: &SearchContext<'_>) -> Vec<ElementSelector> {
        let mut verified: Vec<ElementSelector> = Vec::new();
        for selector in self.candidates(ctx) {
            if !verified.contains(&selector) && ctx.verify(&selector) {
                verified.push(selector);
            }
        }
        verified
    }

    fn find_all_with_context(&self, ctx: &SearchContext<'_>) -> Vec<Candidate> {
        self.find_all(ctx)
            .into_iter()
            .map(|selector| Candidate {
                justification: self.justify(ctx, &selector),
                strategy: self.name(),
                selector,
            })
            .collect()
    }
}

/// All strategies, cheapest first.
pub fn default_strategies() -> Vec<Box<dyn SelectorStrategy>> {
    vec![
        Box::new(TargetPropertiesStrategy),
        Box::new(UniqueParentStrategy),
        Box::new(SpatialHintsStrategy),
        Box::new(UniqueChildStrategy),
        Box::new(UniqueDescendantsStrategy),
        Box::new(MultiParentStrategy::new(AnchorKind::ContainsChild)),
        Box::new(MultiParentStrategy::new(AnchorKind::ContainsDescendants)),
        Box::new(IndexStrategy),
    ]
}

fn no_candidates<'c>() -> CandidateIter<'c> {
    Box::new(std::iter::empty())
}

/// `selector` with its `child_of` scope dropped.
fn unscoped(selector: &ElementSelector) -> ElementSelector {
    ElementSelector {
        child_of: None,
        ..selector.clone()
    }
}

/// Depth (1 for the parent) of the target ancestor that `anchor` picks out alone.
fn ancestor_depth(ctx: &SearchContext<'_>, anchor: &ElementSelector) -> Option<usize> {
    let node = ctx.get_matches(anchor).single()?;
    ctx.ancestors_nearest_first()
        .position(|ancestor| ptr::eq(ancestor, node))
        .map(|i| i + 1)
}

/// e.g. `ancestor at depth 2 [id "form"]`
fn describe_scope(ctx: &SearchContext<'_>, anchor: &ElementSelector) -> String {
    match ancestor_depth(ctx, anchor) {
        Some(depth) => format!("ancestor at depth {} [{}]", depth, describe_selector(anchor)),
        None => format!("ancestor [{}]", describe_selector(anchor)),
    }
}
