use super::hierarchy::HierarchyNavigator;
use super::properties::{own_properties, property_variants};
use super::result::ResolutionError;
use super::uniqueness::{PropertyUniquenessReport, UniquenessAnalyzer};
use crate::config::ResolverConfig;
use retrace_common::{
    Capture, ElementSelector, MatchOutcome, NodeId, Platform, Query, SpatialHint, TreeNode,
};
use std::cell::OnceCell;
use std::ptr;
use tracing::debug;

/// An ancestor of the target together with a selector that matches only that ancestor.
#[derive(Debug, Clone)]
pub struct AncestorSelector<'a> {
    pub node: &'a TreeNode,
    pub selector: ElementSelector,
    /// 1 for the parent, 2 for the grandparent, ...
    pub depth: usize,
}

/// Everything one resolution call knows about its target.
///
/// Built per call and dropped afterwards. Derived facts are computed on first use and cached in
/// `OnceCell`s, so a context must stay on the thread that created it.
pub struct SearchContext<'a> {
    root: &'a TreeNode,
    target_id: NodeId,
    target: &'a TreeNode,
    /// Root first, parent last.
    ancestors: Vec<&'a TreeNode>,
    platform: Platform,
    screen_width: u32,
    screen_height: u32,
    spatial_hints: Option<Vec<SpatialHint>>,
    center_point_tolerance_px: i32,
    max_ancestor_depth: usize,
    max_unique_descendants: usize,
    query: Query<'a>,

    uniqueness: OnceCell<PropertyUniquenessReport>,
    unique_ancestors: OnceCell<Vec<AncestorSelector<'a>>>,
    unique_descendants: OnceCell<Vec<ElementSelector>>,
    best_child: OnceCell<Option<ElementSelector>>,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        root: &'a TreeNode,
        target_id: NodeId,
        platform: Platform,
        screen_width: u32,
        screen_height: u32,
    ) -> Result<Self, ResolutionError> {
        let ancestors = HierarchyNavigator::find_path_to_target(target_id, root)
            .ok_or(ResolutionError::UnreachableTarget(target_id))?;
        let target = match ancestors.last().copied() {
            Some(parent) => parent.children.iter().find(|c| c.id == Some(target_id)),
            None => Some(root),
        }
        .ok_or(ResolutionError::UnreachableTarget(target_id))?;

        let defaults = ResolverConfig::default();
        Ok(Self {
            root,
            target_id,
            target,
            ancestors,
            platform,
            screen_width,
            screen_height,
            spatial_hints: None,
            center_point_tolerance_px: defaults.center_point_tolerance_px,
            max_ancestor_depth: defaults.max_ancestor_depth,
            max_unique_descendants: defaults.max_unique_descendants,
            query: Query::new(root),
            uniqueness: OnceCell::new(),
            unique_ancestors: OnceCell::new(),
            unique_descendants: OnceCell::new(),
            best_child: OnceCell::new(),
        })
    }

    pub fn from_capture(capture: &'a Capture, target_id: NodeId) -> Result<Self, ResolutionError> {
        Self::new(
            &capture.root,
            target_id,
            capture.platform,
            capture.screen_width,
            capture.screen_height,
        )
    }

    /// Hints are tried in the order given.
    pub fn with_spatial_hints(mut self, hints: Vec<SpatialHint>) -> Self {
        self.spatial_hints = Some(hints);
        self
    }

    pub fn with_config(mut self, config: &ResolverConfig) -> Self {
        self.center_point_tolerance_px = config.center_point_tolerance_px;
        self.max_ancestor_depth = config.max_ancestor_depth;
        self.max_unique_descendants = config.max_unique_descendants;
        self
    }

    pub fn root(&self) -> &'a TreeNode {
        self.root
    }

    pub fn target(&self) -> &'a TreeNode {
        self.target
    }

    pub fn target_id(&self) -> NodeId {
        self.target_id
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn screen_width(&self) -> u32 {
        self.screen_width
    }

    pub fn screen_height(&self) -> u32 {
        self.screen_height
    }

    pub fn spatial_hints(&self) -> Option<&[SpatialHint]> {
        self.spatial_hints.as_deref()
    }

    pub fn center_point_tolerance_px(&self) -> i32 {
        self.center_point_tolerance_px
    }

    pub fn max_ancestor_depth(&self) -> usize {
        self.max_ancestor_depth
    }

    pub fn query(&self) -> Query<'a> {
        self.query
    }

    /// Ancestors nearest first: parent, grandparent, ..., root.
    pub fn ancestors_nearest_first(&self) -> impl Iterator<Item = &'a TreeNode> + '_ {
        self.ancestors.iter().rev().copied()
    }

    // ---- verified-match API ----

    /// Evaluate `selector` over the whole tree.
    pub fn get_matches(&self, selector: &ElementSelector) -> MatchOutcome<'a> {
        self.get_matches_in(selector, self.root)
    }

    /// Evaluate `selector` inside `root_override`. Unevaluable selectors count as no matches.
    pub fn get_matches_in(
        &self,
        selector: &ElementSelector,
        root_override: &'a TreeNode,
    ) -> MatchOutcome<'a> {
        evaluate_lenient(self.query, root_override, selector)
    }

    /// Exactly one match, and it is the target once ids are disregarded.
    pub fn is_correct_target(&self, outcome: &MatchOutcome<'_>) -> bool {
        outcome.single().is_some_and(|node| {
            node.structurally_equal(self.target, true, self.center_point_tolerance_px)
        })
    }

    pub fn verify(&self, selector: &ElementSelector) -> bool {
        self.is_correct_target(&self.get_matches(selector))
    }

    /// Does `selector` match `node` and nothing else in the tree?
    pub fn matches_only(&self, selector: &ElementSelector, node: &TreeNode) -> bool {
        self.get_matches(selector)
            .single()
            .is_some_and(|m| ptr::eq(m, node))
    }

    // ---- derived facts ----

    pub fn uniqueness(&self) -> &PropertyUniquenessReport {
        self.uniqueness
            .get_or_init(|| UniquenessAnalyzer::analyze(self.target, self.root))
    }

    /// The target's own text and id.
    pub fn target_properties(&self) -> ElementSelector {
        own_properties(self.target)
    }

    /// Own properties, or for a target without any, "contains its most specific child".
    pub fn target_local_selector(&self) -> ElementSelector {
        let own = self.target_properties();
        if own.has_own_properties() {
            return own;
        }
        match self.best_child_selector() {
            Some(child) => own.containing_child(child.clone()),
            None => own,
        }
    }

    /// Every ancestor with a tree-unique selector, nearest first.
    pub fn unique_ancestors(&self) -> &[AncestorSelector<'a>] {
        self.unique_ancestors.get_or_init(|| {
            self.ancestors_nearest_first()
                .enumerate()
                .filter_map(|(i, node)| {
                    self.tree_unique_selector_for(node)
                        .map(|selector| AncestorSelector {
                            node,
                            selector,
                            depth: i + 1,
                        })
                })
                .collect()
        })
    }

    pub fn unique_ancestor(&self) -> Option<&AncestorSelector<'a>> {
        self.unique_ancestors().first()
    }

    pub fn unique_descendant_selectors(&self) -> &[ElementSelector] {
        self.unique_descendants
            .get_or_init(|| self.unique_descendant_selectors_of(self.target))
    }

    pub fn best_child_selector(&self) -> Option<&ElementSelector> {
        self.best_child
            .get_or_init(|| self.most_specific_child_selector_of(self.target))
            .as_ref()
    }

    // ---- uncached helpers for arbitrary nodes ----

    /// First own-property selector (id, text, both) that matches `node` alone.
    pub fn tree_unique_selector_for(&self, node: &TreeNode) -> Option<ElementSelector> {
        property_variants(node)
            .into_iter()
            .find(|selector| self.matches_only(selector, node))
    }

    /// Tree-unique selectors for descendants of `node`, pre-order, capped by config.
    pub fn unique_descendant_selectors_of(&self, node: &TreeNode) -> Vec<ElementSelector> {
        let mut found: Vec<ElementSelector> = Vec::new();
        for descendant in node.descendants() {
            if found.len() >= self.max_unique_descendants {
                break;
            }
            if let Some(selector) = self.tree_unique_selector_for(descendant)
                && !found.contains(&selector)
            {
                found.push(selector);
            }
        }
        found
    }

    /// Child selector with the fewest matches tree-wide. Ties go to the earlier child.
    pub fn most_specific_child_selector_of(&self, node: &TreeNode) -> Option<ElementSelector> {
        let mut best: Option<(usize, ElementSelector)> = None;
        for child in &node.children {
            for selector in property_variants(child) {
                let count = self.get_matches(&selector).len();
                if count == 0 {
                    continue;
                }
                if best.as_ref().is_none_or(|(best_count, _)| count < *best_count) {
                    best = Some((count, selector));
                }
            }
        }
        best.map(|(_, selector)| selector)
    }
}

/// Evaluate through the shared query machinery, downgrading evaluation errors to no matches.
pub(crate) fn evaluate_lenient<'a>(
    query: Query<'a>,
    scope: &'a TreeNode,
    selector: &ElementSelector,
) -> MatchOutcome<'a> {
    match query.evaluate_in(scope, selector) {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!("Selector not evaluable, treating as no matches: {}", e);
            MatchOutcome::NoMatches
        }
    }
}
