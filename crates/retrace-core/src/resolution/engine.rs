use super::context::SearchContext;
use super::result::{Candidate, ResolutionError, ResolvedSelector};
use super::strategies::{SelectorStrategy, default_strategies};
use crate::config::ResolverConfig;
use retrace_common::formatter::describe_selector;
use retrace_common::{Capture, NodeId, SpatialHint};
use tracing::{debug, info, warn};

/// Runs the strategies in their fixed order and keeps the first selector that verifies.
pub struct SelectorResolver {
    strategies: Vec<Box<dyn SelectorStrategy>>,
    enable_expensive_strategies: bool,
}

impl Default for SelectorResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorResolver {
    pub fn new() -> Self {
        Self::with_config(&ResolverConfig::default())
    }

    pub fn with_config(config: &ResolverConfig) -> Self {
        Self {
            strategies: default_strategies(),
            enable_expensive_strategies: config.enable_expensive_strategies,
        }
    }

    /// Names of the strategies that will run, in order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.active_strategies().map(|s| s.name()).collect()
    }

    fn active_strategies(&self) -> impl Iterator<Item = &dyn SelectorStrategy> {
        self.strategies
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| self.enable_expensive_strategies || s.is_performant() || s.is_last_resort())
    }

    pub fn resolve(&self, ctx: &SearchContext<'_>) -> Result<ResolvedSelector, ResolutionError> {
        let mut attempted = Vec::new();

        for strategy in self.active_strategies() {
            attempted.push(strategy.name().to_string());
            let Some(selector) = strategy.find_first(ctx) else {
                continue;
            };
            if !ctx.is_correct_target(&ctx.get_matches(&selector)) {
                debug!(
                    "Strategy {} returned a selector that does not verify, ignoring it",
                    strategy.name()
                );
                continue;
            }
            info!(
                "Resolved {} node {} via {}: {}",
                ctx.platform().name(),
                ctx.target_id(),
                strategy.name(),
                describe_selector(&selector)
            );
            return Ok(ResolvedSelector {
                selector,
                strategy: strategy.name(),
            });
        }

        warn!(
            "No strategy produced a selector for node {}",
            ctx.target_id()
        );
        Err(ResolutionError::NoSelectorFound {
            target: ctx.target_id(),
            attempted,
        })
    }

    /// Every verified candidate of every strategy, cheapest strategy first.
    pub fn resolve_all_candidates(&self, ctx: &SearchContext<'_>) -> Vec<Candidate> {
        self.active_strategies()
            .flat_map(|strategy| strategy.find_all_with_context(ctx))
            .collect()
    }
}

/// Build a context for `target_id` in `capture` and resolve it in one call.
pub fn synthesize_selector(
    capture: &Capture,
    target_id: NodeId,
    hints: Option<Vec<SpatialHint>>,
    config: &ResolverConfig,
) -> Result<ResolvedSelector, ResolutionError> {
    let mut ctx = SearchContext::from_capture(capture, target_id)?.with_config(config);
    if let Some(hints) = hints {
        ctx = ctx.with_spatial_hints(hints);
    }
    SelectorResolver::with_config(config).resolve(&ctx)
}
