//! Subcommand bodies. Each returns the JSON values the binary prints, one per line.

use anyhow::{Context, Result, bail};
use retrace_common::formatter::describe_node;
use retrace_common::{Capture, ElementSelector, MatchOutcome, NodeId, SpatialHint};
use retrace_core::replay;
use retrace_core::{ResolverConfig, SearchContext, SelectorResolver, synthesize_selector};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn load_capture(path: &Path) -> Result<Capture> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read capture {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse capture {}", path.display()))
}

pub async fn load_hints(path: &Path) -> Result<Vec<SpatialHint>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read hints {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse hints {}", path.display()))
}

pub async fn load_selector(path: &Path) -> Result<ElementSelector> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read selector {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse selector {}", path.display()))
}

/// Refuse to work on a hierarchy that changed between two captures.
pub fn ensure_consistent(first: &Capture, second: &Capture) -> Result<()> {
    if !retrace_common::snapshots_consistent(&first.root, &second.root) {
        bail!("Captures differ; the hierarchy changed while it was being captured");
    }
    Ok(())
}

/// Resolve every target concurrently. Output order follows `targets`.
pub async fn resolve_targets(
    capture: Arc<Capture>,
    targets: &[NodeId],
    hints: Option<Vec<SpatialHint>>,
    config: ResolverConfig,
) -> Result<Vec<Value>> {
    let mut handles = Vec::with_capacity(targets.len());
    for &target in targets {
        let capture = Arc::clone(&capture);
        let hints = hints.clone();
        let config = config.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            match synthesize_selector(&capture, target, hints, &config) {
                Ok(resolved) => json!({
                    "target": target,
                    "strategy": resolved.strategy,
                    "selector": resolved.selector,
                }),
                Err(e) => {
                    warn!("{}", e);
                    json!({ "target": target, "error": e.to_string() })
                }
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.context("Resolution task failed")?);
    }
    info!("Resolved {} target(s)", results.len());
    Ok(results)
}

/// Every verified candidate for one target, ranked.
pub fn list_candidates(
    capture: &Capture,
    target: NodeId,
    hints: Option<Vec<SpatialHint>>,
    config: &ResolverConfig,
) -> Result<Vec<Value>> {
    let mut ctx = SearchContext::from_capture(capture, target)?.with_config(config);
    if let Some(hints) = hints {
        ctx = ctx.with_spatial_hints(hints);
    }
    let candidates = SelectorResolver::with_config(config).resolve_all_candidates(&ctx);
    candidates
        .into_iter()
        .map(|c| serde_json::to_value(c).context("Failed to serialize candidate"))
        .collect()
}

/// Locate a persisted selector in a capture.
pub fn replay_selector(capture: &Capture, selector: &ElementSelector) -> Value {
    match replay::locate(&capture.root, selector) {
        MatchOutcome::NoMatches => json!({ "outcome": "no_matches" }),
        MatchOutcome::SingleMatch { node, .. } => json!({
            "outcome": "single_match",
            "id": node.id,
            "node": describe_node(node),
        }),
        MatchOutcome::MultipleMatches { nodes, .. } => json!({
            "outcome": "multiple_matches",
            "ids": nodes.iter().filter_map(|n| n.id).collect::<Vec<_>>(),
        }),
    }
}
