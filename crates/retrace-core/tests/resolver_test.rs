use retrace_common::{
    Capture, ElementSelector, NodeId, Platform, Relation, RelativeConstraint, TreeNode,
    snapshots_consistent,
};
use retrace_core::replay::{locate, relocates_same_element};
use retrace_core::{
    ResolutionError, ResolverConfig, SearchContext, SelectorResolver, synthesize_selector,
};
use serde_json::json;

fn capture(root: TreeNode) -> Capture {
    Capture {
        platform: Platform::Android,
        screen_width: 1080,
        screen_height: 2400,
        root,
    }
}

fn context(root: &TreeNode, target: NodeId) -> SearchContext<'_> {
    SearchContext::new(root, target, Platform::Android, 1080, 2400).unwrap()
}

/// A settings screen with repeated rows, shared labels and a few unique anchors.
fn settings_screen() -> TreeNode {
    let row = |id: NodeId, top: i32, label: &str, panel: &str| {
        TreeNode::new(id)
            .with_resource_id(format!("com.app:id/{}", panel))
            .with_bounds(0, top, 1080, top + 200)
            .with_children(vec![
                TreeNode::new(id + 1)
                    .with_text(label)
                    .with_bounds(40, top + 20, 700, top + 100),
                TreeNode::new(id + 2)
                    .with_text("On")
                    .with_resource_id("com.app:id/switch")
                    .with_bounds(800, top + 40, 1040, top + 160),
            ])
    };
    TreeNode::new(1).with_bounds(0, 0, 1080, 2400).with_children(vec![
        TreeNode::new(2)
            .with_text("Settings")
            .with_bounds(0, 0, 1080, 150),
        row(10, 200, "Wi-Fi", "wifi_panel"),
        row(20, 400, "Bluetooth", "bt_panel"),
        TreeNode::new(30)
            .with_bounds(0, 600, 1080, 1200)
            .with_children(vec![
                TreeNode::new(31)
                    .with_text("Details")
                    .with_bounds(40, 620, 1040, 700),
                TreeNode::new(33)
                    .with_text("Advanced")
                    .with_bounds(40, 700, 1040, 720),
                TreeNode::new(32)
                    .with_text("Details")
                    .with_bounds(40, 720, 1040, 800),
            ]),
        TreeNode::new(40)
            .with_bounds(0, 2200, 1080, 2400)
            .with_children(vec![
                TreeNode::new(41)
                    .with_text("OK")
                    .with_resource_id("com.app:id/ok_primary")
                    .with_bounds(40, 2220, 520, 2380),
                TreeNode::new(42)
                    .with_text("OK")
                    .with_resource_id("com.app:id/ok_secondary")
                    .with_bounds(560, 2220, 1040, 2380),
            ]),
    ])
}

fn shift_ids(node: &TreeNode, by: NodeId) -> TreeNode {
    TreeNode {
        id: node.id.map(|id| id + by),
        children: node.children.iter().map(|c| shift_ids(c, by)).collect(),
        ..node.clone()
    }
}

#[test]
fn test_every_resolved_selector_matches_only_its_target() {
    let root = settings_screen();
    let resolver = SelectorResolver::new();
    for node in root.flatten() {
        let id = node.id.unwrap();
        let ctx = context(&root, id);
        let resolved = resolver
            .resolve(&ctx)
            .unwrap_or_else(|e| panic!("node {}: {}", id, e));
        let outcome = ctx.get_matches(&resolved.selector);
        assert!(outcome.is_single(), "node {} via {}", id, resolved.strategy);
        assert!(ctx.is_correct_target(&outcome));
    }
}

#[test]
fn test_unique_text_gives_text_only_selector() {
    let root = settings_screen();
    let resolved = SelectorResolver::new().resolve(&context(&root, 21)).unwrap();
    assert_eq!(resolved.strategy, "target_properties");
    assert_eq!(resolved.selector, ElementSelector::text("Bluetooth"));
}

#[test]
fn test_sibling_ok_buttons_resolved_by_id() {
    let root = settings_screen();
    let ctx = context(&root, 41);
    let resolved = SelectorResolver::new().resolve(&ctx).unwrap();
    assert_eq!(resolved.selector, ElementSelector::id("ok_primary"));

    let secondary = root.find(42).unwrap();
    assert!(!ctx.matches_only(&resolved.selector, secondary));
    assert_eq!(ctx.get_matches(&resolved.selector).single().and_then(|n| n.id), Some(41));
}

#[test]
fn test_shared_switch_scoped_by_unique_parent() {
    let root = settings_screen();
    let resolved = SelectorResolver::new().resolve(&context(&root, 12)).unwrap();
    assert_eq!(resolved.strategy, "unique_parent");
    assert_eq!(
        resolved.selector,
        ElementSelector::text("On")
            .with_id("switch")
            .child_of(ElementSelector::id("wifi_panel"))
    );
}

#[test]
fn test_index_fallback_always_resolves() {
    let root = settings_screen();
    let config = ResolverConfig {
        enable_expensive_strategies: false,
        ..ResolverConfig::default()
    };
    let resolver = SelectorResolver::with_config(&config);
    let resolved = resolver.resolve(&context(&root, 32)).unwrap();
    assert_eq!(resolved.strategy, "index");
    assert_eq!(resolved.selector, ElementSelector::text("Details").at_index(1));
}

#[test]
fn test_spatial_hints_follow_supplied_order() {
    let capture = capture(settings_screen());
    let hints = vec![
        // valid but ambiguous: both Details rows sit below the title
        RelativeConstraint::new(2, Relation::Below),
        // holds, but the other Details row cannot be told apart from 31
        RelativeConstraint::new(31, Relation::Below),
        RelativeConstraint::new(33, Relation::Below),
        RelativeConstraint::new(41, Relation::Above),
    ];
    let resolved =
        synthesize_selector(&capture, 32, Some(hints), &ResolverConfig::default()).unwrap();
    assert_eq!(resolved.strategy, "spatial_hints");
    assert_eq!(
        resolved.selector,
        ElementSelector::text("Details").with_relative(
            RelativeConstraint::new(33, Relation::Below)
                .with_reference(ElementSelector::text("Advanced"))
        )
    );
}

#[test]
fn test_unreachable_target() {
    let capture = capture(settings_screen());
    assert_eq!(
        synthesize_selector(&capture, 999, None, &ResolverConfig::default()).unwrap_err(),
        ResolutionError::UnreachableTarget(999)
    );
}

#[test]
fn test_selectors_survive_recapture_with_new_ids() {
    let first = settings_screen();
    let second = shift_ids(&first, 1000);
    assert!(snapshots_consistent(&first, &second));

    let resolver = SelectorResolver::new();
    for node in first.flatten() {
        let id = node.id.unwrap();
        let resolved = resolver.resolve(&context(&first, id)).unwrap();
        let outcome = locate(&second, &resolved.selector);
        let found = outcome
            .single()
            .unwrap_or_else(|| panic!("node {} lost on replay", id));
        assert_eq!(found.id, Some(id + 1000));
        assert!(relocates_same_element(node, found, 5));
    }

    let hinted = synthesize_selector(
        &capture(first.clone()),
        32,
        Some(vec![RelativeConstraint::new(33, Relation::Below)]),
        &ResolverConfig::default(),
    )
    .unwrap();
    assert_eq!(hinted.strategy, "spatial_hints");
    let replayed = locate(&second, &hinted.selector);
    assert_eq!(replayed.single().and_then(|n| n.id), Some(1032));
}

#[test]
fn test_all_candidates_are_verified() {
    let root = settings_screen();
    let ctx = context(&root, 22);
    let candidates = SelectorResolver::new().resolve_all_candidates(&ctx);
    assert!(candidates.len() > 1);
    assert_eq!(candidates[0].strategy, "unique_parent");
    assert_eq!(candidates.last().map(|c| c.strategy), Some("index"));
    for candidate in &candidates {
        assert!(ctx.verify(&candidate.selector), "{}", candidate.justification);
    }
}

#[test]
fn test_capture_from_json() {
    let capture: Capture = serde_json::from_value(json!({
        "platform": "android",
        "screen_width": 1080,
        "screen_height": 2400,
        "root": {
            "id": 1,
            "children": [
                { "id": 2, "text": "Log In\nNow", "center": "540,1602",
                  "bounds": { "left": 0, "top": 1500, "right": 1080, "bottom": 1704 } },
                { "id": 3, "hint_text": "Password" }
            ]
        }
    }))
    .unwrap();

    let resolved =
        synthesize_selector(&capture, 2, None, &ResolverConfig::default()).unwrap();
    assert_eq!(resolved.selector, ElementSelector::text("Log In Now"));

    let found = locate(&capture.root, &ElementSelector::text("log in now"));
    assert_eq!(found.single().and_then(|n| n.id), Some(2));
}
