//! Selectors built from a single node's own attributes.

use retrace_common::{ElementSelector, TreeNode};

/// Literal pattern for the node's own text, with line breaks folded to spaces so a re-wrapped
/// label still matches.
pub fn text_pattern(node: &TreeNode) -> Option<String> {
    node.own_text()
        .map(|text| regex::escape(&text.replace("\r\n", "\n").replace('\n', " ")))
}

/// Literal pattern for the last segment of the node's resource id.
///
/// `com.app:id/submit` becomes `submit`, which the matcher accepts for both namespaced and bare
/// ids.
pub fn id_pattern(node: &TreeNode) -> Option<String> {
    node.own_resource_id().map(|id| {
        let name = id.rsplit_once('/').map_or(id, |(_, name)| name);
        regex::escape(name)
    })
}

/// Text and id of the node, whichever are present.
pub fn own_properties(node: &TreeNode) -> ElementSelector {
    ElementSelector {
        text_regex: text_pattern(node),
        id_regex: id_pattern(node),
        ..ElementSelector::default()
    }
}

/// Id-only, text-only, then both; each only when the attributes exist.
pub fn property_variants(node: &TreeNode) -> Vec<ElementSelector> {
    let text = text_pattern(node);
    let id = id_pattern(node);
    let mut variants = Vec::new();
    if let Some(id) = &id {
        variants.push(ElementSelector::id(id.clone()));
    }
    if let Some(text) = &text {
        variants.push(ElementSelector::text(text.clone()));
    }
    if let (Some(text), Some(id)) = (text, id) {
        variants.push(ElementSelector::text(text).with_id(id));
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrace_common::matcher;

    #[test]
    fn test_text_pattern_is_literal_and_single_line() {
        let node = TreeNode::new(1).with_text("Total (USD)\n$5.00");
        let pattern = text_pattern(&node).unwrap();
        assert_eq!(pattern, r"Total \(USD\) \$5\.00");
        assert!(matcher::matches_text(&node, &pattern));
        let rewrapped = TreeNode::new(2).with_text("Total (USD) $5.00");
        assert!(matcher::matches_text(&rewrapped, &pattern));
    }

    #[test]
    fn test_id_pattern_strips_namespace() {
        let node = TreeNode::new(1).with_resource_id("com.app:id/ok_primary");
        assert_eq!(id_pattern(&node).as_deref(), Some("ok_primary"));
        let node = TreeNode::new(1).with_resource_id("ok.primary");
        assert_eq!(id_pattern(&node).as_deref(), Some(r"ok\.primary"));
    }

    #[test]
    fn test_property_variants_order() {
        let node = TreeNode::new(1)
            .with_text("OK")
            .with_resource_id("com.app:id/ok_primary");
        let variants = property_variants(&node);
        assert_eq!(
            variants,
            vec![
                ElementSelector::id("ok_primary"),
                ElementSelector::text("OK"),
                ElementSelector::text("OK").with_id("ok_primary"),
            ]
        );
        assert!(property_variants(&TreeNode::new(2)).is_empty());
        assert!(!own_properties(&TreeNode::new(2)).has_own_properties());
    }
}
