use crate::matcher;
use serde::{Deserialize, Serialize};

/// Identifier of a node inside one capture. Carries no meaning across captures.
pub type NodeId = u32;

/// Platform tag reported by the capture collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Android,
    Ios,
    Web,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Web => "web",
        }
    }
}

/// Screen-space rectangle, edges in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    /// True if any part of this rectangle lies inside `0..width` x `0..height`.
    pub fn overlaps_screen(&self, width: u32, height: u32) -> bool {
        let (width, height) = (width as i32, height as i32);
        self.right > 0 && self.bottom > 0 && self.left < width && self.top < height
    }
}

/// Raw pixel size as reported by the view system. Not trusted for identity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// One node of a captured UI tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_text: Option<String>,
    /// Resource name, e.g. `com.app:id/submit_button`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Center point encoded as `"x,y"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_hint_text(mut self, hint: impl Into<String>) -> Self {
        self.hint_text = Some(hint.into());
        self
    }

    pub fn with_accessibility_text(mut self, text: impl Into<String>) -> Self {
        self.accessibility_text = Some(text.into());
        self
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Set bounds and derive center and dimensions from them.
    pub fn with_bounds(mut self, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let bounds = Bounds::new(left, top, right, bottom);
        let (x, y) = bounds.center();
        self.center = Some(format!("{},{}", x, y));
        self.dimensions = Some(Dimensions {
            width: bounds.width().max(0) as u32,
            height: bounds.height().max(0) as u32,
        });
        self.bounds = Some(bounds);
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// First non-empty value among text, hint text and accessibility text.
    pub fn own_text(&self) -> Option<&str> {
        [&self.text, &self.hint_text, &self.accessibility_text]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.trim().is_empty())
    }

    pub fn own_resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// All nodes of this subtree in pre-order, starting with `self`.
    pub fn flatten(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        self.collect_pre_order(&mut out);
        out
    }

    fn collect_pre_order<'a>(&'a self, out: &mut Vec<&'a TreeNode>) {
        out.push(self);
        for child in &self.children {
            child.collect_pre_order(out);
        }
    }

    /// Strict descendants in pre-order.
    pub fn descendants(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_pre_order(&mut out);
        }
        out
    }

    pub fn any_descendant<F>(&self, predicate: &F) -> bool
    where
        F: Fn(&TreeNode) -> bool,
    {
        self.children
            .iter()
            .any(|child| predicate(child) || child.any_descendant(predicate))
    }

    /// Depth-first lookup by snapshot-local id.
    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        if self.id == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Structural equality over the whole subtree.
    ///
    /// Compares texts, resource id, bounds and center (within `center_tolerance_px`), then the
    /// children pairwise. `dimensions` never take part. With `ignore_ids` the snapshot-local ids
    /// are skipped, which is the only meaningful way to compare nodes of two captures.
    pub fn structurally_equal(
        &self,
        other: &TreeNode,
        ignore_ids: bool,
        center_tolerance_px: i32,
    ) -> bool {
        (ignore_ids || self.id == other.id)
            && self.text == other.text
            && self.hint_text == other.hint_text
            && self.accessibility_text == other.accessibility_text
            && self.resource_id == other.resource_id
            && self.bounds == other.bounds
            && matcher::center_points_match(
                self.center.as_deref(),
                other.center.as_deref(),
                center_tolerance_px,
            )
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.structurally_equal(b, ignore_ids, center_tolerance_px))
    }
}

/// Two back-to-back captures describe the same, settled hierarchy.
pub fn snapshots_consistent(first: &TreeNode, second: &TreeNode) -> bool {
    first.structurally_equal(second, true, 0)
}

/// What the capture collaborator hands over: a tree plus the screen it was taken on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capture {
    #[serde(default)]
    pub platform: Platform,
    pub screen_width: u32,
    pub screen_height: u32,
    pub root: TreeNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::new(1).with_bounds(0, 0, 1080, 2400).with_children(vec![
            TreeNode::new(2)
                .with_text("Title")
                .with_bounds(0, 0, 1080, 200),
            TreeNode::new(3).with_bounds(0, 200, 1080, 2400).with_children(vec![
                TreeNode::new(4)
                    .with_text("Submit")
                    .with_resource_id("com.app:id/submit")
                    .with_bounds(100, 300, 500, 400),
            ]),
        ])
    }

    #[test]
    fn test_flatten_is_pre_order() {
        let root = sample();
        let ids: Vec<_> = root.flatten().iter().map(|n| n.id.unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        let ids: Vec<_> = root.descendants().iter().map(|n| n.id.unwrap()).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_find() {
        let root = sample();
        assert_eq!(root.find(4).and_then(|n| n.text.as_deref()), Some("Submit"));
        assert!(root.find(99).is_none());
    }

    #[test]
    fn test_own_text_falls_back_to_hint_and_accessibility() {
        let node = TreeNode::new(1).with_text("  ").with_hint_text("Email");
        assert_eq!(node.own_text(), Some("Email"));
        let node = TreeNode::new(1).with_accessibility_text("Close");
        assert_eq!(node.own_text(), Some("Close"));
        assert_eq!(TreeNode::new(1).own_text(), None);
    }

    #[test]
    fn test_with_bounds_derives_center() {
        let node = TreeNode::new(1).with_bounds(100, 300, 500, 400);
        assert_eq!(node.center.as_deref(), Some("300,350"));
        assert_eq!(
            node.dimensions,
            Some(Dimensions {
                width: 400,
                height: 100
            })
        );
    }

    #[test]
    fn test_structural_equality_ignores_ids_on_request() {
        let a = sample();
        let mut b = sample();
        b.children[1].children[0].id = Some(42);

        assert!(!a.structurally_equal(&b, false, 0));
        assert!(a.structurally_equal(&b, true, 0));
        assert!(snapshots_consistent(&a, &b));
    }

    #[test]
    fn test_structural_equality_ignores_dimensions() {
        let a = sample();
        let mut b = sample();
        b.children[0].dimensions = Some(Dimensions {
            width: 1079,
            height: 201,
        });
        assert!(a.structurally_equal(&b, true, 0));

        b.children[0].bounds = Some(Bounds::new(0, 0, 1080, 201));
        assert!(!a.structurally_equal(&b, true, 0));
    }

    #[test]
    fn test_mutated_capture_is_inconsistent() {
        let a = sample();
        let mut b = sample();
        b.children[1].children[0].text = Some("Submitting".into());
        assert!(!snapshots_consistent(&a, &b));
    }

    #[test]
    fn test_capture_deserializes_with_defaults() {
        let capture: Capture = serde_json::from_value(serde_json::json!({
            "screen_width": 1080,
            "screen_height": 2400,
            "root": {
                "id": 1,
                "children": [{ "id": 2, "text": "OK", "bounds": { "left": 0, "top": 0, "right": 10, "bottom": 10 } }]
            }
        }))
        .unwrap();

        assert_eq!(capture.platform, Platform::Android);
        assert_eq!(capture.root.children[0].text.as_deref(), Some("OK"));
        assert!(capture.root.children[0].center.is_none());
    }

    #[test]
    fn test_platform_name_matches_wire_form() {
        for platform in [Platform::Android, Platform::Ios, Platform::Web] {
            assert_eq!(
                serde_json::to_value(platform).unwrap(),
                serde_json::json!(platform.name())
            );
        }
    }

    #[test]
    fn test_bounds_overlaps_screen() {
        assert!(Bounds::new(10, 10, 20, 20).overlaps_screen(100, 100));
        assert!(!Bounds::new(-50, 10, 0, 20).overlaps_screen(100, 100));
        assert!(!Bounds::new(10, 100, 20, 150).overlaps_screen(100, 100));
    }
}
