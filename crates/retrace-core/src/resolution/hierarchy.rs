use retrace_common::{NodeId, TreeNode};

pub struct HierarchyNavigator;

impl HierarchyNavigator {
    /// Ancestors of `target`, ordered root to parent. Empty when the target is the root.
    ///
    /// `None` means the id is not in this tree, which callers treat as their own mistake.
    pub fn find_path_to_target(target: NodeId, root: &TreeNode) -> Option<Vec<&TreeNode>> {
        let mut path = Vec::new();
        Self::search(target, root, &mut path).then_some(path)
    }

    fn search<'a>(target: NodeId, node: &'a TreeNode, path: &mut Vec<&'a TreeNode>) -> bool {
        if node.id == Some(target) {
            return true;
        }
        path.push(node);
        for child in &node.children {
            if Self::search(target, child, path) {
                return true;
            }
        }
        path.pop();
        false
    }
}
