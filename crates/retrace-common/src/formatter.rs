use crate::protocol::TreeNode;
use crate::selector::ElementSelector;

/// One-line, human-readable rendering of a selector.
///
/// e.g. `text "Submit" inside [id "login_form"]`
pub fn describe_selector(selector: &ElementSelector) -> String {
    let mut parts = Vec::new();

    if let Some(text) = &selector.text_regex {
        parts.push(format!("text {:?}", text));
    }
    if let Some(id) = &selector.id_regex {
        parts.push(format!("id {:?}", id));
    }
    if let Some(child) = &selector.contains_child {
        parts.push(format!("containing child [{}]", describe_selector(child)));
    }
    if !selector.contains_descendants.is_empty() {
        let inner: Vec<String> = selector
            .contains_descendants
            .iter()
            .map(describe_selector)
            .collect();
        parts.push(format!("containing [{}]", inner.join("; ")));
    }
    for constraint in &selector.relative {
        let reference = match &constraint.reference {
            Some(reference) => format!("[{}]", describe_selector(reference)),
            None => format!("#{}", constraint.reference_node_id),
        };
        parts.push(format!("{} {}", constraint.relation.name(), reference));
    }

    let mut output = if parts.is_empty() {
        "any element".to_string()
    } else {
        parts.join(", ")
    };

    if let Some(parent) = &selector.child_of {
        output.push_str(&format!(" inside [{}]", describe_selector(parent)));
    }
    if let Some(index) = selector.index {
        output.push_str(&format!(" at index {}", index));
    }

    output
}

/// e.g. `[12] "Submit" (com.app:id/submit) @ [100,300][500,400]`
pub fn describe_node(node: &TreeNode) -> String {
    let mut output = match node.id {
        Some(id) => format!("[{}]", id),
        None => "[-]".to_string(),
    };

    if let Some(text) = node.own_text() {
        output.push_str(&format!(" {:?}", text));
    }
    if let Some(resource_id) = node.own_resource_id() {
        output.push_str(&format!(" ({})", resource_id));
    }
    if let Some(b) = node.bounds {
        output.push_str(&format!(
            " @ [{},{}][{},{}]",
            b.left, b.top, b.right, b.bottom
        ));
    }
    if !node.children.is_empty() {
        output.push_str(&format!(" {{{} children}}", node.children.len()));
    }

    output
}
