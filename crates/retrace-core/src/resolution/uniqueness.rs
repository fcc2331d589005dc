use super::properties::{id_pattern, text_pattern};
use retrace_common::matcher::TextPattern;
use retrace_common::{NodeId, TreeNode};
use serde::Serialize;

/// How often the target's own text and id occur across the whole tree.
///
/// `text` and `identifier` are the patterns selectors would use, so the counts describe exactly
/// what such a selector would match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertyUniquenessReport {
    pub text: Option<String>,
    pub text_is_unique: bool,
    pub text_occurrence_count: usize,
    pub matching_ids_for_text: Vec<NodeId>,
    pub identifier: Option<String>,
    pub id_is_unique: bool,
    pub id_occurrence_count: usize,
    pub matching_ids_for_identifier: Vec<NodeId>,
}

pub struct UniquenessAnalyzer;

impl UniquenessAnalyzer {
    pub fn analyze(target: &TreeNode, root: &TreeNode) -> PropertyUniquenessReport {
        let nodes = root.flatten();
        let mut report = PropertyUniquenessReport {
            text: text_pattern(target),
            identifier: id_pattern(target),
            ..PropertyUniquenessReport::default()
        };

        if let Some(text) = &report.text {
            let pattern = TextPattern::compile(text);
            let hits: Vec<&TreeNode> = nodes
                .iter()
                .copied()
                .filter(|n| pattern.matches_text_of(n))
                .collect();
            report.text_occurrence_count = hits.len();
            report.text_is_unique = hits.len() == 1;
            report.matching_ids_for_text = hits.iter().filter_map(|n| n.id).collect();
        }

        if let Some(identifier) = &report.identifier {
            let pattern = TextPattern::compile(identifier);
            let hits: Vec<&TreeNode> = nodes
                .iter()
                .copied()
                .filter(|n| pattern.matches_id_of(n))
                .collect();
            report.id_occurrence_count = hits.len();
            report.id_is_unique = hits.len() == 1;
            report.matching_ids_for_identifier = hits.iter().filter_map(|n| n.id).collect();
        }

        report
    }
}
