//! Attribute matching shared by selector synthesis and replay.
//!
//! Both sides must go through these functions; any drift between them makes a synthesized
//! selector stop matching the element it was built for.

use crate::protocol::TreeNode;
use regex::{Regex, RegexBuilder};

/// A text/id pattern compiled once and tested against many nodes.
///
/// The source is compiled as a case-insensitive, multi-line, dot-matches-newline regex that must
/// match the whole value. Sources that are not valid regexes fall back to case-insensitive
/// literal comparison. Exact equality with the source always matches, so plain strings that
/// happen to contain metacharacters still find themselves.
#[derive(Debug, Clone)]
pub struct TextPattern {
    source: String,
    regex: Option<Regex>,
}

impl TextPattern {
    pub fn compile(source: &str) -> Self {
        Self {
            source: source.to_string(),
            regex: compile_full_match(source),
        }
    }

    pub fn is_regex(&self) -> bool {
        self.regex.is_some()
    }

    /// Test a single raw value.
    pub fn is_match(&self, value: &str) -> bool {
        if value == self.source {
            return true;
        }
        match &self.regex {
            Some(regex) => regex.is_match(value),
            None => value.to_lowercase() == self.source.to_lowercase(),
        }
    }

    fn matches_value(&self, value: &str) -> bool {
        self.is_match(value)
            || (value.contains('\n') && self.is_match(&collapse_newlines(value)))
    }

    /// Text, hint text or accessibility text matches, raw or with newlines collapsed.
    pub fn matches_text_of(&self, node: &TreeNode) -> bool {
        [&node.text, &node.hint_text, &node.accessibility_text]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .any(|v| self.matches_value(v))
    }

    /// Full resource id or its last path segment matches.
    pub fn matches_id_of(&self, node: &TreeNode) -> bool {
        let Some(resource_id) = node.resource_id.as_deref() else {
            return false;
        };
        self.is_match(resource_id)
            || resource_id
                .rsplit_once('/')
                .is_some_and(|(_, name)| self.is_match(name))
    }
}

fn compile_full_match(source: &str) -> Option<Regex> {
    let build = |pattern: &str| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .dot_matches_new_line(true)
            .build()
    };
    // Validate the bare source first: wrapping can turn an unbalanced source like `a)(b` into
    // a valid but unrelated regex.
    build(source).ok()?;
    build(&format!(r"\A(?:{})\z", source)).ok()
}

fn collapse_newlines(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\n', " ")
}

pub fn matches_text(node: &TreeNode, pattern: &str) -> bool {
    TextPattern::compile(pattern).matches_text_of(node)
}

pub fn matches_id(node: &TreeNode, pattern: &str) -> bool {
    TextPattern::compile(pattern).matches_id_of(node)
}

/// Compare two `"x,y"` center points with a per-axis tolerance.
///
/// Identical strings (and two missing values) always match. Anything that does not parse never
/// matches.
pub fn center_points_match(a: Option<&str>, b: Option<&str>, tolerance_px: i32) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) if a == b => true,
        (Some(a), Some(b)) => match (parse_point(a), parse_point(b)) {
            (Some((ax, ay)), Some((bx, by))) => {
                let within = |p: i32, q: i32| {
                    (i64::from(p) - i64::from(q)).abs() <= i64::from(tolerance_px)
                };
                within(ax, bx) && within(ay, by)
            }
            _ => false,
        },
        _ => false,
    }
}

fn parse_point(value: &str) -> Option<(i32, i32)> {
    let (x, y) = value.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}
