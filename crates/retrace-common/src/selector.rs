use crate::protocol::{Bounds, NodeId};
use serde::{Deserialize, Serialize};

/// Geometric relation between a candidate and a reference node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    LeftOf,
    RightOf,
    Above,
    Below,
}

impl Relation {
    pub fn name(&self) -> &'static str {
        match self {
            Relation::LeftOf => "left-of",
            Relation::RightOf => "right-of",
            Relation::Above => "above",
            Relation::Below => "below",
        }
    }

    /// Does `candidate` sit in this direction of `reference`? Touching edges count.
    pub fn holds(&self, candidate: &Bounds, reference: &Bounds) -> bool {
        match self {
            Relation::LeftOf => candidate.right <= reference.left,
            Relation::RightOf => candidate.left >= reference.right,
            Relation::Above => candidate.bottom <= reference.top,
            Relation::Below => candidate.top >= reference.bottom,
        }
    }
}

/// "Matching node must be `relation` of node `reference_node_id`".
///
/// Node ids only mean something inside the capture they came from. A constraint that has to be
/// replayed on another capture carries `reference`, a selector that finds the reference node on
/// its own; when set, it is used instead of the id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelativeConstraint {
    pub reference_node_id: NodeId,
    pub relation: Relation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Box<ElementSelector>>,
}

impl RelativeConstraint {
    pub fn new(reference_node_id: NodeId, relation: Relation) -> Self {
        Self {
            reference_node_id,
            relation,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: ElementSelector) -> Self {
        self.reference = Some(Box::new(reference));
        self
    }
}

/// Externally supplied positional clue. Same shape as the constraint it becomes.
pub type SpatialHint = RelativeConstraint;

/// Declarative predicate that re-locates an element in a capture.
///
/// All set fields are conjunctive. `index` is applied last, over the nodes that survive every
/// other field, in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_regex: Option<String>,
    /// Node must sit anywhere beneath a node matching this selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_of: Option<Box<ElementSelector>>,
    /// Some direct child must match this selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_child: Option<Box<ElementSelector>>,
    /// Every selector here must match some descendant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains_descendants: Vec<ElementSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relative: Vec<RelativeConstraint>,
}

impl ElementSelector {
    pub fn text(pattern: impl Into<String>) -> Self {
        Self {
            text_regex: Some(pattern.into()),
            ..Self::default()
        }
    }

    pub fn id(pattern: impl Into<String>) -> Self {
        Self {
            id_regex: Some(pattern.into()),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, pattern: impl Into<String>) -> Self {
        self.text_regex = Some(pattern.into());
        self
    }

    pub fn with_id(mut self, pattern: impl Into<String>) -> Self {
        self.id_regex = Some(pattern.into());
        self
    }

    pub fn child_of(mut self, parent: ElementSelector) -> Self {
        self.child_of = Some(Box::new(parent));
        self
    }

    pub fn containing_child(mut self, child: ElementSelector) -> Self {
        self.contains_child = Some(Box::new(child));
        self
    }

    pub fn containing_descendants(mut self, descendants: Vec<ElementSelector>) -> Self {
        self.contains_descendants = descendants;
        self
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_relative(mut self, constraint: RelativeConstraint) -> Self {
        self.relative.push(constraint);
        self
    }

    /// Text or id pattern is set.
    pub fn has_own_properties(&self) -> bool {
        self.text_regex.is_some() || self.id_regex.is_some()
    }

    /// Anything other than `index` narrows the match set.
    pub fn has_discriminator(&self) -> bool {
        self.has_own_properties()
            || self.child_of.is_some()
            || self.contains_child.is_some()
            || !self.contains_descendants.is_empty()
            || !self.relative.is_empty()
    }

    pub fn is_index_only(&self) -> bool {
        !self.has_discriminator()
    }
}
