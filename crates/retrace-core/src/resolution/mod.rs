pub mod context;
pub mod engine;
pub mod hierarchy;
pub mod properties;
pub mod result;
pub mod strategies;
pub mod uniqueness;

pub use context::{AncestorSelector, SearchContext};
pub use engine::{SelectorResolver, synthesize_selector};
pub use hierarchy::HierarchyNavigator;
pub use result::{Candidate, ResolutionError, ResolvedSelector};
pub use strategies::SelectorStrategy;
pub use uniqueness::{PropertyUniquenessReport, UniquenessAnalyzer};
