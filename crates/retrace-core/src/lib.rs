pub mod config;
pub mod replay;
pub mod resolution;

pub use config::{ResolverConfig, RetraceConfig};
pub use resolution::{
    Candidate, ResolutionError, ResolvedSelector, SearchContext, SelectorResolver,
    synthesize_selector,
};
