pub mod schema;

pub use schema::{ResolverConfig, RetraceConfig};
