pub mod error;
pub mod formatter;
pub mod matcher;
pub mod protocol;
pub mod query;
pub mod selector;

pub use error::QueryError;
pub use protocol::{Bounds, Capture, NodeId, Platform, TreeNode, snapshots_consistent};
pub use query::{MatchOutcome, Query};
pub use selector::{ElementSelector, Relation, RelativeConstraint, SpatialHint};
