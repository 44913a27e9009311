pub mod document;
pub mod hierarchy;
pub mod id;
pub mod lint;
pub mod model;
pub mod ordering;
pub mod transform;

pub use document::{FORMAT_VERSION, ProjectDocument, ValidationError, decode, encode, to_json};
pub use hierarchy::{CycleError, reparent};
pub use id::NodeId;
pub use lint::{LintDiagnostic, LintSeverity, lint_scene};
pub use model::*;
pub use ordering::{OrderingDegraded, ParentFirst, order_parent_first};
pub use transform::{absolute_position, reparent_position};
