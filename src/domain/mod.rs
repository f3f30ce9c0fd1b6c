//! Domain layer: the tree engine, view state and edit session
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod context;
pub mod error;
pub mod node;
pub mod session;
pub mod tree;
pub mod validate;
pub mod view;

pub use context::ChartContext;
pub use error::{DomainError, DomainResult};
pub use node::{NodeId, NodePatch, NodeTemplate, OrgNode, Snapshot};
pub use session::{EditBuffer, EditSession, SessionPhase};
pub use validate::validate_tree;
pub use view::{PanOffset, PointerButton, ViewState, Zoom};
