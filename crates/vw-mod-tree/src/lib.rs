//! Incremental tree synchronization: ignore rules, directory walk, position
//! index, selection-preserving rebuilds and render memoization.

pub mod builder;
pub mod ignore_rules;
pub mod render;
pub mod session;
pub mod source;
pub mod types;

pub use builder::{BuildInput, TreeSnapshot, build};
pub use ignore_rules::IgnoreRuleSet;
pub use render::RenderCache;
pub use session::{ChangeTicket, DeleteTarget, Phase, RefreshMode, TreeSession};
pub use source::{DirEntryInfo, DirSource, OsDirSource};
pub use types::{ExpansionState, NodeKind, PositionIndex, TreeLine, TreeNode, ViewPolicy};
