//! Dependency graph engine - graph construction, deadlock detection,
//! critical path computation, and scheduling conflict checks.
//!
//! All computation is pure and runs over a point-in-time project snapshot;
//! the only async boundary is the storage fetch in [`GraphEngine`].

#![warn(missing_docs)]

pub mod builder;
pub mod conflicts;
pub mod critical_path;
pub mod cycles;
pub mod engine;

pub use builder::{DependencyGraph, GraphEdge};
pub use conflicts::{detect_conflicts, ConflictReason, ConflictReport, DateConflict};
pub use critical_path::{calculate_critical_path, CriticalPath};
pub use cycles::{detect_cycles, CycleReport};
pub use engine::{GraphEngine, GraphError, ProjectHealth};
