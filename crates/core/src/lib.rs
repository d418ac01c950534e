//! Keystone core data models.
//!
//! This crate defines the records the dependency engine computes over:
//! initiatives, dependency edges, and the snapshot type that carries a
//! project's nodes and edges into a computation.

#![warn(missing_docs)]

// Core identities
mod id;

// Initiatives and their relationships
mod dependency;
mod initiative;
mod snapshot;

// Re-exports
pub use id::*;

pub use dependency::{validate_new_edge, DependencyEdge, DependencyError, DependencyType};
pub use initiative::Initiative;
pub use snapshot::ProjectSnapshot;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
