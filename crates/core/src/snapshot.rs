//! Point-in-time project snapshot - the engine's input.

use crate::dependency::DependencyEdge;
use crate::id::ProjectId;
use crate::initiative::Initiative;
use crate::Time;
use serde::{Deserialize, Serialize};

/// An immutable read of one project's initiatives and dependency edges.
///
/// Every engine operation starts from a fresh snapshot: computation never
/// holds a storage lock or transaction, and identical snapshots always
/// produce identical results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// The project this snapshot is scoped to
    pub project_id: ProjectId,

    /// Initiative records, in storage order
    pub initiatives: Vec<Initiative>,

    /// Dependency edges, in storage order
    pub dependencies: Vec<DependencyEdge>,

    /// When the snapshot was taken
    pub taken_at: Time,
}

impl ProjectSnapshot {
    /// Create a snapshot stamped with the current time.
    pub fn new(
        project_id: ProjectId,
        initiatives: Vec<Initiative>,
        dependencies: Vec<DependencyEdge>,
    ) -> Self {
        Self {
            project_id,
            initiatives,
            dependencies,
            taken_at: chrono::Utc::now(),
        }
    }

    /// Whether the snapshot holds no initiatives at all.
    pub fn is_empty(&self) -> bool {
        self.initiatives.is_empty()
    }
}
