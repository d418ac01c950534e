//! Dependency edges between initiatives, and the pre-write mutation guard.

use crate::id::InitiativeId;
use crate::Time;
use serde::{Deserialize, Serialize};

/// Scheduling constraint carried by a dependency edge.
///
/// `FinishToStart` is the default and the only type with scheduling-conflict
/// semantics; the other three are structurally valid graph edges whose
/// conflict rules are not defined by the platform yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependencyType {
    /// Successor cannot start before the predecessor finishes
    #[default]
    FinishToStart,
    /// Successor cannot start before the predecessor starts
    StartToStart,
    /// Successor cannot finish before the predecessor finishes
    FinishToFinish,
    /// Successor cannot finish before the predecessor starts
    StartToFinish,
}

/// A directed dependency between two initiatives: `to` depends on `from`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The predecessor initiative
    pub from: InitiativeId,

    /// The successor initiative
    pub to: InitiativeId,

    /// Constraint type
    pub kind: DependencyType,

    /// When the edge was recorded
    pub created_at: Time,
}

impl DependencyEdge {
    /// Create a new edge.
    pub fn new(from: InitiativeId, to: InitiativeId, kind: DependencyType) -> Self {
        Self {
            from,
            to,
            kind,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Errors raised by the mutation guard before an edge is persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DependencyError {
    /// An initiative cannot depend on itself (`SELF_DEPENDENCY`).
    #[error("SELF_DEPENDENCY: initiative {id} cannot depend on itself")]
    SelfDependency {
        /// The offending initiative
        id: InitiativeId,
    },

    /// The exact edge already exists.
    #[error("DUPLICATE_DEPENDENCY: edge {from} -> {to} already exists")]
    Duplicate {
        /// The predecessor initiative
        from: InitiativeId,
        /// The successor initiative
        to: InitiativeId,
    },
}

/// Validate a new edge against the project's existing edges.
///
/// Rejects self-dependencies and exact duplicates. Cycle detection is
/// deliberately not run here: cycles are detected and reported by the
/// on-demand deadlock scan, not prevented at write time.
pub fn validate_new_edge(
    from: InitiativeId,
    to: InitiativeId,
    existing: &[DependencyEdge],
) -> Result<(), DependencyError> {
    if from == to {
        return Err(DependencyError::SelfDependency { id: from });
    }

    if existing.iter().any(|e| e.from == from && e.to == to) {
        return Err(DependencyError::Duplicate { from, to });
    }

    Ok(())
}
