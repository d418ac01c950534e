//! The engine facade - snapshot fetch plus the per-project operations.

use crate::builder::DependencyGraph;
use crate::conflicts::{detect_conflicts, ConflictReport};
use crate::critical_path::{calculate_critical_path, CriticalPath};
use crate::cycles::{detect_cycles, CycleReport};
use keystone_core::{ProjectId, Time};
use keystone_storage::{EdgeStore, StorageError};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Errors surfaced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A storage read failed; propagated unchanged from the edge store.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The composed "project health" answer callers usually want.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectHealth {
    /// The analyzed project
    pub project_id: ProjectId,

    /// When the underlying snapshot was taken
    pub taken_at: Time,

    /// Number of initiatives in the snapshot
    pub initiative_count: usize,

    /// Number of dependency edges in the snapshot
    pub dependency_count: usize,

    /// Deadlock scan result
    pub deadlocks: CycleReport,

    /// Critical path and total project duration
    pub critical_path: CriticalPath,

    /// Scheduling conflict report (deadlocks folded in)
    pub conflicts: ConflictReport,
}

/// Dependency graph engine over an injected edge store.
///
/// Stateless and idempotent: every operation fetches one fresh snapshot,
/// computes over it synchronously, and holds nothing between calls.
/// Cloning is cheap; concurrent calls for the same or different projects
/// are safe.
#[derive(Clone)]
pub struct GraphEngine {
    store: Arc<dyn EdgeStore>,
}

impl GraphEngine {
    /// Create an engine reading from the given store.
    pub fn new(store: Arc<dyn EdgeStore>) -> Self {
        Self { store }
    }

    /// Build the dependency graph for a project.
    pub async fn dependency_graph(
        &self,
        project_id: ProjectId,
    ) -> Result<DependencyGraph, GraphError> {
        let snapshot = self.store.load_project(project_id).await?;
        debug!(
            %project_id,
            initiatives = snapshot.initiatives.len(),
            edges = snapshot.dependencies.len(),
            "building dependency graph"
        );
        Ok(DependencyGraph::build(
            snapshot.initiatives,
            &snapshot.dependencies,
        ))
    }

    /// Scan a project for deadlocked (cyclic) dependency chains.
    pub async fn detect_deadlocks(&self, project_id: ProjectId) -> Result<CycleReport, GraphError> {
        let graph = self.dependency_graph(project_id).await?;
        let report = detect_cycles(&graph);
        if report.has_deadlocks {
            info!(%project_id, cycles = report.cycles.len(), "deadlocks detected");
        }
        Ok(report)
    }

    /// Compute a project's critical path and total duration.
    pub async fn calculate_critical_path(
        &self,
        project_id: ProjectId,
    ) -> Result<CriticalPath, GraphError> {
        let graph = self.dependency_graph(project_id).await?;
        Ok(calculate_critical_path(&graph))
    }

    /// Flag scheduling conflicts, deadlocks included.
    pub async fn detect_scheduling_conflicts(
        &self,
        project_id: ProjectId,
    ) -> Result<ConflictReport, GraphError> {
        let graph = self.dependency_graph(project_id).await?;
        let cycle_report = detect_cycles(&graph);
        Ok(detect_conflicts(&graph, &cycle_report))
    }

    /// Run all diagnostics off one snapshot and compose the answer.
    pub async fn project_health(&self, project_id: ProjectId) -> Result<ProjectHealth, GraphError> {
        let snapshot = self.store.load_project(project_id).await?;
        let taken_at = snapshot.taken_at;
        let initiative_count = snapshot.initiatives.len();
        let dependency_count = snapshot.dependencies.len();

        let graph = DependencyGraph::build(snapshot.initiatives, &snapshot.dependencies);
        let deadlocks = detect_cycles(&graph);
        let critical_path = calculate_critical_path(&graph);
        let conflicts = detect_conflicts(&graph, &deadlocks);

        info!(
            %project_id,
            initiatives = initiative_count,
            total_days = critical_path.total_duration_days,
            deadlocks = deadlocks.cycles.len(),
            conflicts = conflicts.conflicts.len(),
            "project health computed"
        );

        Ok(ProjectHealth {
            project_id,
            taken_at,
            initiative_count,
            dependency_count,
            deadlocks,
            critical_path,
            conflicts,
        })
    }
}
