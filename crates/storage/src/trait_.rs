//! Storage trait abstraction.

use async_trait::async_trait;
use keystone_core::{
    DependencyEdge, DependencyError, Initiative, InitiativeId, ProjectId, ProjectSnapshot,
};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A write was refused by the mutation guard
    #[error(transparent)]
    Rejected(#[from] DependencyError),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Edge store adapter - supplies initiative records and dependency edges
/// scoped to one project.
///
/// This trait allows different storage backends to be plugged in. The
/// dependency engine only ever reads through [`EdgeStore::load_project`];
/// the mutation surface exists for the surrounding platform.
#[async_trait]
pub trait EdgeStore: Send + Sync {
    // === Initiative operations ===

    /// Save an initiative (create or update).
    async fn save_initiative(&self, initiative: &Initiative) -> Result<()>;

    /// Load an initiative by ID.
    async fn load_initiative(&self, id: InitiativeId) -> Result<Option<Initiative>>;

    /// List all initiatives in a project, in storage order.
    async fn list_initiatives(&self, project_id: ProjectId) -> Result<Vec<Initiative>>;

    /// Delete an initiative. Edges referencing it are left in place; the
    /// engine tolerates dangling references.
    async fn delete_initiative(&self, id: InitiativeId) -> Result<()>;

    // === Dependency operations ===

    /// Persist a dependency edge after running the mutation guard.
    ///
    /// Implementations MUST validate with
    /// [`keystone_core::validate_new_edge`] against the project's existing
    /// edges and refuse self-dependencies and duplicates. Cycles are not
    /// gated here - they are detected by the on-demand deadlock scan.
    async fn add_dependency(&self, project_id: ProjectId, edge: DependencyEdge) -> Result<()>;

    /// Remove a dependency edge.
    async fn remove_dependency(
        &self,
        project_id: ProjectId,
        from: InitiativeId,
        to: InitiativeId,
    ) -> Result<()>;

    /// List all dependency edges in a project, in storage order.
    async fn list_dependencies(&self, project_id: ProjectId) -> Result<Vec<DependencyEdge>>;

    // === Snapshot ===

    /// Load a project's initiatives and edges as one immutable snapshot.
    async fn load_project(&self, project_id: ProjectId) -> Result<ProjectSnapshot> {
        let initiatives = self.list_initiatives(project_id).await?;
        let dependencies = self.list_dependencies(project_id).await?;
        Ok(ProjectSnapshot::new(project_id, initiatives, dependencies))
    }
}
