//! In-memory storage backend.
//!
//! Used as the test double for the engine and as a real backend for
//! embedders that do not need persistence.

use crate::{EdgeStore, Result};
use async_trait::async_trait;
use keystone_core::{
    validate_new_edge, DependencyEdge, Initiative, InitiativeId, ProjectId,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory edge store backed by `HashMap`s behind an async lock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    // Insertion order matters: the engine's tie-breaks follow it.
    initiatives: Vec<Initiative>,
    dependencies: HashMap<ProjectId, Vec<DependencyEdge>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EdgeStore for MemoryStore {
    async fn save_initiative(&self, initiative: &Initiative) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.initiatives.iter_mut().find(|i| i.id == initiative.id) {
            Some(existing) => *existing = initiative.clone(),
            None => inner.initiatives.push(initiative.clone()),
        }
        Ok(())
    }

    async fn load_initiative(&self, id: InitiativeId) -> Result<Option<Initiative>> {
        let inner = self.inner.read().await;
        Ok(inner.initiatives.iter().find(|i| i.id == id).cloned())
    }

    async fn list_initiatives(&self, project_id: ProjectId) -> Result<Vec<Initiative>> {
        let inner = self.inner.read().await;
        Ok(inner
            .initiatives
            .iter()
            .filter(|i| i.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn delete_initiative(&self, id: InitiativeId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.initiatives.retain(|i| i.id != id);
        Ok(())
    }

    async fn add_dependency(&self, project_id: ProjectId, edge: DependencyEdge) -> Result<()> {
        let mut inner = self.inner.write().await;
        let edges = inner.dependencies.entry(project_id).or_default();
        validate_new_edge(edge.from, edge.to, edges)?;
        edges.push(edge);
        Ok(())
    }

    async fn remove_dependency(
        &self,
        project_id: ProjectId,
        from: InitiativeId,
        to: InitiativeId,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(edges) = inner.dependencies.get_mut(&project_id) {
            edges.retain(|e| !(e.from == from && e.to == to));
        }
        Ok(())
    }

    async fn list_dependencies(&self, project_id: ProjectId) -> Result<Vec<DependencyEdge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .dependencies
            .get(&project_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use keystone_core::{DependencyError, DependencyType};

    #[tokio::test]
    async fn save_and_reload_initiative() {
        let store = MemoryStore::new();
        let project = ProjectId::new();
        let init = Initiative::new(project, "design review");
        store.save_initiative(&init).await.unwrap();

        let loaded = store.load_initiative(init.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "design review");

        // Saving again with the same ID updates in place.
        let renamed = Initiative {
            name: "design review v2".to_string(),
            ..loaded
        };
        store.save_initiative(&renamed).await.unwrap();
        assert_eq!(store.list_initiatives(project).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_dependency_runs_the_guard() {
        let store = MemoryStore::new();
        let project = ProjectId::new();
        let a = InitiativeId::new();
        let b = InitiativeId::new();

        store
            .add_dependency(project, DependencyEdge::new(a, b, DependencyType::FinishToStart))
            .await
            .unwrap();

        // Self-dependency refused.
        let err = store
            .add_dependency(project, DependencyEdge::new(a, a, DependencyType::FinishToStart))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Rejected(DependencyError::SelfDependency { .. })
        ));

        // Duplicate refused.
        let err = store
            .add_dependency(project, DependencyEdge::new(a, b, DependencyType::StartToStart))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Rejected(DependencyError::Duplicate { .. })
        ));

        // A cycle is NOT refused at write time.
        store
            .add_dependency(project, DependencyEdge::new(b, a, DependencyType::FinishToStart))
            .await
            .unwrap();
        assert_eq!(store.list_dependencies(project).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn snapshot_is_scoped_to_the_project() {
        let store = MemoryStore::new();
        let project = ProjectId::new();
        let other = ProjectId::new();

        let mine = Initiative::new(project, "mine");
        let theirs = Initiative::new(other, "theirs");
        store.save_initiative(&mine).await.unwrap();
        store.save_initiative(&theirs).await.unwrap();

        let snapshot = store.load_project(project).await.unwrap();
        assert_eq!(snapshot.initiatives.len(), 1);
        assert_eq!(snapshot.initiatives[0].id, mine.id);
        assert!(snapshot.dependencies.is_empty());
    }
}
