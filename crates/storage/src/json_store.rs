//! JSON file storage implementation.
//!
//! Stores each initiative as `initiatives/<id>.json` and each project's
//! edge list as `dependencies/<project>.json`. Meant as a reference
//! backend; the platform's real database sits behind the same trait.

use crate::{EdgeStore, Result, StorageError};
use async_trait::async_trait;
use keystone_core::{
    validate_new_edge, DependencyEdge, Initiative, InitiativeId, ProjectId,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// File-based JSON storage backend.
pub struct JsonStore {
    root: PathBuf,
    // Serializes read-modify-write of the per-project edge files.
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Create storage rooted at `root`, creating the data directories.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("initiatives")).await?;
        fs::create_dir_all(root.join("dependencies")).await?;

        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    fn initiative_path(&self, id: InitiativeId) -> PathBuf {
        self.root.join("initiatives").join(format!("{}.json", id))
    }

    fn dependencies_path(&self, project_id: ProjectId) -> PathBuf {
        self.root
            .join("dependencies")
            .join(format!("{}.json", project_id))
    }

    async fn read_edges(&self, project_id: ProjectId) -> Result<Vec<DependencyEdge>> {
        Ok(read_json(&self.dependencies_path(project_id))
            .await?
            .unwrap_or_default())
    }

    async fn write_edges(&self, project_id: ProjectId, edges: &[DependencyEdge]) -> Result<()> {
        let json = serde_json::to_string_pretty(edges)?;
        fs::write(self.dependencies_path(project_id), json.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait]
impl EdgeStore for JsonStore {
    async fn save_initiative(&self, initiative: &Initiative) -> Result<()> {
        let json = serde_json::to_string_pretty(initiative)?;
        fs::write(self.initiative_path(initiative.id), json.as_bytes()).await?;
        debug!(id = %initiative.id, "saved initiative");
        Ok(())
    }

    async fn load_initiative(&self, id: InitiativeId) -> Result<Option<Initiative>> {
        read_json(&self.initiative_path(id)).await
    }

    async fn list_initiatives(&self, project_id: ProjectId) -> Result<Vec<Initiative>> {
        let mut initiatives: Vec<Initiative> =
            list_dir(&self.root.join("initiatives")).await?;
        initiatives.retain(|i| i.project_id == project_id);
        // Directory iteration order is not stable; storage order is
        // creation order.
        initiatives.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(initiatives)
    }

    async fn delete_initiative(&self, id: InitiativeId) -> Result<()> {
        fs::remove_file(self.initiative_path(id)).await.or_else(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Ok(())
            } else {
                Err(e)
            }
        })?;
        Ok(())
    }

    async fn add_dependency(&self, project_id: ProjectId, edge: DependencyEdge) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut edges = self.read_edges(project_id).await?;
        validate_new_edge(edge.from, edge.to, &edges)?;
        debug!(from = %edge.from, to = %edge.to, "adding dependency");
        edges.push(edge);
        self.write_edges(project_id, &edges).await
    }

    async fn remove_dependency(
        &self,
        project_id: ProjectId,
        from: InitiativeId,
        to: InitiativeId,
    ) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut edges = self.read_edges(project_id).await?;
        let before = edges.len();
        edges.retain(|e| !(e.from == from && e.to == to));
        if edges.len() == before {
            return Err(StorageError::NotFound(format!(
                "dependency {} -> {}",
                from, to
            )));
        }
        self.write_edges(project_id, &edges).await
    }

    async fn list_dependencies(&self, project_id: ProjectId) -> Result<Vec<DependencyEdge>> {
        self.read_edges(project_id).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        if let Ok(Some(item)) = read_json(&entry.path()).await {
            items.push(item);
        }
    }
    Ok(items)
}
