use super::ObjectStore;
use crate::error::{NotesError, Result};
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// Objects stored as files under a root directory, keyed by relative path
/// (e.g. `recordings/<uuid>-session.wav`).
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let valid = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(NotesError::ExternalStorage {
                key: key.to_string(),
                message: "key must be a relative path without '..'".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    /// Write an object, creating parent directories as needed
    #[cfg(test)]
    async fn put_object(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(key)?;
        let storage_err = |e: std::io::Error| NotesError::ExternalStorage {
            key: key.to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(storage_err)?;
        }
        tokio::fs::write(&path, bytes).await.map_err(storage_err)?;
        Ok(())
    }

    #[cfg(test)]
    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.resolve(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| NotesError::ExternalStorage {
                key: key.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalObjectStore {
    async fn delete_object(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted object {}", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Object {} already absent", key);
                Ok(())
            }
            Err(e) => Err(NotesError::ExternalStorage {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
