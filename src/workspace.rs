use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::fs;
use tracing::{debug, error};
use uuid::Uuid;

use crate::Result;

/// Per-request isolated directory holding the source, assets, and engine
/// output.
///
/// The name is derived from a fresh v4 UUID, never from client data, so no
/// two concurrently live workspaces can collide. Dropping the workspace
/// deletes it recursively; that runs on every exit path, including
/// extractor rejection, engine failure, and timeout.
pub struct Workspace {
    root: PathBuf,
    created_at: Instant,
}

impl Workspace {
    /// Create a fresh, empty workspace directory.
    pub async fn create() -> Result<Self> {
        let root = std::env::temp_dir().join(format!("texwork-{}", Uuid::new_v4()));
        fs::create_dir_all(&root).await?;
        debug!("Created workspace at {}", root.display());
        Ok(Self {
            root,
            created_at: Instant::now(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist the primary source under the fixed main filename.
    ///
    /// Called after asset extraction, so a colliding archive entry is
    /// overwritten and the uploaded document is always the entry point.
    pub async fn write_source(&self, main_filename: &str, source: &[u8]) -> Result<()> {
        fs::write(self.root.join(main_filename), source).await?;
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => debug!(
                "Destroyed workspace {} after {:?}",
                self.root.display(),
                self.created_at.elapsed()
            ),
            Err(e) => error!("Failed to clean up workspace {}: {}", self.root.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn workspace_is_deleted_on_drop() {
        let workspace = Workspace::create().await.unwrap();
        let root = workspace.root().to_path_buf();
        workspace
            .write_source("main.tex", b"\\documentclass{article}")
            .await
            .unwrap();
        assert!(root.join("main.tex").is_file());

        drop(workspace);
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn concurrent_workspaces_do_not_collide() {
        let a = Workspace::create().await.unwrap();
        let b = Workspace::create().await.unwrap();
        assert_ne!(a.root(), b.root());
    }
}
