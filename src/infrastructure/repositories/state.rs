//! JSON State Repository
//!
//! Persists deployment snapshots at `.nopeus/state/<env>.nopeus.state`.
//! Writes hold an exclusive lock on a `.lock` sidecar and replace the file
//! atomically, so an interrupted run never leaves a half-written snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::entities::DeploymentSnapshot;
use crate::domain::ports::StateRepository;
use crate::error::{NopeusError, NopeusResult};
use crate::infrastructure::fs::atomic_write;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStateRepository;

impl JsonStateRepository {
    pub fn new() -> Self {
        Self
    }

    fn lock_path(path: &Path) -> PathBuf {
        path.with_extension("lock")
    }
}

impl StateRepository for JsonStateRepository {
    fn restore(&self, path: &Path) -> NopeusResult<Option<DeploymentSnapshot>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        DeploymentSnapshot::from_json(&content)
            .map(Some)
            .map_err(|e| NopeusError::StateCorrupted {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    fn persist(&self, snapshot: &DeploymentSnapshot, path: &Path) -> NopeusResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_file = fs::File::create(Self::lock_path(path))?;
        lock_file.lock_exclusive()?;

        let result = snapshot
            .to_json()
            .map_err(NopeusError::from)
            .and_then(|content| atomic_write(path, content.as_bytes()));

        let _ = lock_file.unlock();
        result
    }
}
