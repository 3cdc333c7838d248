//! State repository port - local deployment snapshots

use std::path::Path;

use crate::domain::entities::DeploymentSnapshot;
use crate::error::NopeusResult;

/// Durable storage for per-environment snapshots
pub trait StateRepository {
    /// Read the snapshot at `path`; `Ok(None)` if no file exists
    fn restore(&self, path: &Path) -> NopeusResult<Option<DeploymentSnapshot>>;

    /// Write the snapshot, creating parent directories as needed
    fn persist(&self, snapshot: &DeploymentSnapshot, path: &Path) -> NopeusResult<()>;
}
