//! Remote cache port - snapshots shared across machines

use crate::domain::entities::DeploymentSnapshot;
use crate::error::NopeusResult;

/// Authenticated remote snapshot store
///
/// Only constructed when a token is configured, so callers holding one can
/// assume the session was verified.
pub trait RemoteCache {
    /// Upload the snapshot under its cache key
    fn push(&self, snapshot: &DeploymentSnapshot) -> NopeusResult<()>;

    /// Download the snapshot for `key`; `Ok(None)` if the store has none yet
    fn pull(&self, key: &str) -> NopeusResult<Option<DeploymentSnapshot>>;

    /// Not implemented: concurrent runs against one environment are not coordinated.
    fn lock(&self, _key: &str) -> NopeusResult<()> {
        Ok(())
    }

    /// Not implemented, see `lock`.
    fn unlock(&self, _key: &str) -> NopeusResult<()> {
        Ok(())
    }
}
