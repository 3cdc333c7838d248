//! Snapshot assembly and unfolding
//!
//! A snapshot carries the infrastructure tool's state file between runs and
//! machines. It is read back and unfolded into the workspace before the
//! infrastructure tool runs, and taken again after the workloads are applied.

use chrono::Utc;
use tracing::debug;

use crate::config::NopeusConfig;
use crate::domain::entities::DeploymentSnapshot;
use crate::domain::ports::FileSystem;
use crate::domain::value_objects::{CloudVendor, Workspace};
use crate::error::NopeusResult;

/// Capture the environment's current state
///
/// A workspace without a state file yields an empty blob.
pub fn create_snapshot(
    fs: &dyn FileSystem,
    config: &NopeusConfig,
    vendor: &CloudVendor,
    environment: &str,
    workspace: &Workspace,
) -> NopeusResult<DeploymentSnapshot> {
    let state_file = workspace.terraform_state();
    let terraform_state = if fs.exists(&state_file) {
        fs.read(&state_file)?
    } else {
        String::new()
    };

    Ok(DeploymentSnapshot {
        name: DeploymentSnapshot::cache_key(&config.stack_name(), environment),
        environment: environment.to_string(),
        cloud_vendor: vendor.to_string(),
        terraform_state,
        deployed_services: config.app.services.keys().cloned().collect(),
        created_at: Some(Utc::now()),
    })
}

/// Write the snapshot's state blob where the infrastructure tool expects it
///
/// Returns whether anything was written; an empty blob writes nothing.
pub fn unfold(
    fs: &dyn FileSystem,
    snapshot: &DeploymentSnapshot,
    workspace: &Workspace,
) -> NopeusResult<bool> {
    if !snapshot.has_terraform_state() {
        debug!(environment = %snapshot.environment, "snapshot has no infrastructure state");
        return Ok(false);
    }
    fs.write(&workspace.terraform_state(), &snapshot.terraform_state)?;
    Ok(true)
}
