//! Cluster ports - namespace/secret API and vendor connection

use crate::config::NopeusConfig;
use crate::domain::entities::Environment;
use crate::domain::value_objects::RegistryCredentials;
use crate::error::NopeusResult;

/// Context handle used when no cluster is contacted
pub const DRY_RUN_CONTEXT: &str = "dryrun";

/// Container orchestrator API
pub trait ClusterApi {
    /// Create the namespace unless it exists
    fn ensure_namespace(&self, context: &str, namespace: &str) -> NopeusResult<()>;

    /// Create the image pull secret unless it exists; `true` if created
    fn ensure_registry_secret(
        &self,
        context: &str,
        namespace: &str,
        credentials: &RegistryCredentials,
    ) -> NopeusResult<bool>;
}

/// Resolves a usable cluster context from infrastructure outputs
pub trait ClusterConnector {
    fn connect(&self, config: &NopeusConfig, environment: &Environment) -> NopeusResult<String>;
}
