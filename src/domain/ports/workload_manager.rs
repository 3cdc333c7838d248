//! Workload manager port - chart releases on a cluster context

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::NopeusResult;

/// Upper bound for a single install or upgrade
pub const WORKLOAD_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Everything needed to install or upgrade one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplySpec {
    pub release: String,
    pub chart: String,
    pub namespace: String,
    pub values_file: Option<PathBuf>,
    /// Inline `key=value` overrides
    pub set_values: BTreeMap<String, String>,
    pub create_namespace: bool,
    pub dry_run: bool,
    pub wait: bool,
    pub timeout: Duration,
}

impl ApplySpec {
    pub fn new(release: &str, chart: &str, namespace: &str) -> Self {
        Self {
            release: release.to_string(),
            chart: chart.to_string(),
            namespace: namespace.to_string(),
            values_file: None,
            set_values: BTreeMap::new(),
            create_namespace: true,
            dry_run: false,
            wait: true,
            timeout: WORKLOAD_TIMEOUT,
        }
    }

    /// Attach a values file; an empty path means none.
    pub fn with_values_file(mut self, path: &Path) -> Self {
        self.values_file = (!path.as_os_str().is_empty()).then(|| path.to_path_buf());
        self
    }

    pub fn with_set_value(mut self, key: &str, value: &str) -> Self {
        self.set_values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Package-based workload manager (helm)
///
/// Every call names the cluster context explicitly; adapters must not rely
/// on whatever context happens to be current.
pub trait WorkloadManager {
    /// Register a chart repository
    fn add_repository(&self, name: &str, url: &str) -> NopeusResult<()>;

    /// Install the release, or upgrade it if it exists
    fn install_or_upgrade(&self, context: &str, spec: &ApplySpec) -> NopeusResult<()>;

    fn uninstall(&self, context: &str, release: &str, namespace: &str) -> NopeusResult<()>;

    /// Whether a release with this name is installed
    fn release_exists(&self, context: &str, release: &str, namespace: &str) -> NopeusResult<bool>;

    /// User-supplied values of an installed release, `None` if not installed
    fn release_values(
        &self,
        context: &str,
        release: &str,
        namespace: &str,
    ) -> NopeusResult<Option<serde_json::Value>>;
}
