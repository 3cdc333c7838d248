//! Deployable unit entity
//!
//! One installable chart release plus the values it is rendered with. Ordinary
//! services, storage and the aggregate units (ingress, checksum record) share
//! the same shape and differ only in their apply policy.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::ports::{ApplySpec, WorkloadManager};
use crate::domain::value_objects::ContentHash;
use crate::error::NopeusResult;

/// Release name of the checksum record
pub const CHECKSUM_RELEASE: &str = "checksum";

/// Namespace the checksum record is installed into
pub const CHECKSUM_NAMESPACE: &str = "nopeus";

/// Unit name -> content hash of what was applied
pub type ChecksumMap = BTreeMap<String, ContentHash>;

/// Values rendered into a unit's values file
///
/// `custom` entries are flattened next to the fixed keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValuesPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(flatten)]
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl ValuesPayload {
    /// Keys owned by the payload itself; custom entries may not reuse them
    pub const RESERVED_KEYS: [&'static str; 4] = ["name", "image", "version", "environment"];

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: impl Into<String>, version: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self.version = Some(version.into());
        self
    }

    pub fn with_environment(mut self, environment: BTreeMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }
}

/// Units whose values are derived from other units
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregate {
    /// Routes for every service that declares ingress
    Ingress,
    /// Name -> hash record of every unit before it
    ChecksumRecord(ChecksumMap),
}

/// Unit variant and its apply policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    /// Microservice; install-or-upgrade on every apply
    Default,
    /// Database; installed once and never touched again while present
    Storage,
    Aggregate(Aggregate),
}

impl UnitKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Storage => "storage",
            Self::Aggregate(Aggregate::Ingress) => "ingress",
            Self::Aggregate(Aggregate::ChecksumRecord(_)) => "checksum",
        }
    }

    pub fn is_install_once(&self) -> bool {
        matches!(self, Self::Storage)
    }
}

/// What `DeployableUnit::apply` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Install-once unit found already installed
    AlreadyPresent,
}

#[derive(Serialize)]
struct CanonicalUnit<'a> {
    name: &'a str,
    chart: &'a str,
    values_template: Option<&'a str>,
    namespace: &'a str,
    kind: &'static str,
    values: &'a ValuesPayload,
}

/// One chart release in one environment
#[derive(Debug, Clone, PartialEq)]
pub struct DeployableUnit {
    name: String,
    chart: String,
    values_template: Option<String>,
    values_path: PathBuf,
    namespace: String,
    dry_run: bool,
    values: ValuesPayload,
    kind: UnitKind,
}

impl DeployableUnit {
    pub fn new(
        kind: UnitKind,
        name: impl Into<String>,
        chart: impl Into<String>,
        namespace: impl Into<String>,
        values: ValuesPayload,
    ) -> Self {
        Self {
            name: name.into(),
            chart: chart.into(),
            values_template: None,
            values_path: PathBuf::new(),
            namespace: namespace.into(),
            dry_run: false,
            values,
            kind,
        }
    }

    pub fn with_values_template(mut self, template: impl Into<String>) -> Self {
        self.values_template = Some(template.into());
        self
    }

    pub fn with_values_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.values_path = path.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chart(&self) -> &str {
        &self.chart
    }

    pub fn values_template(&self) -> Option<&str> {
        self.values_template.as_deref()
    }

    pub fn values_path(&self) -> &Path {
        &self.values_path
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn values(&self) -> &ValuesPayload {
        &self.values
    }

    pub fn kind(&self) -> &UnitKind {
        &self.kind
    }

    /// Stable content hash of identity and values
    ///
    /// The values path and dry-run flag are left out: they depend on the
    /// machine and the mode, not on what gets deployed.
    pub fn checksum(&self) -> NopeusResult<ContentHash> {
        let canonical = CanonicalUnit {
            name: &self.name,
            chart: &self.chart,
            values_template: self.values_template.as_deref(),
            namespace: &self.namespace,
            kind: self.kind.label(),
            values: &self.values,
        };
        let bytes = serde_json::to_vec(&canonical)?;
        Ok(ContentHash::from_bytes(&bytes))
    }

    /// Render the values file content
    pub fn render_values(&self) -> NopeusResult<String> {
        Ok(serde_yaml_ng::to_string(&self.values)?)
    }

    pub fn apply_spec(&self) -> ApplySpec {
        ApplySpec::new(&self.name, &self.chart, &self.namespace)
            .with_values_file(&self.values_path)
            .with_dry_run(self.dry_run)
    }

    /// Install or upgrade this unit's release on `context`
    pub fn apply(&self, workloads: &dyn WorkloadManager, context: &str) -> NopeusResult<ApplyOutcome> {
        if self.kind.is_install_once()
            && !self.dry_run
            && workloads.release_exists(context, &self.name, &self.namespace)?
        {
            tracing::debug!(unit = %self.name, "release already present, keeping it");
            return Ok(ApplyOutcome::AlreadyPresent);
        }
        workloads.install_or_upgrade(context, &self.apply_spec())?;
        Ok(ApplyOutcome::Applied)
    }

    /// Remove this unit's release from `context`
    pub fn delete(&self, workloads: &dyn WorkloadManager, context: &str) -> NopeusResult<()> {
        workloads.uninstall(context, &self.name, &self.namespace)
    }
}
