//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::value_objects::{CloudVendor, Workspace};
use crate::error::{NopeusError, NopeusResult};

/// Namespace services are installed into
pub const DEFAULT_NAMESPACE: &str = "nopeus-app";

/// Base URL of the remote cache service
pub const DEFAULT_CLOUD_URL: &str = "https://api.nopeus.salfati.group";

/// Application description loaded from `nopeus.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,

    /// Stack name; prefixes remote cache keys
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub vendor: Option<String>,

    /// Hosts served over TLS
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Deployed in the order they are declared
    #[serde(default)]
    pub environments: IndexMap<String, EnvironmentConfig>,

    #[serde(default)]
    pub services: IndexMap<String, ServiceConfig>,

    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Env file, relative to the config file's directory
    #[serde(default)]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub image: String,

    #[serde(default = "default_version")]
    pub version: String,

    /// Values may be literals or `${NAME}` references
    #[serde(default, deserialize_with = "scalar_map")]
    pub environment: BTreeMap<String, String>,

    #[serde(default)]
    pub health_url: Option<String>,

    #[serde(default = "default_replicas")]
    pub replicas: u32,

    #[serde(default)]
    pub ingress: Option<IngressConfig>,

    /// Extra chart values merged into the rendered values
    #[serde(default)]
    pub extend: BTreeMap<String, serde_json::Value>,
}

fn default_version() -> String {
    "latest".to_string()
}

fn default_replicas() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressConfig {
    pub host: String,
    #[serde(default)]
    pub paths: Vec<IngressPath>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressPath {
    pub path: String,
    #[serde(default)]
    pub strip: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub database: Vec<DatabaseConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_version")]
    pub version: String,
}

/// Container image for a supported database type
pub fn database_image(kind: &str) -> Option<&'static str> {
    match kind.to_lowercase().as_str() {
        "postgres" | "postgresql" => Some("postgres"),
        "mysql" => Some("mysql"),
        "mariadb" => Some("mariadb"),
        "mongodb" | "mongo" => Some("mongo"),
        "redis" => Some("redis"),
        _ => None,
    }
}

/// Accept numbers and booleans where strings are expected (`PORT: 8080`).
fn scalar_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw: BTreeMap<String, serde_yaml_ng::Value> = BTreeMap::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_yaml_ng::Value::String(s) => s,
                serde_yaml_ng::Value::Number(n) => n.to_string(),
                serde_yaml_ng::Value::Bool(b) => b.to_string(),
                serde_yaml_ng::Value::Null => String::new(),
                _ => {
                    return Err(D::Error::custom(format!(
                        "environment value for '{key}' must be a scalar"
                    )))
                }
            };
            Ok((key, value))
        })
        .collect()
}

/// Chart repository registered before anything is installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRepository {
    pub name: String,
    pub url: String,
}

impl ChartRepository {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Settings that come from where and how nopeus runs, not from the YAML
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub config_path: PathBuf,
    /// `.nopeus` directory next to the config file
    pub root_dir: PathBuf,
    /// Scratch area for generated files
    pub session_dir: PathBuf,
    pub default_namespace: String,
    pub cloud_token: Option<String>,
    pub cloud_url: String,
    pub terraform_path: PathBuf,
    pub helm_path: PathBuf,
    pub kubectl_path: PathBuf,
    pub chart_repositories: Vec<ChartRepository>,
}

impl RuntimeConfig {
    pub fn for_config_path(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let root_dir = config_dir_of(&config_path).join(".nopeus");
        Self {
            session_dir: root_dir.join("session"),
            root_dir,
            config_path,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            cloud_token: None,
            cloud_url: DEFAULT_CLOUD_URL.to_string(),
            terraform_path: PathBuf::from("terraform"),
            helm_path: PathBuf::from("helm"),
            kubectl_path: PathBuf::from("kubectl"),
            chart_repositories: vec![
                ChartRepository::new("salfatigroup", "https://charts.salfati.group"),
                ChartRepository::new("kong", "https://charts.konghq.com"),
                ChartRepository::new("bitnami", "https://charts.bitnami.com/bitnami"),
            ],
        }
    }

    /// Directory relative paths in the config are resolved against
    pub fn config_dir(&self) -> PathBuf {
        config_dir_of(&self.config_path)
    }

    /// Local snapshot file for an environment
    pub fn state_path(&self, environment: &str) -> PathBuf {
        self.root_dir
            .join("state")
            .join(format!("{environment}.nopeus.state"))
    }

    pub fn workspace(&self, vendor: &CloudVendor, environment: &str) -> Workspace {
        Workspace::new(&self.session_dir, vendor.as_str(), environment)
    }

    /// Token if one is configured and non-empty
    pub fn token(&self) -> Option<&str> {
        self.cloud_token.as_deref().filter(|t| !t.is_empty())
    }
}

fn config_dir_of(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// The single configuration object handed through the pipeline
#[derive(Debug, Clone)]
pub struct NopeusConfig {
    pub runtime: RuntimeConfig,
    pub app: AppConfig,
}

impl NopeusConfig {
    pub fn new(runtime: RuntimeConfig, app: AppConfig) -> Self {
        Self { runtime, app }
    }

    pub fn cloud_vendor(&self) -> NopeusResult<CloudVendor> {
        match self.app.vendor.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Ok(CloudVendor::parse(v)),
            _ => Err(NopeusError::MissingCloudVendor),
        }
    }

    /// Stack name used in cache keys; the config directory name if unset
    pub fn stack_name(&self) -> String {
        if !self.app.name.trim().is_empty() {
            return self.app.name.trim().to_string();
        }
        std::fs::canonicalize(self.runtime.config_dir())
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "nopeus".to_string())
    }

    /// Reject configurations that cannot be deployed, before any side effect
    pub fn validate(&self) -> NopeusResult<()> {
        self.cloud_vendor()?;
        if self.app.services.is_empty() {
            return Err(NopeusError::MissingServices);
        }
        if self.app.environments.is_empty() {
            return Err(NopeusError::NoEnvironments);
        }
        if let Some(storage) = &self.app.storage {
            for db in &storage.database {
                if database_image(&db.kind).is_none() {
                    return Err(NopeusError::UnsupportedDatabase {
                        name: db.name.clone(),
                        kind: db.kind.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
