//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NopeusError, NopeusResult};

use super::types::{AppConfig, NopeusConfig, RuntimeConfig};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "nopeus.yaml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Dotted path of the unknown key
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> NopeusResult<(NopeusConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = serde_yaml_ng::Deserializer::from_str(&content);

    let app: AppConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| NopeusError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                file: path.to_path_buf(),
                line: find_line_number(&content, &leaf),
                suggestion: suggest_key(&leaf),
                key,
            }
        })
        .collect();

    let config = NopeusConfig::new(RuntimeConfig::for_config_path(path), app);
    Ok((with_env_overrides(config), warnings))
}

/// Load configuration, dropping warnings
pub fn load(path: &Path) -> NopeusResult<NopeusConfig> {
    load_with_warnings(path).map(|(config, _)| config)
}

/// Apply environment variable overrides (NOPEUS_* prefix)
pub fn with_env_overrides(mut config: NopeusConfig) -> NopeusConfig {
    if let Ok(token) = std::env::var("NOPEUS_TOKEN") {
        if !token.is_empty() {
            config.runtime.cloud_token = Some(token);
        }
    }

    if let Ok(url) = std::env::var("NOPEUS_CLOUD_URL") {
        if !url.is_empty() {
            config.runtime.cloud_url = url.trim_end_matches('/').to_string();
        }
    }

    if let Ok(path) = std::env::var("NOPEUS_TERRAFORM_PATH") {
        if !path.is_empty() {
            config.runtime.terraform_path = PathBuf::from(path);
        }
    }

    if let Ok(namespace) = std::env::var("NOPEUS_NAMESPACE") {
        if !namespace.is_empty() {
            config.runtime.default_namespace = namespace;
        }
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const KNOWN_KEYS: &[&str] = &[
        "version",
        "name",
        "vendor",
        "hosts",
        "environments",
        "env_file",
        "services",
        "image",
        "environment",
        "health_url",
        "replicas",
        "ingress",
        "host",
        "paths",
        "path",
        "strip",
        "extend",
        "storage",
        "database",
        "type",
    ];

    KNOWN_KEYS
        .iter()
        .map(|candidate| (*candidate, edit_distance(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, ac) in a.chars().enumerate() {
        let mut curr = Vec::with_capacity(b.len() + 1);
        curr.push(i + 1);
        for (j, bc) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ac != *bc);
            curr.push(substitution.min(prev[j + 1] + 1).min(curr[j] + 1));
        }
        prev = curr;
    }

    prev[b.len()]
}
