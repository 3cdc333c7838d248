//! Environment entity
//!
//! One named deployment target. Created from configuration, then filled in by
//! the pipeline: variables after the env file loads, outputs after provisioning,
//! the cluster context after connecting and the checksum map after it is read
//! back from the cluster.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::ChecksumMap;
use crate::error::{NopeusError, NopeusResult};

/// Output the infrastructure tool must always produce outside dry-run
pub const ENVIRONMENT_OUTPUT: &str = "environment";

/// Variables visible to one environment
///
/// Entries from the env file shadow the process environment. The process
/// environment itself is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    entries: BTreeMap<String, String>,
}

impl EnvVars {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
    }

    /// Resolve a `${NAME}` reference; any other value is returned as-is.
    ///
    /// Returns `Err(name)` when the referenced variable is unset.
    pub fn resolve(&self, value: &str) -> Result<String, String> {
        match value
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Some(name) => self.get(name).ok_or_else(|| name.to_string()),
            None => Ok(value.to_string()),
        }
    }
}

/// One value from `terraform output -json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputValue {
    #[serde(default)]
    pub sensitive: bool,
    #[serde(rename = "type", default)]
    pub value_type: serde_json::Value,
    pub value: serde_json::Value,
}

impl OutputValue {
    pub fn string(value: &str) -> Self {
        Self {
            sensitive: false,
            value_type: serde_json::Value::String("string".to_string()),
            value: serde_json::Value::String(value.to_string()),
        }
    }
}

/// A deployment target and the state gathered for it during one run
#[derive(Debug, Clone)]
pub struct Environment {
    name: String,
    env_file: Option<PathBuf>,
    vars: EnvVars,
    kube_context: Option<String>,
    checksums: ChecksumMap,
    outputs: BTreeMap<String, OutputValue>,
}

impl Environment {
    pub fn new(name: impl Into<String>, env_file: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            env_file,
            vars: EnvVars::default(),
            kube_context: None,
            checksums: ChecksumMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    pub fn vars(&self) -> &EnvVars {
        &self.vars
    }

    pub fn set_vars(&mut self, vars: EnvVars) {
        self.vars = vars;
    }

    pub fn kube_context(&self) -> Option<&str> {
        self.kube_context.as_deref()
    }

    pub fn set_kube_context(&mut self, context: impl Into<String>) {
        self.kube_context = Some(context.into());
    }

    pub fn checksums(&self) -> &ChecksumMap {
        &self.checksums
    }

    pub fn set_checksums(&mut self, checksums: ChecksumMap) {
        self.checksums = checksums;
    }

    pub fn set_outputs(&mut self, outputs: BTreeMap<String, OutputValue>) {
        self.outputs = outputs;
    }

    /// Read a string-typed output
    pub fn output_string(&self, key: &str) -> NopeusResult<String> {
        let output = self
            .outputs
            .get(key)
            .ok_or_else(|| NopeusError::MissingOutput {
                key: key.to_string(),
            })?;
        match &output.value {
            serde_json::Value::String(s) => Ok(s.clone()),
            other => Err(NopeusError::InvalidOutput {
                key: key.to_string(),
                message: format!("expected a string, got {other}"),
            }),
        }
    }
}
