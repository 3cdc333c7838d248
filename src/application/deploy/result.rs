//! Deploy Result
//!
//! Result types for deploy operations.

use std::path::PathBuf;

/// What happened to one environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentReport {
    pub name: String,
    /// Units whose apply ran, in apply order
    pub applied: Vec<String>,
    /// Units left untouched, with the reason
    pub skipped: Vec<(String, String)>,
    pub infrastructure_changed: bool,
    /// Local snapshot written at the end of the pipeline
    pub state_path: PathBuf,
    pub remote_pushed: bool,
}

impl EnvironmentReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Result of a deploy operation
#[derive(Debug, Clone)]
pub struct DeployResult {
    pub environments: Vec<EnvironmentReport>,
    pub dry_run: bool,
}

impl DeployResult {
    pub fn new() -> Self {
        Self {
            environments: Vec::new(),
            dry_run: false,
        }
    }

    pub fn applied_count(&self) -> usize {
        self.environments.iter().map(|e| e.applied.len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.environments.iter().map(|e| e.skipped.len()).sum()
    }

    pub fn has_changes(&self) -> bool {
        self.environments
            .iter()
            .any(|e| e.infrastructure_changed || !e.applied.is_empty())
    }

    pub fn environment(&self, name: &str) -> Option<&EnvironmentReport> {
        self.environments.iter().find(|e| e.name == name)
    }
}

impl Default for DeployResult {
    fn default() -> Self {
        Self::new()
    }
}
