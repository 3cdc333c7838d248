//! Deploy Options
//!
//! Per-run switches for the deploy use case.

/// Options for the deploy use case
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Plan and render only; nothing on the cluster or the remote cache changes
    pub dry_run: bool,
    /// Environments to deploy; empty means all, in configuration order
    pub environments: Vec<String>,
    /// Overrides every service's image version
    pub image_version: Option<String>,
}

impl DeployOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_environments<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environments = environments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image_version(mut self, version: impl Into<String>) -> Self {
        self.image_version = Some(version.into());
        self
    }

    /// Whether `environment` was selected
    pub fn includes(&self, environment: &str) -> bool {
        self.environments.is_empty() || self.environments.iter().any(|e| e == environment)
    }
}
