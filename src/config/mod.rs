//! Configuration module for Nopeus
//!
//! Resolution order:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (NOPEUS_*)
//! 3. `nopeus.yaml` next to the working directory (or `--config`)
//! 4. Built-in defaults (lowest priority)
//!
//! The resulting `NopeusConfig` is built once and passed by reference
//! through the whole deploy pipeline.

mod env_file;
mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use env_file::{load_env_file, parse_env_file};
pub use loader::{default_config_path, load, load_with_warnings, with_env_overrides, ConfigWarning};
pub use types::{
    database_image, AppConfig, ChartRepository, DatabaseConfig, EnvironmentConfig, IngressConfig,
    IngressPath, NopeusConfig, RuntimeConfig, ServiceConfig, StorageConfig, DEFAULT_CLOUD_URL,
    DEFAULT_NAMESPACE,
};
