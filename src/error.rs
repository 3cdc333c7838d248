//! Error types for Nopeus
//!
//! Library code returns `NopeusResult`; the binary wraps errors with `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Nopeus operations
pub type NopeusResult<T> = Result<T, NopeusError>;

/// Main error type for Nopeus operations
#[derive(Error, Debug)]
pub enum NopeusError {
    /// Configuration has no `vendor` key
    #[error("configuration is missing a cloud vendor")]
    MissingCloudVendor,

    /// Configuration has no services to deploy
    #[error("configuration does not declare any services")]
    MissingServices,

    /// Configuration has no environments to deploy to
    #[error("configuration does not declare any environments")]
    NoEnvironments,

    /// Environment filter names an environment that is not configured
    #[error("unknown environment '{name}'")]
    UnknownEnvironment { name: String },

    /// Storage entry uses a database type without a known image
    #[error("unsupported database type '{kind}' for storage '{name}'")]
    UnsupportedDatabase { name: String, kind: String },

    /// `${VAR}` reference in a service environment could not be resolved
    #[error("environment variable '{variable}' referenced by service '{service}' is not set")]
    UnsetVariable { service: String, variable: String },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Env file contains a malformed line
    #[error("invalid env file {file}:{line}: {message}")]
    EnvFile {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// Two deployable units claim the same name in one environment
    #[error("deployable unit '{name}' is declared by both {first} and {second}")]
    DuplicateUnit {
        name: String,
        first: String,
        second: String,
    },

    /// Template rendering failed
    #[error("template '{template}': {message}")]
    Template { template: String, message: String },

    /// A generation task panicked before producing a result
    #[error("generation task '{task}' panicked")]
    GenerationPanicked { task: &'static str },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// External program could not be started
    #[error("failed to start '{program}': {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// External program exited unsuccessfully
    #[error("'{command}' failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// External program exceeded its time bound
    #[error("'{command}' timed out after {seconds}s")]
    CommandTimeout { command: String, seconds: u64 },

    /// Cluster connection is not implemented for this vendor
    #[error("cloud vendor '{vendor}' is not supported")]
    UnsupportedVendor { vendor: String },

    /// Required infrastructure output is missing
    #[error("infrastructure output '{key}' is missing")]
    MissingOutput { key: String },

    /// Infrastructure output has an unexpected shape
    #[error("infrastructure output '{key}' is invalid: {message}")]
    InvalidOutput { key: String, message: String },

    /// Persisted snapshot could not be decoded
    #[error("state file {path} is corrupted: {message}")]
    StateCorrupted { path: PathBuf, message: String },

    /// Remote token was rejected
    #[error("remote authentication failed: {message}")]
    RemoteAuth { message: String },

    /// Remote cache answered with an unexpected status
    #[error("remote cache returned HTTP {status} for {url}")]
    RemoteStatus { status: u16, url: String },

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
