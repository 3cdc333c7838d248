//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - Runs the per-environment deploy pipeline
//!
//! ## Services
//!
//! - `plugins` - Ordered hook pipeline and the built-in plugins
//! - `state_cache` - Snapshot assembly and unfolding

pub mod deploy;
pub mod plugins;
pub mod state_cache;

pub use deploy::{DeployOptions, DeployResult, DeployUseCase, EnvironmentReport};
pub use plugins::{CertManagerPlugin, HookContext, Plugin, PluginPipeline, PrometheusPlugin};
pub use state_cache::{create_snapshot, unfold};
