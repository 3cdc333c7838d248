//! Nopeus - declarative deployment orchestrator
//!
//! Nopeus turns a single application description (services, storage,
//! environments) into provisioned cloud infrastructure and workloads installed
//! on a Kubernetes cluster, skipping work that has not changed since the last run.
//!
//! The crate is layered the usual way:
//!
//! - `domain` - entities, value objects, pure services and port traits
//! - `application` - the deploy use case, generation phase and plugin pipeline
//! - `infrastructure` - terraform/helm/kubectl adapters, state files, remote cache
//! - `config` - configuration model and loading

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::deploy::{DeployOptions, DeployResult, DeployUseCase};
pub use config::{AppConfig, NopeusConfig, RuntimeConfig};
pub use error::{NopeusError, NopeusResult};
