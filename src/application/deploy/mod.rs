//! Deploy Module
//!
//! Orchestrates the deployment flow for Nopeus.
//!
//! ## Structure
//!
//! - `options` - Per-run switches (`DeployOptions`)
//! - `result` - Result types (`DeployResult`, `EnvironmentReport`)
//! - `generate` - Generation phase (infrastructure files, unit list, values files)
//! - `use_case` - Core use case logic (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use nopeus::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(terraform, helm, state_repo, cluster, connector, fs);
//! let result = use_case.execute(&config, &DeployOptions::new())?;
//! ```

pub mod generate;
mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::{DeployResult, EnvironmentReport};
pub use use_case::DeployUseCase;
