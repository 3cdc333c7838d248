//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `process` - Subprocess runner with timeouts
//! - `terraform`, `helm`, `kubectl`, `connector` - External tool adapters
//! - `fs/` - Local file system
//! - `repositories/` - Local snapshot storage
//! - `remote/` - HTTP remote cache
//! - `events/` - Deploy event sinks
//! - `templates/` - Embedded infrastructure templates

pub mod connector;
pub mod events;
pub mod fs;
pub mod helm;
pub mod kubeconfig;
pub mod kubectl;
pub mod process;
pub mod remote;
pub mod repositories;
pub mod templates;
pub mod terraform;

// Re-export for convenience
pub use connector::VendorConnector;
pub use events::{ConsoleEventSink, JsonEventSink};
pub use fs::LocalFs;
pub use helm::HelmCli;
pub use kubectl::KubectlCli;
pub use process::{CommandRunner, CommandSpec, SystemRunner};
pub use remote::{HttpRemoteCache, RemoteSession};
pub use repositories::JsonStateRepository;
pub use templates::render_infrastructure;
pub use terraform::TerraformCli;
