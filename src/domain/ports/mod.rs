//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod cluster;
pub mod deploy_events;
pub mod file_system;
pub mod infrastructure_tool;
pub mod remote_cache;
pub mod state_repository;
pub mod workload_manager;

pub use cluster::{ClusterApi, ClusterConnector, DRY_RUN_CONTEXT};
pub use deploy_events::{DeployEvent, DeployEventSink, DeployPhase, NoopEventSink};
pub use file_system::FileSystem;
pub use infrastructure_tool::InfrastructureTool;
pub use remote_cache::RemoteCache;
pub use state_repository::StateRepository;
pub use workload_manager::{ApplySpec, WorkloadManager, WORKLOAD_TIMEOUT};
