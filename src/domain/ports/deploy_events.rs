//! Deploy Event Port
//!
//! Provides an observable interface for deploy runs.
//! Enables progress reporting, JSON event streams, and debugging.

use std::fmt;
use std::path::PathBuf;

/// Per-environment pipeline phase, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPhase {
    LoadEnvFile,
    Generate,
    FetchRemoteCache,
    UnfoldState,
    ProvisionInfra,
    ConnectCluster,
    LoadChecksums,
    RegistrySecret,
    ApplyUnits,
    PersistState,
    PushRemoteCache,
}

impl DeployPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadEnvFile => "load_env_file",
            Self::Generate => "generate",
            Self::FetchRemoteCache => "fetch_remote_cache",
            Self::UnfoldState => "unfold_state",
            Self::ProvisionInfra => "provision_infra",
            Self::ConnectCluster => "connect_cluster",
            Self::LoadChecksums => "load_checksums",
            Self::RegistrySecret => "registry_secret",
            Self::ApplyUnits => "apply_units",
            Self::PersistState => "persist_state",
            Self::PushRemoteCache => "push_remote_cache",
        }
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event emitted during a deploy run
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Run started
    Started {
        config: PathBuf,
        environments: Vec<String>,
        dry_run: bool,
    },

    EnvironmentStarted { environment: String },

    PhaseStarted {
        environment: String,
        phase: DeployPhase,
    },

    /// Infrastructure plan computed
    InfrastructurePlanned {
        environment: String,
        has_changes: bool,
    },

    UnitApplied { environment: String, unit: String },

    /// Unit left untouched (unchanged checksum or already installed)
    UnitSkipped {
        environment: String,
        unit: String,
        reason: String,
    },

    StatePersisted { environment: String, path: PathBuf },

    RemoteCachePulled { environment: String, found: bool },

    RemoteCachePushed { environment: String },

    EnvironmentCompleted {
        environment: String,
        applied: usize,
        skipped: usize,
    },

    /// Run completed
    Completed {
        environments: usize,
        applied: usize,
        skipped: usize,
    },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: Progress lines in the terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Check if this sink wants per-phase and per-unit events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingEventSink {
        events: Arc<Mutex<Vec<DeployEvent>>>,
    }

    impl DeployEventSink for RecordingEventSink {
        fn on_event(&self, event: DeployEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingEventSink {
            events: events.clone(),
        };

        sink.on_event(DeployEvent::EnvironmentStarted {
            environment: "prod".to_string(),
        });
        sink.on_event(DeployEvent::UnitApplied {
            environment: "prod".to_string(),
            unit: "api".to_string(),
        });

        assert_eq!(events.lock().unwrap().len(), 2);
        assert!(sink.wants_detailed_events());
    }

    #[test]
    fn noop_sink_wants_no_details() {
        assert!(!NoopEventSink.wants_detailed_events());
    }

    #[test]
    fn phase_names_are_snake_case() {
        assert_eq!(DeployPhase::ProvisionInfra.to_string(), "provision_infra");
        assert_eq!(DeployPhase::PushRemoteCache.as_str(), "push_remote_cache");
    }
}
