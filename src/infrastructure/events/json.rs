//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use serde_json::json;
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let json = match event {
            DeployEvent::Started {
                config,
                environments,
                dry_run,
            } => json!({
                "event": "start",
                "command": "liftoff",
                "config": config.display().to_string(),
                "environments": environments,
                "dry_run": dry_run,
            }),

            DeployEvent::EnvironmentStarted { environment } => json!({
                "event": "environment_start",
                "command": "liftoff",
                "environment": environment,
            }),

            DeployEvent::PhaseStarted { environment, phase } => json!({
                "event": "phase",
                "command": "liftoff",
                "environment": environment,
                "phase": phase.as_str(),
            }),

            DeployEvent::InfrastructurePlanned {
                environment,
                has_changes,
            } => json!({
                "event": "infrastructure_planned",
                "command": "liftoff",
                "environment": environment,
                "has_changes": has_changes,
            }),

            DeployEvent::UnitApplied { environment, unit } => json!({
                "event": "unit_applied",
                "command": "liftoff",
                "environment": environment,
                "unit": unit,
            }),

            DeployEvent::UnitSkipped {
                environment,
                unit,
                reason,
            } => json!({
                "event": "unit_skipped",
                "command": "liftoff",
                "environment": environment,
                "unit": unit,
                "reason": reason,
            }),

            DeployEvent::StatePersisted { environment, path } => json!({
                "event": "state_persisted",
                "command": "liftoff",
                "environment": environment,
                "path": path.display().to_string(),
            }),

            DeployEvent::RemoteCachePulled { environment, found } => json!({
                "event": "remote_pulled",
                "command": "liftoff",
                "environment": environment,
                "found": found,
            }),

            DeployEvent::RemoteCachePushed { environment } => json!({
                "event": "remote_pushed",
                "command": "liftoff",
                "environment": environment,
            }),

            DeployEvent::EnvironmentCompleted {
                environment,
                applied,
                skipped,
            } => json!({
                "event": "environment_complete",
                "command": "liftoff",
                "environment": environment,
                "applied": applied,
                "skipped": skipped,
            }),

            DeployEvent::Completed {
                environments,
                applied,
                skipped,
            } => json!({
                "event": "complete",
                "command": "liftoff",
                "status": "success",
                "environments": environments,
                "applied": applied,
                "skipped": skipped,
            }),
        };

        self.write_event(json);
    }
}
