//! Console Event Sink
//!
//! Plain progress lines for interactive runs.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{DeployEvent, DeployEventSink};

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn stdout(verbose: bool) -> Self {
        Self::with_writer(io::stdout(), verbose)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, verbose: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            verbose,
        }
    }

    fn line(&self, text: String) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{text}");
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let text = match event {
            DeployEvent::Started {
                config,
                environments,
                dry_run,
            } => {
                let mode = if dry_run { " (dry run)" } else { "" };
                format!(
                    "Lift-off from {}{}: {}",
                    config.display(),
                    mode,
                    environments.join(", ")
                )
            }
            DeployEvent::EnvironmentStarted { environment } => {
                format!("==> {environment}")
            }
            DeployEvent::PhaseStarted { environment, phase } => {
                if !self.verbose {
                    return;
                }
                format!("    [{environment}] {phase}")
            }
            DeployEvent::InfrastructurePlanned {
                environment,
                has_changes,
            } => {
                let verdict = if has_changes { "changes" } else { "up to date" };
                format!("    [{environment}] infrastructure: {verdict}")
            }
            DeployEvent::UnitApplied { environment, unit } => {
                format!("    [{environment}] applied {unit}")
            }
            DeployEvent::UnitSkipped {
                environment,
                unit,
                reason,
            } => {
                if !self.verbose {
                    return;
                }
                format!("    [{environment}] skipped {unit} ({reason})")
            }
            DeployEvent::StatePersisted { environment, path } => {
                if !self.verbose {
                    return;
                }
                format!("    [{environment}] state saved to {}", path.display())
            }
            DeployEvent::RemoteCachePulled { environment, found } => {
                if !self.verbose {
                    return;
                }
                let what = if found { "found" } else { "empty" };
                format!("    [{environment}] remote cache {what}")
            }
            DeployEvent::RemoteCachePushed { environment } => {
                format!("    [{environment}] remote cache updated")
            }
            DeployEvent::EnvironmentCompleted {
                environment,
                applied,
                skipped,
            } => format!("<== {environment}: {applied} applied, {skipped} unchanged"),
            DeployEvent::Completed {
                environments,
                applied,
                skipped,
            } => format!(
                "Done: {environments} environment(s), {applied} applied, {skipped} unchanged"
            ),
        };

        self.line(text);
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose
    }
}
