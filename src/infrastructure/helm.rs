//! Helm CLI adapter
//!
//! Implements the `WorkloadManager` port. Dry runs render with `helm template`
//! and never contact a cluster.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::ports::{ApplySpec, WorkloadManager};
use crate::error::NopeusResult;

use super::process::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};

/// Extra time for helm to exit after its own `--timeout` fires
const HELM_EXIT_GRACE: Duration = Duration::from_secs(60);

pub struct HelmCli<R: CommandRunner = SystemRunner> {
    binary: PathBuf,
    kubeconfig: Option<PathBuf>,
    runner: R,
}

impl HelmCli<SystemRunner> {
    pub fn new(binary: impl Into<PathBuf>, kubeconfig: Option<PathBuf>) -> Self {
        Self::with_runner(binary, kubeconfig, SystemRunner)
    }
}

impl<R: CommandRunner> HelmCli<R> {
    pub fn with_runner(binary: impl Into<PathBuf>, kubeconfig: Option<PathBuf>, runner: R) -> Self {
        Self {
            binary: binary.into(),
            kubeconfig,
            runner,
        }
    }

    fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.binary)
    }

    /// Cluster-bound command pinned to `context`
    fn cluster_command(&self, context: &str, namespace: &str) -> CommandSpec {
        let mut spec = self
            .command()
            .args(["--kube-context", context, "--namespace", namespace]);
        if let Some(path) = &self.kubeconfig {
            spec = spec.arg("--kubeconfig").arg(path.display().to_string());
        }
        spec
    }

    fn release_args(spec: &ApplySpec, mut command: CommandSpec) -> CommandSpec {
        if let Some(values) = &spec.values_file {
            command = command.arg("--values").arg(values.display().to_string());
        }
        for (key, value) in &spec.set_values {
            command = command.arg("--set").arg(format!("{key}={value}"));
        }
        command
    }

    fn run(&self, spec: &CommandSpec) -> NopeusResult<CommandOutput> {
        self.runner.run(spec)
    }
}

/// helm reports a missing release as `Error: release: not found`
fn is_not_found(output: &CommandOutput) -> bool {
    output.stderr.contains("release: not found")
}

impl<R: CommandRunner> WorkloadManager for HelmCli<R> {
    fn add_repository(&self, name: &str, url: &str) -> NopeusResult<()> {
        let spec = self
            .command()
            .args(["repo", "add", "--force-update", name, url]);
        self.run(&spec)?.into_success(&spec).map(|_| ())
    }

    fn install_or_upgrade(&self, context: &str, spec: &ApplySpec) -> NopeusResult<()> {
        let base = if spec.dry_run {
            self.command().args([
                "template",
                spec.release.as_str(),
                spec.chart.as_str(),
                "--namespace",
                spec.namespace.as_str(),
            ])
        } else {
            let mut base = self
                .cluster_command(context, &spec.namespace)
                .args(["upgrade", "--install", spec.release.as_str(), spec.chart.as_str()])
                .arg("--timeout")
                .arg(format!("{}s", spec.timeout.as_secs()));
            if spec.create_namespace {
                base = base.arg("--create-namespace");
            }
            if spec.wait {
                base = base.arg("--wait");
            }
            base
        };
        let command = Self::release_args(spec, base).timeout(spec.timeout + HELM_EXIT_GRACE);

        tracing::info!(release = %spec.release, chart = %spec.chart, dry_run = spec.dry_run, "installing release");
        self.run(&command)?.into_success(&command).map(|_| ())
    }

    fn uninstall(&self, context: &str, release: &str, namespace: &str) -> NopeusResult<()> {
        let spec = self
            .cluster_command(context, namespace)
            .args(["uninstall", release]);
        self.run(&spec)?.into_success(&spec).map(|_| ())
    }

    fn release_exists(&self, context: &str, release: &str, namespace: &str) -> NopeusResult<bool> {
        let spec = self
            .cluster_command(context, namespace)
            .args(["status", release]);
        let output = self.run(&spec)?;
        if output.success() {
            Ok(true)
        } else if is_not_found(&output) {
            Ok(false)
        } else {
            Err(output.into_error(&spec))
        }
    }

    fn release_values(
        &self,
        context: &str,
        release: &str,
        namespace: &str,
    ) -> NopeusResult<Option<serde_json::Value>> {
        let spec = self
            .cluster_command(context, namespace)
            .args(["get", "values", release, "--output", "json"]);
        let output = self.run(&spec)?;
        if !output.success() {
            if is_not_found(&output) {
                return Ok(None);
            }
            return Err(output.into_error(&spec));
        }
        let values: serde_json::Value = serde_json::from_str(output.stdout.trim())?;
        Ok((!values.is_null()).then_some(values))
    }
}
