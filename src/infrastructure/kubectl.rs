//! kubectl adapter
//!
//! Implements the `ClusterApi` port. Secrets are applied from stdin so
//! credentials never show up in the process list.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::domain::ports::ClusterApi;
use crate::domain::value_objects::{RegistryCredentials, REGISTRY_SECRET_NAME};
use crate::error::NopeusResult;

use super::process::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};

pub struct KubectlCli<R: CommandRunner = SystemRunner> {
    binary: PathBuf,
    kubeconfig: Option<PathBuf>,
    runner: R,
}

impl KubectlCli<SystemRunner> {
    pub fn new(binary: impl Into<PathBuf>, kubeconfig: Option<PathBuf>) -> Self {
        Self::with_runner(binary, kubeconfig, SystemRunner)
    }
}

impl<R: CommandRunner> KubectlCli<R> {
    pub fn with_runner(binary: impl Into<PathBuf>, kubeconfig: Option<PathBuf>, runner: R) -> Self {
        Self {
            binary: binary.into(),
            kubeconfig,
            runner,
        }
    }

    fn command(&self, context: &str) -> CommandSpec {
        let mut spec = CommandSpec::new(&self.binary).args(["--context", context]);
        if let Some(path) = &self.kubeconfig {
            spec = spec.arg("--kubeconfig").arg(path.display().to_string());
        }
        spec
    }

    /// `Ok(true)` if the object exists, `Ok(false)` on NotFound
    fn exists(&self, spec: CommandSpec) -> NopeusResult<bool> {
        let output = self.runner.run(&spec)?;
        if output.success() {
            Ok(true)
        } else if is_not_found(&output) {
            Ok(false)
        } else {
            Err(output.into_error(&spec))
        }
    }
}

fn is_not_found(output: &CommandOutput) -> bool {
    output.stderr.contains("NotFound") || output.stderr.contains("not found")
}

fn secret_manifest(namespace: &str, credentials: &RegistryCredentials) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {
            "name": REGISTRY_SECRET_NAME,
            "namespace": namespace,
        },
        "type": "kubernetes.io/dockerconfigjson",
        "data": {
            ".dockerconfigjson": STANDARD.encode(credentials.docker_config_json()),
        },
    })
    .to_string()
}

impl<R: CommandRunner> ClusterApi for KubectlCli<R> {
    fn ensure_namespace(&self, context: &str, namespace: &str) -> NopeusResult<()> {
        if self.exists(self.command(context).args(["get", "namespace", namespace]))? {
            return Ok(());
        }
        tracing::info!(namespace, "creating namespace");
        let spec = self.command(context).args(["create", "namespace", namespace]);
        self.runner.run(&spec)?.into_success(&spec).map(|_| ())
    }

    fn ensure_registry_secret(
        &self,
        context: &str,
        namespace: &str,
        credentials: &RegistryCredentials,
    ) -> NopeusResult<bool> {
        let probe = self
            .command(context)
            .args(["get", "secret", REGISTRY_SECRET_NAME, "--namespace", namespace]);
        if self.exists(probe)? {
            return Ok(false);
        }
        tracing::info!(namespace, "creating registry pull secret");
        let spec = self
            .command(context)
            .args(["apply", "--filename", "-"])
            .stdin(secret_manifest(namespace, credentials));
        self.runner.run(&spec)?.into_success(&spec)?;
        Ok(true)
    }
}
