//! Cluster connection per cloud vendor
//!
//! AWS: read the `region` and `name` outputs, merge the EKS cluster into the
//! kubeconfig with the aws CLI, then report the resulting current context.

use std::path::PathBuf;

use crate::config::NopeusConfig;
use crate::domain::entities::Environment;
use crate::domain::ports::ClusterConnector;
use crate::domain::value_objects::CloudVendor;
use crate::error::{NopeusError, NopeusResult};

use super::process::{CommandRunner, CommandSpec, SystemRunner};

pub const REGION_OUTPUT: &str = "region";
pub const CLUSTER_NAME_OUTPUT: &str = "name";

pub struct VendorConnector<R: CommandRunner = SystemRunner> {
    aws_binary: PathBuf,
    kubectl_binary: PathBuf,
    kubeconfig: Option<PathBuf>,
    runner: R,
}

impl VendorConnector<SystemRunner> {
    pub fn new(kubectl_binary: impl Into<PathBuf>, kubeconfig: Option<PathBuf>) -> Self {
        Self::with_runner(kubectl_binary, kubeconfig, SystemRunner)
    }
}

impl<R: CommandRunner> VendorConnector<R> {
    pub fn with_runner(
        kubectl_binary: impl Into<PathBuf>,
        kubeconfig: Option<PathBuf>,
        runner: R,
    ) -> Self {
        Self {
            aws_binary: PathBuf::from("aws"),
            kubectl_binary: kubectl_binary.into(),
            kubeconfig,
            runner,
        }
    }

    fn with_kubeconfig(&self, spec: CommandSpec) -> CommandSpec {
        match &self.kubeconfig {
            Some(path) => spec.arg("--kubeconfig").arg(path.display().to_string()),
            None => spec,
        }
    }

    fn connect_eks(&self, environment: &Environment) -> NopeusResult<String> {
        let region = environment.output_string(REGION_OUTPUT)?;
        let name = environment.output_string(CLUSTER_NAME_OUTPUT)?;
        tracing::info!(%region, cluster = %name, "updating kubeconfig for EKS cluster");

        let update = self.with_kubeconfig(CommandSpec::new(&self.aws_binary).args([
            "eks",
            "update-kubeconfig",
            "--region",
            region.as_str(),
            "--name",
            name.as_str(),
        ]));
        self.runner.run(&update)?.into_success(&update)?;

        let current = self.with_kubeconfig(
            CommandSpec::new(&self.kubectl_binary).args(["config", "current-context"]),
        );
        let output = self.runner.run(&current)?.into_success(&current)?;
        let context = output.stdout.trim().to_string();
        if context.is_empty() {
            return Err(NopeusError::InvalidOutput {
                key: "current-context".to_string(),
                message: "kubectl reported no current context".to_string(),
            });
        }
        Ok(context)
    }
}

impl<R: CommandRunner> ClusterConnector for VendorConnector<R> {
    fn connect(&self, config: &NopeusConfig, environment: &Environment) -> NopeusResult<String> {
        match config.cloud_vendor()? {
            CloudVendor::Aws => self.connect_eks(environment),
            CloudVendor::Other(vendor) => Err(NopeusError::UnsupportedVendor { vendor }),
        }
    }
}
