//! Terraform CLI adapter
//!
//! Implements the `InfrastructureTool` port by shelling out to `terraform`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::entities::OutputValue;
use crate::domain::ports::InfrastructureTool;
use crate::error::{NopeusError, NopeusResult};

use super::process::{CommandRunner, CommandSpec, SystemRunner, DEFAULT_COMMAND_TIMEOUT};

/// `terraform plan -detailed-exitcode` exit code for a non-empty plan
const PLAN_HAS_CHANGES: i32 = 2;

pub struct TerraformCli<R: CommandRunner = SystemRunner> {
    binary: PathBuf,
    runner: R,
    timeout: Duration,
}

impl TerraformCli<SystemRunner> {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self::with_runner(binary, SystemRunner)
    }
}

impl<R: CommandRunner> TerraformCli<R> {
    pub fn with_runner(binary: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            binary: binary.into(),
            runner,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    fn command(&self, work_dir: &Path, subcommand: &str) -> CommandSpec {
        CommandSpec::new(&self.binary)
            .arg(subcommand)
            .current_dir(work_dir)
            .env("TF_IN_AUTOMATION", "1")
            .timeout(self.timeout)
    }

    fn run_checked(&self, spec: CommandSpec) -> NopeusResult<String> {
        let output = self.runner.run(&spec)?.into_success(&spec)?;
        Ok(output.stdout)
    }
}

impl<R: CommandRunner> InfrastructureTool for TerraformCli<R> {
    fn init(&self, work_dir: &Path) -> NopeusResult<()> {
        let spec = self
            .command(work_dir, "init")
            .args(["-input=false", "-upgrade", "-no-color"]);
        self.run_checked(spec).map(|_| ())
    }

    fn plan(&self, work_dir: &Path) -> NopeusResult<bool> {
        let spec = self
            .command(work_dir, "plan")
            .args(["-input=false", "-no-color", "-detailed-exitcode"]);
        let output = self.runner.run(&spec)?;
        match output.code {
            Some(0) => Ok(false),
            Some(PLAN_HAS_CHANGES) => Ok(true),
            _ => Err(output.into_error(&spec)),
        }
    }

    fn apply(&self, work_dir: &Path) -> NopeusResult<()> {
        let spec = self
            .command(work_dir, "apply")
            .args(["-input=false", "-auto-approve", "-no-color"]);
        self.run_checked(spec).map(|_| ())
    }

    fn output(&self, work_dir: &Path) -> NopeusResult<BTreeMap<String, OutputValue>> {
        let spec = self.command(work_dir, "output").args(["-json", "-no-color"]);
        let stdout = self.run_checked(spec)?;
        if stdout.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&stdout).map_err(|e| NopeusError::InvalidOutput {
            key: "*".to_string(),
            message: e.to_string(),
        })
    }
}
