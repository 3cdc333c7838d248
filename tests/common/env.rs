//! Test environment for isolated Nopeus runs.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running the nopeus binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated project directory with its own `nopeus.yaml`
pub struct TestEnv {
    pub project_root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().expect("create temp project dir"),
        }
    }

    /// Project directory containing `config` as `nopeus.yaml`
    pub fn with_config(config: &str) -> Self {
        let env = Self::new();
        env.write("nopeus.yaml", config);
        env
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn config_path(&self) -> PathBuf {
        self.path("nopeus.yaml")
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, content).expect("write fixture");
    }

    /// Run the nopeus binary from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        run_in(self.project_root.path(), args)
    }
}

/// Run the nopeus binary in `cwd` without inheriting nopeus settings
pub fn run_in(cwd: &Path, args: &[&str]) -> TestResult {
    let output = Command::new(env!("CARGO_BIN_EXE_nopeus"))
        .args(args)
        .current_dir(cwd)
        .env_remove("NOPEUS_TOKEN")
        .env_remove("NOPEUS_CLOUD_URL")
        .env_remove("NOPEUS_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("run nopeus binary");

    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
