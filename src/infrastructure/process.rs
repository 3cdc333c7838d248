//! External command execution
//!
//! Every external tool call goes through a `CommandRunner` so adapters can be
//! tested without the tools installed. The system runner enforces a time
//! bound per invocation and kills the child when it is exceeded.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{NopeusError, NopeusResult};

/// Default bound for a single external command
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(15 * 60);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub stdin: Option<String>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            stdin: None,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program and the first two arguments, for messages
    pub fn label(&self) -> String {
        let program = self
            .program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string());
        std::iter::once(program)
            .chain(self.args.iter().take(2).cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into `CommandFailed`
    pub fn into_success(self, spec: &CommandSpec) -> NopeusResult<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(self.into_error(spec))
        }
    }

    pub fn into_error(self, spec: &CommandSpec) -> NopeusError {
        NopeusError::CommandFailed {
            command: spec.label(),
            code: self.code,
            stderr: self.stderr.trim().to_string(),
        }
    }
}

/// Runs external commands
pub trait CommandRunner: Send + Sync {
    /// Run to completion; a non-zero exit is reported in the output, not as an error.
    fn run(&self, spec: &CommandSpec) -> NopeusResult<CommandOutput>;
}

/// Runs commands as child processes of this one
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> NopeusResult<CommandOutput> {
        tracing::debug!(command = %spec.label(), cwd = ?spec.cwd, "running");

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().map_err(|source| NopeusError::CommandSpawn {
            program: spec.program.display().to_string(),
            source,
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        if let (Some(input), Some(mut pipe)) = (&spec.stdin, child.stdin.take()) {
            if let Err(err) = pipe.write_all(input.as_bytes()) {
                // A child that exits without reading its input still gets reaped below
                if err.kind() != io::ErrorKind::BrokenPipe {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(err.into());
                }
                tracing::debug!(command = %spec.label(), "child closed stdin early");
            }
        }

        let code = wait_with_timeout(&mut child, spec)?;

        Ok(CommandOutput {
            code,
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}

fn wait_with_timeout(child: &mut Child, spec: &CommandSpec) -> NopeusResult<Option<i32>> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status.code());
        }
        if started.elapsed() >= spec.timeout {
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(command = %spec.label(), "killed after timeout");
            return Err(NopeusError::CommandTimeout {
                command: spec.label(),
                seconds: spec.timeout.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}
