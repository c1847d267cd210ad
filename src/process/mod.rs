//! Subprocess execution.
//!
//! drove shells out for every fetch step, like Cargo does for git. A
//! [`ToolCommand`] describes one invocation; a [`ToolRunner`] executes it.
//! Production code uses [`SystemRunner`], which spawns the process with
//! `tokio::process` and waits for it to exit before returning, so the fetch
//! stays strictly sequential.
//!
//! Any failure to run a tool (not found, spawn error, non-zero exit,
//! timeout) is reported as [`DroveError::ExternalToolFailure`].

pub mod command_builder;

pub use command_builder::ToolCommand;

use anyhow::Result;
use std::future::Future;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::DroveError;

/// Output of a finished tool invocation.
///
/// Both fields are empty when the tool inherited the terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// Executes [`ToolCommand`]s.
///
/// Implementations must return only after the process has finished and must
/// never change the calling process's working directory or environment.
pub trait ToolRunner: Send + Sync {
    /// Run `command` to completion.
    fn run(&self, command: &ToolCommand) -> impl Future<Output = Result<ToolOutput>> + Send;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        let start = Instant::now();
        let cmd_line = command.display_command();
        let label = command.context().unwrap_or(command.program());

        let program = which::which(command.program()).map_err(|e| {
            tracing::debug!(target: "tool", "({}) Cannot locate {}: {}", label, command.program(), e);
            DroveError::ExternalToolFailure {
                command: cmd_line.clone(),
                code: None,
                stderr: format!("{} is not installed or not found in PATH", command.program()),
            }
        })?;

        let mut cmd = Command::new(&program);
        cmd.args(command.get_args());
        if let Some(dir) = command.get_current_dir() {
            cmd.current_dir(dir);
        }
        for (key, value) in command.get_envs() {
            tracing::trace!(target: "tool", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }

        let capture = command.captures_output();
        if capture {
            cmd.stdin(Stdio::null());
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }
        cmd.kill_on_drop(true);

        match command.get_current_dir() {
            Some(dir) => tracing::debug!(
                target: "tool",
                "({}) Executing command in {}: {}",
                label,
                dir.display(),
                cmd_line
            ),
            None => tracing::debug!(target: "tool", "({}) Executing command: {}", label, cmd_line),
        }

        // `output()` always pipes stdout/stderr, so inherited runs spawn and wait
        let finished = async {
            if capture {
                let output = cmd.output().await?;
                Ok::<_, std::io::Error>((
                    output.status,
                    String::from_utf8_lossy(&output.stdout).into_owned(),
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                ))
            } else {
                let mut child = cmd.spawn()?;
                let status = child.wait().await?;
                Ok((status, String::new(), String::new()))
            }
        };

        let (status, stdout, stderr) = if let Some(duration) = command.timeout() {
            if let Ok(result) = timeout(duration, finished).await {
                result.map_err(|e| spawn_failure(&cmd_line, &e))?
            } else {
                tracing::warn!(
                    target: "tool",
                    "({}) Command timed out after {} seconds: {}",
                    label,
                    duration.as_secs(),
                    cmd_line
                );
                return Err(DroveError::ExternalToolFailure {
                    command: cmd_line,
                    code: None,
                    stderr: format!("timed out after {} seconds", duration.as_secs()),
                }
                .into());
            }
        } else {
            finished.await.map_err(|e| spawn_failure(&cmd_line, &e))?
        };

        if !status.success() {
            tracing::debug!(target: "tool", "({}) Command failed with exit code: {:?}", label, status.code());
            if !stderr.is_empty() {
                tracing::debug!(target: "tool", "({}) Error: {}", label, stderr.trim());
            }
            return Err(DroveError::ExternalToolFailure {
                command: cmd_line,
                code: status.code(),
                stderr,
            }
            .into());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "tool::perf", "({}) {} took {:.2}s", label, cmd_line, elapsed.as_secs_f64());
        } else {
            tracing::trace!(target: "tool::perf", "({}) {} took {}ms", label, cmd_line, elapsed.as_millis());
        }

        Ok(ToolOutput {
            stdout,
            stderr,
        })
    }
}

fn spawn_failure(cmd_line: &str, error: &std::io::Error) -> DroveError {
    DroveError::ExternalToolFailure {
        command: cmd_line.to_string(),
        code: None,
        stderr: error.to_string(),
    }
}
