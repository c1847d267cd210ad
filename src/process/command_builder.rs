//! Fluent builder for external tool invocations.
//!
//! Every subprocess drove starts (the package installer, `git`, `hg`, or a
//! program run through `drove exec`) is described by a [`ToolCommand`]: a
//! literal argv vector with no shell interpretation, an optional working
//! directory, and explicit environment overrides. The command is plain data
//! until a [`ToolRunner`](super::ToolRunner) executes it, which lets tests
//! record invocations instead of spawning processes.
//!
//! # Examples
//!
//! ```rust,no_run
//! use drove_cli::process::ToolCommand;
//!
//! let cmd = ToolCommand::new("git")
//!     .args(["checkout", "v1.2.0"])
//!     .current_dir("/work/.drove/src/example.com/lib")
//!     .env("GOPATH", "/work/.drove:/work");
//! assert_eq!(cmd.display_command(), "git checkout v1.2.0");
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Description of a single external tool invocation.
///
/// Defaults:
/// - **Working directory**: inherited from the calling process
/// - **Stdio**: inherited, so the tool talks to the user's terminal
/// - **Environment**: inherited, plus any overrides added with [`env`](Self::env)
/// - **Timeout**: none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program name or path
    program: String,

    /// Arguments passed verbatim, in order
    args: Vec<String>,

    /// Working directory for this process only
    current_dir: Option<PathBuf>,

    /// Variables set for this process only
    env_vars: Vec<(String, String)>,

    /// Capture stdout/stderr instead of inheriting the terminal
    capture_output: bool,

    /// Maximum time to wait before killing the process
    timeout_duration: Option<Duration>,

    /// Dependency location or other label for log lines
    context: Option<String>,
}

impl ToolCommand {
    /// Create a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            capture_output: false,
            timeout_duration: None,
            context: None,
        }
    }

    /// Run the process in `dir` without touching the caller's working
    /// directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for this process only.
    ///
    /// Setting the same key twice keeps the last value.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.env_vars.retain(|(existing, _)| *existing != key);
        self.env_vars.push((key, value.into()));
        self
    }

    /// Set several environment variables for this process only.
    pub fn envs<'a, I>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = &'a (String, String)>,
    {
        vars.into_iter().fold(self, |cmd, (key, value)| cmd.env(key.clone(), value.clone()))
    }

    /// Capture stdout and stderr instead of inheriting the terminal.
    pub const fn capture_output(mut self) -> Self {
        self.capture_output = true;
        self
    }

    /// Set a timeout (None for no timeout).
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Label log lines with `context`, typically the dependency location.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The program to run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments, in order.
    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Working directory override, if any.
    #[must_use]
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Environment overrides, in the order they were set.
    #[must_use]
    pub fn get_envs(&self) -> &[(String, String)] {
        &self.env_vars
    }

    /// Value of a single environment override.
    #[must_use]
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env_vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Whether output is captured rather than inherited.
    #[must_use]
    pub const fn captures_output(&self) -> bool {
        self.capture_output
    }

    /// The configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout_duration
    }

    /// The log label, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Program and arguments joined by spaces, for logs and error messages.
    #[must_use]
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The full argv, program first.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone()).chain(self.args.iter().cloned()).collect()
    }
}
