//! Error handling for drove.
//!
//! Two layers are provided:
//!
//! - [`DroveError`] is the typed error returned from library code. Library
//!   functions return `anyhow::Result` and attach context with
//!   [`anyhow::Context`], so the typed variant stays reachable through
//!   `downcast_ref::<DroveError>()` even after it has been annotated.
//! - [`ErrorContext`] wraps an error with details and a suggestion for the
//!   CLI. [`user_friendly_error`] turns any `anyhow::Error` into one.
//!
//! # Examples
//!
//! ```rust,no_run
//! use drove_cli::core::{DroveError, user_friendly_error};
//!
//! let error = anyhow::Error::from(DroveError::UnknownDependencyType {
//!     kind: "svn".to_string(),
//! });
//! user_friendly_error(error).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for drove operations.
///
/// Any of these aborts the whole recursive fetch; nothing is retried and no
/// sibling dependency is attempted after a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DroveError {
    /// A dependency declared a `type` with no registered backend.
    #[error("Unknown dependency type: '{kind}'")]
    UnknownDependencyType {
        /// The offending type key, verbatim from the manifest
        kind: String,
    },

    /// An external tool exited non-zero, could not be spawned, or timed out.
    ///
    /// The cause is opaque: reference-not-found, network and authentication
    /// failures all land here and differ only in the tool's own stderr.
    #[error("External command failed: {command}{}", exit_suffix(.code))]
    ExternalToolFailure {
        /// The command line that failed, for display only
        command: String,
        /// Exit status, `None` when the process never ran or was killed
        code: Option<i32>,
        /// Captured stderr; empty when the tool inherited the terminal
        stderr: String,
    },

    /// A manifest could not be read or parsed.
    #[error("Failed to load manifest {file}: {reason}")]
    ManifestLoadFailure {
        /// Path to the manifest
        file: String,
        /// Reader or parser message
        reason: String,
    },

    /// No ancestor of the starting directory contains a manifest.
    #[error("No drove.toml or Drovefile found in {start} or any parent directory")]
    ProjectNotFound {
        /// Directory the upward search started from
        start: String,
    },

    /// A nested manifest leads back to a project that is already being
    /// expanded higher up the tree.
    #[error("Circular dependency detected: {chain}")]
    CyclicDependency {
        /// Project roots on the recursion chain, ending with the revisit
        chain: String,
    },

    /// Global configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" (exit code {code})"),
        None => String::new(),
    }
}

/// An error paired with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The headline message
    pub message: String,
    /// Typed error when one was found in the chain
    pub error: Option<DroveError>,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context from a typed error with no suggestion or details.
    #[must_use]
    pub fn new(error: DroveError) -> Self {
        Self {
            message: error.to_string(),
            error: Some(error),
            suggestion: None,
            details: None,
        }
    }

    /// Create a context for an untyped error message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for the terminal.
///
/// The outermost message is kept as the headline, so the location of the
/// failing dependency attached by the fetcher is what the user reads first.
/// Suggestions are chosen from the typed [`DroveError`] found in the chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    if let Some(drove_error) = error.downcast_ref::<DroveError>() {
        let mut ctx = create_error_context(drove_error.clone());
        ctx.message = message;
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::message(message).with_suggestion(
                "Check ownership and permissions of the project and its .drove directory",
            );
        }
    }

    ErrorContext::message(message)
}

fn create_error_context(error: DroveError) -> ErrorContext {
    match &error {
        DroveError::UnknownDependencyType { kind } => {
            let suggestion = format!(
                "Change type '{kind}' to one of \"get\", \"git\" or \"hg\" (or leave it empty for \"get\")"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Dependency types are case-sensitive")
        }
        DroveError::ExternalToolFailure { stderr, .. } => {
            let ctx = ErrorContext::new(error.clone()).with_suggestion(
                "Check the location and reference, your network connection and repository access. \
                 Try running the command manually for more details",
            );
            if stderr.trim().is_empty() {
                ctx
            } else {
                ctx.with_details(stderr.trim().to_string())
            }
        }
        DroveError::ManifestLoadFailure { file, .. } => {
            let suggestion = format!("Check the TOML syntax in {file}");
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Each [[dependencies]] entry needs at least a 'location' string")
        }
        DroveError::ProjectNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run drove from inside a project, or pass --manifest-path")
            .with_details("drove looks for drove.toml (or a legacy Drovefile) in the current directory and its parents"),
        DroveError::CyclicDependency { .. } => ErrorContext::new(error)
            .with_suggestion("Remove the dependency that points back to a project higher up the tree"),
        DroveError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Fix ~/.drove/config.toml or the file named by --config / DROVE_CONFIG"),
    }
}
