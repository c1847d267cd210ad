//! Test utilities for drove.
//!
//! - [`init_test_logging`] sets up `tracing` once per test binary.
//! - [`RecordingRunner`] stands in for real tools: it records every
//!   [`ToolCommand`], can be told to fail, and can materialize a fetched
//!   dependency (optionally with its own manifest) the way `git clone` or a
//!   package installer would.
//! - [`write_manifest`] writes a `drove.toml` into a directory.
//!
//! # Example
//!
//! ```rust,no_run
//! use drove_cli::test_utils::RecordingRunner;
//!
//! let runner = RecordingRunner::new()
//!     .with_nested_manifest("https://example.com/a.git", "[[dependencies]]\nlocation = \"c\"\n")
//!     .fail_when(|cmd| cmd.get_args().first().map(String::as_str) == Some("checkout"));
//! ```

use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::constants::{MANIFEST_FILE, SEARCH_PATH_SEPARATOR, SOURCE_DIR};
use crate::core::DroveError;
use crate::process::{ToolCommand, ToolOutput, ToolRunner};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG` when set, otherwise stays
/// silent.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Write `content` as the current-name manifest in `dir`, creating `dir`.
pub fn write_manifest(dir: &Path, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(MANIFEST_FILE);
    std::fs::write(&path, content)?;
    Ok(path)
}

type FailurePredicate = Box<dyn Fn(&ToolCommand) -> bool + Send + Sync>;

#[derive(Default)]
struct RecorderState {
    commands: Vec<ToolCommand>,
    failures: Vec<FailurePredicate>,
    manifests: HashMap<String, String>,
}

/// A [`ToolRunner`] that records commands instead of running them.
///
/// Clones share the same recording.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    state: Arc<Mutex<RecorderState>>,
}

impl RecordingRunner {
    /// An empty recorder on which every command succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command matching `predicate` with exit code 1.
    #[must_use]
    pub fn fail_when(self, predicate: impl Fn(&ToolCommand) -> bool + Send + Sync + 'static) -> Self {
        self.lock().failures.push(Box::new(predicate));
        self
    }

    /// When the dependency at `location` is fetched, give its working copy a
    /// manifest with `content`.
    #[must_use]
    pub fn with_nested_manifest(self, location: &str, content: &str) -> Self {
        self.lock().manifests.insert(location.to_string(), content.to_string());
        self
    }

    /// Every command run so far, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<ToolCommand> {
        self.lock().commands.clone()
    }

    /// Every command run so far as a full argv.
    #[must_use]
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.lock().commands.iter().map(ToolCommand::argv).collect()
    }

    /// Number of commands run so far.
    #[must_use]
    pub fn invocation_count(&self) -> usize {
        self.lock().commands.len()
    }

    fn record(&self, command: &ToolCommand) -> Result<ToolOutput> {
        let mut state = self.lock();
        state.commands.push(command.clone());

        if state.failures.iter().any(|fails| fails(command)) {
            return Err(DroveError::ExternalToolFailure {
                command: command.display_command(),
                code: Some(1),
                stderr: "simulated failure".to_string(),
            }
            .into());
        }

        // Steps run inside an existing working copy do not create anything
        if command.get_current_dir().is_none() {
            Self::materialize(&state, command)?;
        }
        Ok(ToolOutput::default())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecorderState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Mimic the tool's effect on disk: `clone` creates its destination;
    /// anything else whose last argument is a location installs under the
    /// first search-path entry, as a package installer would.
    fn materialize(state: &RecorderState, command: &ToolCommand) -> Result<()> {
        let args = command.get_args();
        let Some(last) = args.last() else {
            return Ok(());
        };

        let (target, location) = if args.first().map(String::as_str) == Some("clone") && args.len() >= 3
        {
            (PathBuf::from(last), &args[args.len() - 2])
        } else if let Some((_, search_path)) = command.get_envs().first() {
            let Some(first) = search_path.split(SEARCH_PATH_SEPARATOR).next() else {
                return Ok(());
            };
            (Path::new(first).join(SOURCE_DIR).join(last), last)
        } else {
            return Ok(());
        };

        std::fs::create_dir_all(&target)?;
        if let Some(content) = state.manifests.get(location) {
            std::fs::write(target.join(MANIFEST_FILE), content)?;
        }
        Ok(())
    }
}

impl ToolRunner for RecordingRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        self.record(command)
    }
}
