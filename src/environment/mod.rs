//! The per-manifest fetch environment.
//!
//! An [`Environment`] is built each time a manifest is loaded: once for the
//! root project and once for every nested manifest discovered during the
//! fetch. It records where the project lives, where its dependencies go, and
//! which dependencies to process.
//!
//! Nested environments are rebound with [`Environment::chroot`] so that their
//! library root is the *root* project's library root. That is what flattens
//! the whole dependency tree into one `<root>/.drove/src/` namespace.

use anyhow::Result;
use std::path::{Component, Path, PathBuf};

use crate::constants::{LIBRARY_DIR, SEARCH_PATH_SEPARATOR, SOURCE_DIR};
use crate::core::DroveError;
use crate::manifest::{Dependency, Manifest, manifest_file_in};

/// Recursion-scoped fetch context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Project whose library receives the dependencies.
    pub project_root: PathBuf,

    /// `<project_root>/.drove`.
    pub library_root: PathBuf,

    /// The manifest these dependencies came from.
    pub manifest_path: PathBuf,

    /// Direct dependencies, in declaration order.
    pub dependencies: Vec<Dependency>,
}

/// Library root for a project rooted at `project_root`.
#[must_use]
pub fn library_root_for(project_root: &Path) -> PathBuf {
    project_root.join(LIBRARY_DIR)
}

/// Install location `<library_root>/src/<path>` of a dependency.
///
/// `path` is always treated as relative to `src`: root and drive prefixes
/// are dropped, so an absolute location such as `/srv/git/widget.git`
/// installs at `<library_root>/src/srv/git/widget.git`.
#[must_use]
pub fn dependency_root(library_root: &Path, path: &str) -> PathBuf {
    let relative: PathBuf = Path::new(path)
        .components()
        .filter(|component| matches!(component, Component::Normal(_) | Component::ParentDir))
        .collect();
    library_root.join(SOURCE_DIR).join(relative)
}

impl Environment {
    /// Load the manifest found in `project_root` (current name first, then
    /// legacy).
    ///
    /// # Errors
    ///
    /// [`DroveError::ManifestLoadFailure`] when the directory has no manifest
    /// or it cannot be read or parsed.
    pub fn load(project_root: &Path) -> Result<Self> {
        let manifest_path =
            manifest_file_in(project_root).ok_or_else(|| DroveError::ManifestLoadFailure {
                file: project_root.display().to_string(),
                reason: "no drove.toml or Drovefile in directory".to_string(),
            })?;
        Self::load_manifest(project_root, &manifest_path)
    }

    /// Load an explicit manifest file for `project_root`.
    pub fn load_manifest(project_root: &Path, manifest_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        Ok(Self::from_manifest(project_root, manifest_path, manifest))
    }

    /// Build an environment from an already parsed manifest.
    #[must_use]
    pub fn from_manifest(project_root: &Path, manifest_path: &Path, manifest: Manifest) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            library_root: library_root_for(project_root),
            manifest_path: manifest_path.to_path_buf(),
            dependencies: manifest.dependencies,
        }
    }

    /// Rebind this environment to `new_root`: the project root becomes
    /// `new_root` and the library root `new_root/.drove`. No I/O.
    pub fn chroot(&mut self, new_root: &Path) {
        self.project_root = new_root.to_path_buf();
        self.library_root = library_root_for(new_root);
    }

    /// `<library_root>/src`.
    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        self.library_root.join(SOURCE_DIR)
    }

    /// Value of the search-path variable for this project.
    ///
    /// The project root is prepended to `inherited`, then the library root is
    /// prepended to that, giving `<library>:<project>[:<inherited>]`.
    #[must_use]
    pub fn search_path(&self, inherited: Option<&str>) -> String {
        let with_project = prepend(&self.project_root, inherited);
        prepend(&self.library_root, Some(&with_project))
    }

    /// The search path as an environment override for `var`.
    #[must_use]
    pub fn search_path_override(&self, var: &str, inherited: Option<&str>) -> (String, String) {
        (var.to_string(), self.search_path(inherited))
    }
}

fn prepend(dir: &Path, existing: Option<&str>) -> String {
    match existing {
        Some(existing) if !existing.is_empty() => {
            format!("{}{}{}", dir.display(), SEARCH_PATH_SEPARATOR, existing)
        }
        _ => dir.display().to_string(),
    }
}
