//! Manifest parsing (`drove.toml`, legacy `Drovefile`).
//!
//! A manifest lists a project's direct dependencies in the order they should
//! be fetched, plus optional project metadata. Both file names share the same
//! TOML format:
//!
//! ```toml
//! [project]
//! name = "webapp"
//!
//! [[dependencies]]
//! type = "git"
//! location = "https://github.com/example/router.git"
//! path = "github.com/example/router"
//! reference = "v2.1.0"
//!
//! [[dependencies]]
//! location = "example.org/x/text"   # type defaults to "get"
//! ```
//!
//! Only `location` is required. `type`, `path` and `reference` default to the
//! empty string and are filled in later: `path` by the fetcher just before
//! dispatch, `reference` by the backend just before checkout. Loading never
//! fills them, so callers may change a dependency between load and fetch.

pub mod helpers;

pub use helpers::{find_project_root, is_project_root, manifest_file_in};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::DroveError;

/// A parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Optional project metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectMetadata>,

    /// Direct dependencies, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
}

/// Descriptive project metadata. Not used by the fetch itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Project name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single declared dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Backend key: `""`/`"get"`, `"git"` or `"hg"`. Resolved at fetch time,
    /// so an unknown key is only an error once the fetch reaches it.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Where to fetch from: a URL or a package path.
    pub location: String,

    /// Install path below `<library>/src/`; empty means `location`.
    #[serde(default)]
    pub path: String,

    /// Branch, tag or revision; empty means the backend's mainline.
    #[serde(default)]
    pub reference: String,
}

impl Dependency {
    /// A dependency of type `kind` fetched from `location`, with path and
    /// reference left to their defaults.
    pub fn new(kind: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            location: location.into(),
            ..Self::default()
        }
    }

    /// Set the install path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the reference to check out.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Fill `path` from `location` when it was left empty.
    pub fn default_path(&mut self) {
        if self.path.is_empty() {
            self.path.clone_from(&self.location);
        }
    }
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    ///
    /// Read and parse failures both become
    /// [`DroveError::ManifestLoadFailure`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DroveError::ManifestLoadFailure {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::parse(&content).map_err(|reason| {
            DroveError::ManifestLoadFailure {
                file: path.display().to_string(),
                reason,
            }
            .into()
        })
    }

    /// Parse manifest text.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
