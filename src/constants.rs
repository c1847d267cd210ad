//! Global constants used throughout the drove codebase.
//!
//! File names, directory names and default checkout symbols live here so the
//! on-disk layout is defined in one place.

/// Current manifest file name, checked first when probing a directory.
pub const MANIFEST_FILE: &str = "drove.toml";

/// Legacy manifest file name, used only when [`MANIFEST_FILE`] is absent.
pub const LEGACY_MANIFEST_FILE: &str = "Drovefile";

/// Name of the library directory created under the root project.
///
/// Every dependency, direct or transitive, is installed below
/// `<project>/.drove/src/`.
pub const LIBRARY_DIR: &str = ".drove";

/// Directory under the library root that holds the working copies.
pub const SOURCE_DIR: &str = "src";

/// Reference checked out by the git backend when none is declared.
pub const GIT_DEFAULT_REFERENCE: &str = "master";

/// Revision updated to by the hg backend when none is declared.
pub const HG_DEFAULT_REFERENCE: &str = "tip";

/// Search-path variable prepended with the project directories by default.
pub const DEFAULT_SEARCH_PATH_VAR: &str = "GOPATH";

/// Separator used when prepending to the search-path variable.
#[cfg(windows)]
pub const SEARCH_PATH_SEPARATOR: &str = ";";

/// Separator used when prepending to the search-path variable.
#[cfg(not(windows))]
pub const SEARCH_PATH_SEPARATOR: &str = ":";

/// Environment variable naming an alternate global config file.
pub const CONFIG_ENV_VAR: &str = "DROVE_CONFIG";
