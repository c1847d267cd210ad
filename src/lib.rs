//! drove - transitive dependency fetcher for source projects
//!
//! A project declares its dependencies in `drove.toml` (or a legacy
//! `Drovefile`). drove fetches each one with the backend named by its `type`
//! and, when a fetched dependency has a manifest of its own, fetches its
//! dependencies too. Every dependency in the tree, however deep, is installed
//! into the *root* project's library:
//!
//! ```text
//! <project>/.drove/src/<path>
//! ```
//!
//! # Core Modules
//!
//! - [`fetcher`] - the recursive fetch-and-discover loop
//! - [`backend`] - `get`, `git` and `hg` backends and the type registry
//! - [`environment`] - per-manifest context, rebinding and search path
//! - [`manifest`] - manifest parsing and project-root detection
//! - [`process`] - subprocess builder and the [`process::ToolRunner`] seam
//!
//! ## Supporting Modules
//! - [`cli`] - command-line interface
//! - [`config`] - global configuration (`~/.drove/config.toml`)
//! - [`core`] - error types and user-facing error formatting
//! - [`constants`] - file names and defaults
//!
//! # Manifest Format
//!
//! ```toml
//! [project]
//! name = "service"
//!
//! [[dependencies]]
//! location = "golang.org/x/text"
//!
//! [[dependencies]]
//! type = "git"
//! location = "https://github.com/example/router.git"
//! path = "github.com/example/router"
//! reference = "v1.2.0"
//!
//! [[dependencies]]
//! type = "hg"
//! location = "https://hg.example.org/tools"
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! drove deps                 # fetch the whole tree
//! drove env                  # GOPATH=<project>/.drove:<project>[:$GOPATH]
//! drove exec go build ./...  # run with that search path
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod environment;
pub mod fetcher;
pub mod manifest;
pub mod process;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
