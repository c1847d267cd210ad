//! Integration test suite for drove
//!
//! End-to-end tests that drive the library against real `git` repositories
//! created on the fly, and the `drove` binary through `assert_cmd`.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: subcommands, exit codes and error output of the binary
//! - **get_fetch**: the `get` backend through a configured stand-in installer
//! - **git_fetch**: the `git` backend and transitive fetching with real clones

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod get_fetch;
mod git_fetch;
