//! Core types shared across drove.
//!
//! Currently this is the error layer: the typed [`DroveError`] returned from
//! library code and the [`ErrorContext`] used by the CLI to print errors with
//! suggestions.

pub mod error;

pub use error::{DroveError, ErrorContext, user_friendly_error};
