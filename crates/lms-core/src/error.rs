//! # Error Types
//!
//! Shared error type for identifier and timestamp construction. Crates
//! further up the DAG define their own `thiserror` enums and wrap this one
//! where a core value fails to build.

use thiserror::Error;

/// Top-level error type for the core value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LmsError {
    /// An identifier failed validation at construction.
    #[error("invalid {kind} {value:?}: {reason}")]
    InvalidIdentifier {
        /// Identifier kind (e.g. "course id").
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A timestamp could not be parsed or constructed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
