// src/error.rs

//! Error types for the spec formatter

use thiserror::Error;

/// Errors raised while formatting a spec file
#[derive(Error, Debug)]
pub enum Error {
    /// `%else`/`%elif`/`%endif` seen while no conditional is open
    #[error("Line {line}: {directive} without matching %if")]
    UnbalancedConditional { line: usize, directive: String },

    /// End of a section reached with conditionals still open
    #[error("Section ended with {depth} unterminated conditional(s)")]
    UnterminatedConditional { depth: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Result type alias using the formatter's Error type
pub type Result<T> = std::result::Result<T, Error>;
