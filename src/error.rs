//! Error types and result aliases for emfmt.
//!
//! This module defines the error handling infrastructure:
//! - [`FormatError`]: typed failures of the formatting pipeline
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used by the binary and file driver

use anyhow::Result as AnyhowResult;
use thiserror::Error;

pub type Result<T> = AnyhowResult<T>;

/// Failures the formatting pipeline can report to its caller
#[derive(Debug, Error)]
pub enum FormatError {
    /// No input path was supplied on the command line
    #[error("Please provide a file path as an argument")]
    MissingInput,

    /// The markup normalizer rejected the input
    #[error("normalizer failed: {message}")]
    Normalize { message: String },

    /// The normalizer process could not be started
    #[error("failed to run normalizer `{command}`: {source}")]
    NormalizerSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The normalizer produced something other than UTF-8 text
    #[error("normalizer output is not text")]
    NotText,

    /// The input file is not valid UTF-8
    #[error("input is not valid UTF-8")]
    InvalidUtf8,

    /// A closing or continuation tag appeared with no open block (strict nesting only)
    #[error("`{token}` (token {index}) has no open block")]
    UnbalancedBlock { token: String, index: usize },

    /// Blocks were still open at end of input (strict nesting only)
    #[error("{depth} block(s) left open at end of input")]
    UnclosedBlock { depth: isize },
}
