//! emfmt - Formatter for HTML templates with `{% if %}` control blocks
//!
//! Reflows markup through an HTML formatter, then re-indents template
//! control blocks by nesting depth.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod normalize;
pub mod parser;
pub mod process;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use error::{FormatError, Result};
pub use normalize::{Normalizer, Passthrough, PrettierNormalizer};
