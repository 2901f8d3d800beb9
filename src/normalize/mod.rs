//! Markup normalization ahead of block indentation.
//!
//! The indenter trusts that markup has already been reflowed by an HTML-aware
//! formatter. This module defines that seam:
//! - [`Normalizer`]: trait implemented by every normalization backend
//! - [`PrettierNormalizer`]: runs an external `prettier` process
//! - [`Passthrough`]: returns the input unchanged

pub mod prettier;

pub use prettier::{PrettierNormalizer, PrettierOptions};

use crate::config::Config;
use crate::error::FormatError;

/// Reflows raw template text into consistently spaced markup
pub trait Normalizer: Send + Sync {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Normalize `text`, failing if the input cannot be parsed as markup
    fn normalize(&self, text: &str) -> Result<String, FormatError>;
}

/// Identity normalizer, for already-normalized input
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Normalizer for Passthrough {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn normalize(&self, text: &str) -> Result<String, FormatError> {
        Ok(text.to_string())
    }
}

/// Pick the normalizer a configuration asks for
#[must_use]
pub fn from_config(config: &Config) -> Box<dyn Normalizer> {
    if config.normalize {
        Box::new(PrettierNormalizer::new(
            config.normalizer.clone(),
            PrettierOptions::from_config(config),
        ))
    } else {
        Box::new(Passthrough)
    }
}
