//! Formatting pipeline
//!
//! Implements the per-file pipeline:
//! - normalize markup (optional, through a [`Normalizer`])
//! - tokenize into tags, markup and text runs
//! - indent control blocks and join one token per line
//! - collapse whitespace-only lines

use std::io::{Read, Write};

use crate::config::Config;
use crate::error::FormatError;
use crate::format::{collapse_blank_lines, BlockIndenter};
use crate::normalize::Normalizer;
use crate::parser::tokenize_with;
use crate::Result;

/// Tokenize, indent and collapse text that has already been normalized.
pub fn format_normalized(text: &str, config: &Config) -> std::result::Result<String, FormatError> {
    let indenter = BlockIndenter::new(config.indent).with_strict(config.strict_nesting);
    let tokens = tokenize_with(text, config.keep_stray).map(|token| token.text);
    let indented = indenter.indent_and_join(tokens)?;
    Ok(collapse_blank_lines(&indented))
}

/// Run the whole pipeline on `source`.
///
/// A normalizer failure aborts before any tokenizing happens.
pub fn format_source(
    source: &str,
    normalizer: &dyn Normalizer,
    config: &Config,
) -> std::result::Result<String, FormatError> {
    let normalized = normalizer.normalize(source)?;
    tracing::debug!(
        normalizer = normalizer.name(),
        input_bytes = source.len(),
        normalized_bytes = normalized.len(),
        "normalized source"
    );
    format_normalized(&normalized, config)
}

/// Format everything read from `input` and write the result to `output`.
///
/// `source_name` is only used for log output.
pub fn format_file<R: Read, W: Write>(
    mut input: R,
    output: &mut W,
    config: &Config,
    normalizer: &dyn Normalizer,
    source_name: &str,
) -> Result<()> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    let source = String::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8)?;

    tracing::debug!(source = source_name, "formatting");
    let formatted = format_source(&source, normalizer, config)?;
    output.write_all(formatted.as_bytes())?;
    Ok(())
}
