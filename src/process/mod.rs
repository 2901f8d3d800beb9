//! File processing and formatting pipeline.
//!
//! Each input goes through one straight-line pass:
//!
//! 1. The markup normalizer reflows the raw text (or is skipped)
//! 2. The normalized text is split into tags, markup fragments and text runs
//! 3. Every token is placed on its own line at its control block depth
//! 4. Lines containing only whitespace are collapsed
//!
//! The main entry point is [`format_file`] which reads any `Read` source and
//! writes formatted output to any `Write` implementation. Nothing is written
//! when a step fails.

pub mod pipeline;

pub use pipeline::{format_file, format_normalized, format_source};
