//! Lexical scanning of normalized template text.
//!
//! This module provides the infrastructure for splitting text into tokens:
//! - [`Tokens`]: Lazy iterator over control tags, markup fragments and text runs
//! - [`patterns`]: Precompiled regex patterns and control tag keyword prefixes
//!
//! There is no grammar here. Tokens are classified purely lexically and the
//! scan never fails.

pub mod patterns;
pub mod tokenizer;

pub use tokenizer::{tokenize, tokenize_with, trim_blank, Token, TokenKind, Tokens};
