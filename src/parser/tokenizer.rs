/// `Tokens` - Lazy lexical scan of normalized template text
///
/// Splits text into control tags, markup fragments and plain text runs,
/// in scan order. Concatenating the tokens reproduces the input unless it
/// contains stray `<`, `>`, `{`, `}` or `%` characters, which are skipped
/// (or kept as [`TokenKind::Stray`] when `keep_stray` is set).
use std::ops::Range;

use regex::{CaptureMatches, Regex};

use super::patterns::{TOKEN_KEEP_STRAY_RE, TOKEN_RE};

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{% ... %}` control tag
    Tag,
    /// `< ... >` markup fragment
    Markup,
    /// Run of characters containing none of `<>{}%`
    Text,
    /// Single leftover delimiter character (keep-stray mode only)
    Stray,
}

impl TokenKind {
    /// Map a capture group index of the token regex to its class
    fn from_group(idx: usize) -> Option<Self> {
        match idx {
            1 => Some(TokenKind::Tag),
            2 => Some(TokenKind::Markup),
            3 => Some(TokenKind::Text),
            4 => Some(TokenKind::Stray),
            _ => None,
        }
    }
}

/// A borrowed slice of the scanned text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte range of `text` in the scanned input
    pub span: Range<usize>,
}

impl<'a> Token<'a> {
    /// Token text with surrounding whitespace removed
    #[must_use]
    pub fn trimmed(&self) -> &'a str {
        trim_blank(self.text)
    }
}

/// Strip surrounding whitespace and byte order marks
///
/// `str::trim` keeps U+FEFF, which would otherwise survive as a line of its own
/// at the start of a file saved with a BOM.
#[must_use]
pub fn trim_blank(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Iterator over the tokens of one input, in scan order
pub struct Tokens<'a> {
    captures: CaptureMatches<'static, 'a>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.captures.next()?;
        // Exactly one alternative participates in each match
        let (idx, m) = caps
            .iter()
            .enumerate()
            .skip(1)
            .find_map(|(idx, m)| m.map(|m| (idx, m)))?;
        let kind = TokenKind::from_group(idx)?;
        Some(Token {
            kind,
            text: m.as_str(),
            span: m.range(),
        })
    }
}

/// Scan `text` in lossy mode: stray delimiter characters are dropped.
#[must_use]
pub fn tokenize(text: &str) -> Tokens<'_> {
    tokenize_with(text, false)
}

/// Scan `text`, optionally keeping stray delimiter characters as tokens.
#[must_use]
pub fn tokenize_with(text: &str, keep_stray: bool) -> Tokens<'_> {
    let re: &'static Regex = if keep_stray {
        &*TOKEN_KEEP_STRAY_RE
    } else {
        &*TOKEN_RE
    };
    Tokens {
        captures: re.captures_iter(text),
    }
}
