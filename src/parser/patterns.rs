/// Regex patterns and keyword prefixes for the template dialect
///
/// All patterns are compiled once at startup using `LazyLock`.
///
/// Tag and markup bodies never cross a line terminator (`\n`, `\r`, U+2028,
/// U+2029), so tags spanning several lines are not recognized as tags.
use std::sync::LazyLock;

use regex::Regex;

/// Build a regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. This is acceptable because all patterns
/// in this module are compile-time constants that are verified by tests.
/// The panic occurs at first access of the `LazyLock` static.
fn build_re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

// Alternatives, in priority order. Group numbers map to `TokenKind`.
const TAG_STR: &str = r"(\{%[^\n\r\x{2028}\x{2029}]*?%\})";
const MARKUP_STR: &str = r"(<[^\n\r\x{2028}\x{2029}]*?>)";
const TEXT_STR: &str = r"([^<>{}%]+)";
const STRAY_STR: &str = r"([<>{}%])";

/// Tag, markup or text run. Characters matching none of these are skipped.
pub static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!("{TAG_STR}|{MARKUP_STR}|{TEXT_STR}")));

/// Same as [`TOKEN_RE`] plus a single-character catch-all, so every byte is covered.
pub static TOKEN_KEEP_STRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!("{TAG_STR}|{MARKUP_STR}|{TEXT_STR}|{STRAY_STR}")));

/// A newline, any whitespace (newlines and byte order marks included), then another newline
pub static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"\n[\s\x{FEFF}]*\n"));

// ===== CONTROL TAG KEYWORDS =====
//
// Matched as literal, case-sensitive prefixes of the trimmed token.
// `{% else` is a prefix of `{% elseif`; both lists stay in their checked order.

/// Tags that close (or continue) the enclosing block: dedent before the line
pub const CLOSE_PREFIXES: [&str; 3] = ["{% endif", "{% else", "{% elseif"];

/// Tags that open (or continue) a block: indent the lines that follow
pub const OPEN_PREFIXES: [&str; 3] = ["{% if", "{% elseif", "{% else"];
