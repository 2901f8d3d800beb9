/// Final whitespace pass over indented output
use crate::parser::patterns::BLANK_LINES_RE;

/// Collapse every newline / whitespace-only / newline run into one newline.
///
/// Byte order marks count as whitespace. Because `\s` also matches newlines,
/// a run of several blank lines is consumed by a single match. The match ends at the last newline of the run,
/// so the indentation of the following line is kept.
#[must_use]
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINES_RE.replace_all(text, "\n").into_owned()
}
