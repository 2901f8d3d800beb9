/// `BlockIndenter` - Depth-based indentation of control blocks
///
/// Each token becomes one output line. The nesting level is an explicit
/// accumulator folded over the token sequence; [`BlockIndenter::step`] is the
/// pure transition function.
use crate::error::FormatError;
use crate::parser::patterns::{CLOSE_PREFIXES, OPEN_PREFIXES};
use crate::parser::trim_blank;

/// How a single trimmed token moves the nesting level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockEffect {
    /// Decrement the level before rendering this token (`endif`, `else`, `elseif`)
    pub dedent_before: bool,
    /// Increment the level after rendering this token (`if`, `elseif`, `else`)
    pub indent_after: bool,
}

/// Classify a trimmed token by its control tag prefix
#[must_use]
pub fn block_effect(trimmed: &str) -> BlockEffect {
    BlockEffect {
        dedent_before: CLOSE_PREFIXES.iter().any(|p| trimmed.starts_with(p)),
        indent_after: OPEN_PREFIXES.iter().any(|p| trimmed.starts_with(p)),
    }
}

/// `BlockIndenter` renders tokens at their nesting depth
#[derive(Debug, Clone)]
pub struct BlockIndenter {
    /// Whitespace emitted once per nesting level
    unit: String,
    /// Reject dedents below zero and blocks left open at the end
    strict: bool,
}

impl Default for BlockIndenter {
    fn default() -> Self {
        Self::new(2)
    }
}

impl BlockIndenter {
    /// Create a lenient indenter using `indent` spaces per level
    #[must_use]
    pub fn new(indent: usize) -> Self {
        Self {
            unit: " ".repeat(indent),
            strict: false,
        }
    }

    /// Enable or disable strict nesting checks
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Render one token at `level` and return the level for the next token.
    ///
    /// `index` is the token's position in the sequence and is only used for
    /// error reporting. In lenient mode this never fails and the level may go
    /// negative; a negative level renders without indentation.
    pub fn step(
        &self,
        level: isize,
        index: usize,
        token: &str,
    ) -> Result<(isize, String), FormatError> {
        let trimmed = trim_blank(token);
        let effect = block_effect(trimmed);

        let mut level = level;
        if effect.dedent_before {
            if self.strict && level <= 0 {
                return Err(FormatError::UnbalancedBlock {
                    token: trimmed.to_string(),
                    index,
                });
            }
            level -= 1;
        }

        let depth = usize::try_from(level).unwrap_or(0);
        let mut line = String::with_capacity(self.unit.len() * depth + trimmed.len());
        for _ in 0..depth {
            line.push_str(&self.unit);
        }
        line.push_str(trimmed);

        if effect.indent_after {
            level += 1;
        }
        Ok((level, line))
    }

    /// Indent every token and join the resulting lines with `\n`.
    pub fn indent_and_join<'a, I>(&self, tokens: I) -> Result<String, FormatError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (level, output) = tokens.into_iter().enumerate().try_fold(
            (0isize, String::new()),
            |(level, mut output), (index, token)| {
                let (next, line) = self.step(level, index, token)?;
                if index > 0 {
                    output.push('\n');
                }
                output.push_str(&line);
                Ok::<_, FormatError>((next, output))
            },
        )?;

        if self.strict && level != 0 {
            return Err(FormatError::UnclosedBlock { depth: level });
        }
        tracing::debug!(final_level = level, "indented token stream");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indent(tokens: &[&str]) -> String {
        BlockIndenter::default()
            .indent_and_join(tokens.iter().copied())
            .unwrap()
    }

    #[test]
    fn test_block_effect_if() {
        let effect = block_effect("{% if x %}");
        assert!(!effect.dedent_before);
        assert!(effect.indent_after);
    }

    #[test]
    fn test_block_effect_else_and_elseif() {
        for tag in ["{% else %}", "{% elseif y %}"] {
            let effect = block_effect(tag);
            assert!(effect.dedent_before, "{tag}");
            assert!(effect.indent_after, "{tag}");
        }
    }

    #[test]
    fn test_block_effect_endif() {
        let effect = block_effect("{% endif %}");
        assert!(effect.dedent_before);
        assert!(!effect.indent_after);
    }

    #[test]
    fn test_block_effect_is_case_sensitive() {
        assert_eq!(block_effect("{% IF x %}"), BlockEffect::default());
        assert_eq!(block_effect("{%if x %}"), BlockEffect::default());
        assert_eq!(block_effect("<p>"), BlockEffect::default());
    }

    #[test]
    fn test_step_is_pure() {
        let indenter = BlockIndenter::default();
        let (next, line) = indenter.step(1, 0, "  <p>  ").unwrap();
        assert_eq!(next, 1);
        assert_eq!(line, "  <p>");
        let again = indenter.step(1, 0, "  <p>  ").unwrap();
        assert_eq!(again, (next, line));
    }

    #[test]
    fn test_if_elseif_endif() {
        let out = indent(&["{% if a %}", "X", "{% elseif b %}", "Y", "{% endif %}"]);
        assert_eq!(out, "{% if a %}\n  X\n{% elseif b %}\n  Y\n{% endif %}");
    }

    #[test]
    fn test_nested_blocks_use_four_spaces() {
        let out = indent(&[
            "{% if a %}",
            "{% if b %}",
            "deep",
            "{% endif %}",
            "{% endif %}",
        ]);
        assert_eq!(
            out,
            "{% if a %}\n  {% if b %}\n    deep\n  {% endif %}\n{% endif %}"
        );
    }

    #[test]
    fn test_whitespace_tokens_become_empty_lines() {
        let out = indent(&["{% if a %}", "\n  ", "x", "{% endif %}"]);
        assert_eq!(out, "{% if a %}\n  \n  x\n{% endif %}");
    }

    #[test]
    fn test_custom_indent_width() {
        let out = BlockIndenter::new(4)
            .indent_and_join(["{% if a %}", "x", "{% endif %}"])
            .unwrap();
        assert_eq!(out, "{% if a %}\n    x\n{% endif %}");
    }

    #[test]
    fn test_unbalanced_lenient_goes_negative() {
        let indenter = BlockIndenter::default();
        let (level, line) = indenter.step(0, 0, "{% endif %}").unwrap();
        assert_eq!(level, -1);
        assert_eq!(line, "{% endif %}");

        let out = indent(&["{% endif %}", "x", "{% if a %}", "y"]);
        // -1 then back to 0 after the `if`
        assert_eq!(out, "{% endif %}\nx\n{% if a %}\ny");
    }

    #[test]
    fn test_strict_rejects_orphan_close() {
        let err = BlockIndenter::default()
            .with_strict(true)
            .indent_and_join(["x", "{% endif %}"])
            .unwrap_err();
        assert!(matches!(
            err,
            FormatError::UnbalancedBlock { index: 1, .. }
        ));
    }

    #[test]
    fn test_strict_rejects_unclosed_block() {
        let err = BlockIndenter::default()
            .with_strict(true)
            .indent_and_join(["{% if a %}", "x"])
            .unwrap_err();
        assert!(matches!(err, FormatError::UnclosedBlock { depth: 1 }));
    }

    #[test]
    fn test_strict_accepts_balanced() {
        let out = BlockIndenter::default()
            .with_strict(true)
            .indent_and_join(["{% if a %}", "x", "{% else %}", "y", "{% endif %}"])
            .unwrap();
        assert_eq!(out, "{% if a %}\n  x\n{% else %}\n  y\n{% endif %}");
    }

    #[test]
    fn test_byte_order_mark_is_trimmed() {
        assert_eq!(
            indent(&["\u{feff}", "{% if a %}", "x", "{% endif %}"]),
            "\n{% if a %}\n  x\n{% endif %}"
        );
        assert_eq!(indent(&["\u{feff}{% if a %}", "x"]), "{% if a %}\n  x");
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(indent(&[]), "");
    }
}
