/// `PrettierNormalizer` - Markup normalization through an external prettier process
///
/// The source is piped to the process on stdin and the normalized text is
/// read back from stdout. Options other than widths are fixed.
use std::io::{self, Write};
use std::process::{Command, Stdio};

use super::Normalizer;
use crate::config::Config;
use crate::error::FormatError;

/// Widths handed to prettier; every other option is a fixed constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettierOptions {
    pub tab_width: usize,
    pub print_width: usize,
}

impl Default for PrettierOptions {
    fn default() -> Self {
        Self {
            tab_width: 2,
            print_width: 80,
        }
    }
}

impl PrettierOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            tab_width: config.indent,
            print_width: config.print_width,
        }
    }

    /// Command-line flags for prettier
    ///
    /// Spaces are prettier's default, so no `--use-tabs` flag is passed.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        vec![
            "--parser".to_string(),
            "html".to_string(),
            "--tab-width".to_string(),
            self.tab_width.to_string(),
            "--print-width".to_string(),
            self.print_width.to_string(),
            "--html-whitespace-sensitivity".to_string(),
            "ignore".to_string(),
            "--single-quote".to_string(),
            "--trailing-comma".to_string(),
            "none".to_string(),
        ]
    }
}

/// Runs `command` (program plus leading arguments) with the prettier flags appended
#[derive(Debug, Clone)]
pub struct PrettierNormalizer {
    command: Vec<String>,
    options: PrettierOptions,
}

impl PrettierNormalizer {
    #[must_use]
    pub fn new(command: Vec<String>, options: PrettierOptions) -> Self {
        Self { command, options }
    }

    fn display_command(&self) -> String {
        self.command.join(" ")
    }
}

impl Normalizer for PrettierNormalizer {
    fn name(&self) -> &'static str {
        "prettier"
    }

    fn normalize(&self, text: &str) -> Result<String, FormatError> {
        let Some((program, leading)) = self.command.split_first() else {
            return Err(FormatError::Normalize {
                message: "no normalizer command configured".to_string(),
            });
        };

        tracing::debug!(command = %self.display_command(), bytes = text.len(), "running normalizer");

        let mut child = Command::new(program)
            .args(leading)
            .args(self.options.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| FormatError::NormalizerSpawn {
                command: self.display_command(),
                source,
            })?;

        let stdin = child.stdin.take();
        // Feed stdin from a second thread so a full stdout pipe cannot deadlock us
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(text.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output = output.map_err(|source| FormatError::NormalizerSpawn {
            command: self.display_command(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("`{}` exited with {}", self.display_command(), output.status),
                detail => detail.to_string(),
            };
            return Err(FormatError::Normalize { message });
        }
        if let Err(e) = written {
            return Err(FormatError::Normalize {
                message: format!("failed to send input to normalizer: {e}"),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| FormatError::NotText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(script: &str) -> PrettierNormalizer {
        // Trailing "sh" becomes $0; the prettier flags land in $1.. and are ignored
        PrettierNormalizer::new(
            vec![
                "sh".to_string(),
                "-c".to_string(),
                script.to_string(),
                "sh".to_string(),
            ],
            PrettierOptions::default(),
        )
    }

    #[test]
    fn test_default_args() {
        let args = PrettierOptions::default().args();
        assert_eq!(
            args,
            vec![
                "--parser",
                "html",
                "--tab-width",
                "2",
                "--print-width",
                "80",
                "--html-whitespace-sensitivity",
                "ignore",
                "--single-quote",
                "--trailing-comma",
                "none",
            ]
        );
    }

    #[test]
    fn test_options_follow_config() {
        let config = Config {
            indent: 4,
            print_width: 120,
            ..Default::default()
        };
        let options = PrettierOptions::from_config(&config);
        assert_eq!(options.tab_width, 4);
        assert_eq!(options.print_width, 120);
    }

    #[cfg(unix)]
    #[test]
    fn test_round_trips_through_process() {
        let text = "{% if a %}<p>x</p>{% endif %}\n";
        assert_eq!(shell("cat").normalize(text).unwrap(), text);
    }

    #[cfg(unix)]
    #[test]
    fn test_large_input_does_not_deadlock() {
        let text = "<p>x</p>\n".repeat(100_000);
        assert_eq!(shell("cat").normalize(&text).unwrap().len(), text.len());
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_carries_stderr() {
        let err = shell("cat >/dev/null; echo 'SyntaxError: Unexpected closing tag' >&2; exit 2")
            .normalize("<p></div>")
            .unwrap_err();
        match err {
            FormatError::Normalize { message } => {
                assert!(message.contains("Unexpected closing tag"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_output_is_not_text() {
        let err = shell("cat >/dev/null; printf '\\377\\376'")
            .normalize("x")
            .unwrap_err();
        assert!(matches!(err, FormatError::NotText));
    }

    #[test]
    fn test_missing_program() {
        let normalizer = PrettierNormalizer::new(
            vec!["emfmt-no-such-normalizer".to_string()],
            PrettierOptions::default(),
        );
        let err = normalizer.normalize("x").unwrap_err();
        assert!(matches!(err, FormatError::NormalizerSpawn { .. }));
    }

    #[test]
    fn test_empty_command() {
        let normalizer = PrettierNormalizer::new(Vec::new(), PrettierOptions::default());
        assert!(matches!(
            normalizer.normalize("x"),
            Err(FormatError::Normalize { .. })
        ));
    }
}
