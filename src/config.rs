//! Configuration management for emfmt.
//!
//! This module provides the [`Config`] struct which controls all formatting behavior.
//! Configuration can be loaded from:
//! - TOML files (`emfmt.toml`)
//! - CLI arguments (which override file settings)
//!
//! Config files are auto-discovered by searching parent directories from the file
//! being formatted up to the filesystem root, plus the user's home directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["emfmt.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

// Serde default functions
fn default_indent() -> usize {
    2
}
fn default_print_width() -> usize {
    80
}
fn default_true() -> bool {
    true
}
fn default_normalizer() -> Vec<String> {
    vec!["npx".to_string(), "prettier".to_string()]
}
fn default_extensions() -> Vec<String> {
    vec!["inc".to_string()]
}

/// Main configuration struct for emfmt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Spaces per nesting level, also the normalizer's tab width (default: 2)
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Fill width handed to the normalizer (default: 80)
    #[serde(default = "default_print_width")]
    pub print_width: usize,

    /// Run the markup normalizer before indenting (default: true)
    #[serde(default = "default_true")]
    pub normalize: bool,

    /// Normalizer command line, program first (default: `npx prettier`)
    #[serde(default = "default_normalizer")]
    pub normalizer: Vec<String>,

    /// Keep stray `<>{}%` characters as tokens instead of dropping them (default: false)
    #[serde(default)]
    pub keep_stray: bool,

    /// Fail on unbalanced `if`/`endif` nesting (default: false)
    #[serde(default)]
    pub strict_nesting: bool,

    /// File extensions picked up when walking directories (default: `inc`)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub indent: Option<usize>,
    pub print_width: Option<usize>,
    pub normalize: Option<bool>,
    pub normalizer: Option<Vec<String>>,
    pub keep_stray: Option<bool>,
    pub strict_nesting: Option<bool>,
    pub extensions: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            indent: default_indent(),
            print_width: default_print_width(),
            normalize: true,
            normalizer: default_normalizer(),
            keep_stray: false,
            strict_nesting: false,
            extensions: default_extensions(),
        }
    }
}

impl Config {
    /// Maximum reasonable indent size
    const MAX_INDENT: usize = 8;
    /// Minimum reasonable print width
    const MIN_PRINT_WIDTH: usize = 40;
    /// Maximum reasonable print width
    const MAX_PRINT_WIDTH: usize = 1000;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.indent == 0 {
            return Some("indent must be at least 1".to_string());
        }
        if self.indent > Self::MAX_INDENT {
            return Some(format!(
                "indent {} exceeds maximum of {}",
                self.indent,
                Self::MAX_INDENT
            ));
        }
        if self.print_width < Self::MIN_PRINT_WIDTH {
            return Some(format!(
                "print_width {} is below minimum of {}",
                self.print_width,
                Self::MIN_PRINT_WIDTH
            ));
        }
        if self.print_width > Self::MAX_PRINT_WIDTH {
            return Some(format!(
                "print_width {} exceeds maximum of {}",
                self.print_width,
                Self::MAX_PRINT_WIDTH
            ));
        }
        if self.normalize && self.normalizer.first().map_or(true, String::is_empty) {
            return Some("normalizer command must not be empty".to_string());
        }
        None
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(partial);
        Ok(config)
    }

    /// Render the resolved configuration in `emfmt.toml` syntax
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: PartialConfig) {
        if let Some(v) = partial.indent {
            self.indent = v;
        }
        if let Some(v) = partial.print_width {
            self.print_width = v;
        }
        if let Some(v) = partial.normalize {
            self.normalize = v;
        }
        if let Some(v) = partial.normalizer {
            self.normalizer = v;
        }
        if let Some(v) = partial.keep_stray {
            self.keep_stray = v;
        }
        if let Some(v) = partial.strict_nesting {
            self.strict_nesting = v;
        }
        if let Some(v) = partial.extensions {
            self.extensions = v;
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home directory config.
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            std::env::current_dir().ok()
        };

        if let Some(dir) = start_dir {
            // Root first, so closer directories win
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Unreadable or malformed files are skipped with a warning.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let mut config = Self::default();
        for path in Self::discover_config_files(start_path) {
            tracing::debug!(path = %path.display(), "loading config file");
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(partial),
                    Err(e) => tracing::warn!("failed to parse {}: {e}", path.display()),
                },
                Err(e) => tracing::warn!("failed to read {}: {e}", path.display()),
            }
        }
        config
    }

    /// Check whether `path` has one of the configured extensions
    ///
    /// Extensions may be listed with or without a leading dot.
    #[must_use]
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|want| want.strip_prefix('.').unwrap_or(want) == ext)
            })
    }
}
