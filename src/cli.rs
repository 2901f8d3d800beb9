//! Command-line interface for emfmt.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to format (`-` for stdin)
    pub inputs: Vec<PathBuf>,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Extra file extensions picked up in directories
    pub extensions: Vec<String>,

    /// Output to stdout instead of in-place
    pub stdout: bool,

    /// Skip the markup normalizer
    pub no_normalize: bool,

    /// Keep stray `<>{}%` characters as tokens
    pub keep_stray: bool,

    /// Reject unbalanced control blocks
    pub strict_nesting: bool,

    /// Number of spaces per indent level
    pub indent: Option<usize>,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Silent mode (no output)
    pub silent: bool,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("emfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Formatter for HTML templates with {% if %} control blocks")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to format (- reads stdin)")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively format directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/directories matching pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("ext")
                .short('x')
                .long("ext")
                .help("Additional template file extension for directories (can be repeated)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Output to stdout instead of modifying files in-place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-normalize")
                .long("no-normalize")
                .help("Skip the prettier markup pass and only re-indent control blocks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("keep-stray")
                .long("keep-stray")
                .help("Keep stray <, >, {, }, % characters instead of dropping them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict-nesting")
                .long("strict-nesting")
                .help("Fail on endif/else/elseif without an open if, or ifs left open")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("indent")
                .short('i')
                .long("indent")
                .help("Number of spaces per indent level [default: 2]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no confirmation messages)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug logging (config discovery, normalizer runs)")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    let strings = |id: &str| -> Vec<String> {
        matches
            .get_many::<String>(id)
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default()
    };

    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        exclude: strings("exclude"),
        extensions: strings("ext"),
        stdout: matches.get_flag("stdout"),
        no_normalize: matches.get_flag("no-normalize"),
        keep_stray: matches.get_flag("keep-stray"),
        strict_nesting: matches.get_flag("strict-nesting"),
        indent: matches.get_one::<usize>("indent").copied(),
        jobs: matches.get_one::<usize>("jobs").copied(),
        silent: matches.get_flag("silent"),
        debug: matches.get_flag("debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_builds() {
        let cmd = build_cli();
        assert_eq!(cmd.get_name(), "emfmt");
        cmd.debug_assert();
    }

    #[test]
    fn test_no_inputs_is_not_a_clap_error() {
        // Missing input is reported by the binary with exit status 1
        let args = parse_args_from(vec!["emfmt"]);
        assert!(args.inputs.is_empty());
    }

    #[test]
    fn test_single_file_defaults() {
        let args = parse_args_from(vec!["emfmt", "template.inc"]);
        assert_eq!(args.inputs, vec![PathBuf::from("template.inc")]);
        assert!(!args.stdout);
        assert!(!args.no_normalize);
        assert!(!args.keep_stray);
        assert!(!args.strict_nesting);
        assert_eq!(args.indent, None);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_multiple_inputs() {
        let args = parse_args_from(vec!["emfmt", "a.inc", "b.inc", "-"]);
        assert_eq!(args.inputs.len(), 3);
        assert_eq!(args.inputs[2], PathBuf::from("-"));
    }

    #[test]
    fn test_behaviour_flags() {
        let args = parse_args_from(vec![
            "emfmt",
            "--no-normalize",
            "--keep-stray",
            "--strict-nesting",
            "-i",
            "4",
            "a.inc",
        ]);
        assert!(args.no_normalize);
        assert!(args.keep_stray);
        assert!(args.strict_nesting);
        assert_eq!(args.indent, Some(4));
    }

    #[test]
    fn test_exclude_and_ext_repeat() {
        let args = parse_args_from(vec![
            "emfmt", "-r", "-e", "vendor", "--exclude", "*.min.inc", "-x", "html", "-x", "htm",
            "templates/",
        ]);
        assert!(args.recursive);
        assert_eq!(args.exclude, vec!["vendor", "*.min.inc"]);
        assert_eq!(args.extensions, vec!["html", "htm"]);
    }

    #[test]
    fn test_output_flags() {
        let args = parse_args_from(vec!["emfmt", "-s", "-S", "-D", "-j", "1", "a.inc"]);
        assert!(args.stdout);
        assert!(args.silent);
        assert!(args.debug);
        assert_eq!(args.jobs, Some(1));
    }

    #[test]
    fn test_config_path() {
        let args = parse_args_from(vec!["emfmt", "-c", "conf/emfmt.toml", "a.inc"]);
        assert_eq!(args.config, Some(PathBuf::from("conf/emfmt.toml")));
    }
}
