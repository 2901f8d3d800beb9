//! emfmt - Formatter for HTML templates with `{% if %}` control blocks

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use emfmt::process::format_source;
use emfmt::{normalize, parse_args, CliArgs, Config, FormatError, Result};
use glob::Pattern;
use rayon::prelude::*;
use tempfile::NamedTempFile;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are skipped to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn main() -> Result<()> {
    let args = parse_args();
    init_tracing(args.debug);

    if args.inputs.is_empty() {
        return Err(FormatError::MissingInput.into());
    }

    if args.inputs.iter().any(|input| input.as_os_str() == "-") {
        if args.inputs.len() > 1 {
            anyhow::bail!("`-` (stdin) cannot be combined with other inputs");
        }
        let config = build_config(&args, None)?;
        return process_stdin(&config);
    }

    // An explicit config file applies to every input; otherwise each file discovers its own
    let base_config = match &args.config {
        Some(_) => Some(build_config(&args, None)?),
        None => None,
    };

    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                tracing::warn!("failed to configure thread pool: {e}");
            }
        }
    }

    let files = collect_files(&args, base_config.as_ref())?;
    if files.is_empty() {
        anyhow::bail!("no template files found to format");
    }

    let use_sequential = args.stdout || args.jobs == Some(1) || files.len() == 1;
    let errors = if use_sequential {
        process_files_sequential(&files, base_config.as_ref(), &args)
    } else {
        process_files_parallel(&files, base_config.as_ref(), &args)
    };

    if errors > 0 {
        anyhow::bail!("{errors} of {} file(s) failed to format", files.len());
    }
    Ok(())
}

/// Route `tracing` events to stderr
///
/// `--debug` turns on debug events for this crate; otherwise `RUST_LOG` is
/// honoured and warnings are shown by default.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("emfmt=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!(path = %config_path.display(), "using explicit config file");
        Config::from_toml_file(config_path)?
    } else {
        let start = match for_path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().unwrap_or_default(),
        };
        Config::from_discovered_files(&start)
    };

    // Override with CLI arguments
    if let Some(indent) = args.indent {
        config.indent = indent;
    }
    if args.no_normalize {
        config.normalize = false;
    }
    if args.keep_stray {
        config.keep_stray = true;
    }
    if args.strict_nesting {
        config.strict_nesting = true;
    }
    config.extensions.extend(args.extensions.iter().cloned());

    match config.to_toml() {
        Ok(dump) => tracing::debug!("resolved configuration:\n{dump}"),
        Err(e) => tracing::debug!(?config, "resolved configuration (not renderable: {e})"),
    }

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Collect all files to process, handling directories and recursive flag
///
/// Files named explicitly are always formatted; directory entries must carry
/// one of the extensions configured for that directory.
fn collect_files(args: &CliArgs, base_config: Option<&Config>) -> Result<Vec<PathBuf>> {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!("ignoring invalid exclude pattern {p:?}: {e}");
                None
            }
        })
        .collect();

    let mut files = Vec::new();
    for input in &args.inputs {
        if input.is_dir() {
            let config = match base_config {
                Some(config) => config.clone(),
                None => build_config(args, Some(input.as_path()))?,
            };
            let wanted = |path: &Path| {
                path.is_file()
                    && config.matches_extension(path)
                    && !is_excluded(path, &exclude_patterns)
            };
            let max_depth = if args.recursive { 256 } else { 1 };
            files.extend(
                WalkDir::new(input)
                    .follow_links(true)
                    .max_depth(max_depth)
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                    .map(walkdir::DirEntry::into_path)
                    .filter(|path| wanted(path.as_path())),
            );
        } else if !is_excluded(input, &exclude_patterns) {
            // Missing files are kept so that reading them reports the error
            files.push(input.clone());
        }
    }

    Ok(files)
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path.components().any(|component| match component {
                std::path::Component::Normal(c) => pattern.matches(&c.to_string_lossy()),
                _ => false,
            })
    })
}

/// Process files one after another; returns the number of failures
fn process_files_sequential(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> usize {
    let mut errors = 0;
    for path in files {
        let result = process_with_config(path, base_config, args);
        report(path, &result);
        if result.is_err() {
            errors += 1;
        }
    }
    errors
}

/// Process files in parallel using Rayon; returns the number of failures
fn process_files_parallel(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> usize {
    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let result = process_with_config(path, base_config, args);
        report(path, &result);
        if result.is_ok() {
            success_count.fetch_add(1, Ordering::Relaxed);
        } else {
            error_count.fetch_add(1, Ordering::Relaxed);
        }
    });

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);
    if !args.silent {
        if errors == 0 {
            eprintln!("Formatted {success} files successfully.");
        } else {
            eprintln!("Formatted {success} files, {errors} errors.");
        }
    }
    errors
}

fn report(path: &Path, result: &Result<()>) {
    if let Err(e) = result {
        eprintln!("Error formatting {}: {e:#}", path.display());
    }
}

/// Use the shared config if one was given, otherwise discover one for `path`
fn process_with_config(path: &Path, base_config: Option<&Config>, args: &CliArgs) -> Result<()> {
    match base_config {
        Some(config) => process_single_file(path, config, args),
        None => process_single_file(path, &build_config(args, Some(path))?, args),
    }
}

/// Process a single file
fn process_single_file(path: &Path, config: &Config, args: &CliArgs) -> Result<()> {
    // Check file size BEFORE reading to prevent memory exhaustion
    let metadata = std::fs::metadata(path)?;
    if metadata.len() > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                metadata.len() / (1024 * 1024),
                DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
            );
        }
        return Ok(());
    }

    let bytes = std::fs::read(path)?;
    let source = String::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8)?;

    let normalizer = normalize::from_config(config);
    tracing::debug!(path = %path.display(), normalizer = normalizer.name(), "formatting file");
    let formatted = format_source(&source, normalizer.as_ref(), config)?;

    if args.stdout {
        io::stdout().lock().write_all(formatted.as_bytes())?;
        return Ok(());
    }

    write_in_place(path, &formatted, &metadata)?;
    if !args.silent {
        println!("File {} formatted successfully!", path.display());
    }
    Ok(())
}

/// Replace `path` with `contents` via a sibling temporary file and a rename
///
/// Symlinks are resolved first so the link survives and its target is rewritten.
fn write_in_place(path: &Path, contents: &str, metadata: &std::fs::Metadata) -> Result<()> {
    let target = std::fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    std::fs::set_permissions(tmp.path(), metadata.permissions())?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

/// Process input from stdin, output to stdout
fn process_stdin(config: &Config) -> Result<()> {
    let mut stdin_contents = Vec::new();
    io::stdin().read_to_end(&mut stdin_contents)?;

    #[allow(clippy::cast_possible_truncation)]
    let stdin_size = stdin_contents.len() as u64;
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    let normalizer = normalize::from_config(config);
    let mut output = Vec::new();
    emfmt::process::format_file(
        stdin_contents.as_slice(),
        &mut output,
        config,
        normalizer.as_ref(),
        "stdin",
    )?;
    io::stdout().write_all(&output)?;
    Ok(())
}
