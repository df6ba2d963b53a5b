//! mediadupe - duplicate media file finder
//!
//! Walks a directory tree, fingerprints every regular file (whole-file
//! SHA-256 for small files, one sampled block for large ones, or just the
//! base name), groups files that share a fingerprint, and optionally moves
//! redundant copies under a chosen prefix to the system trash.
//!
//! ```no_run
//! use mediadupe::duplicates::{DuplicateFinder, FinderConfig};
//! use mediadupe::scanner::path_utils::normalize_input;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let scan = finder
//!     .find_removals(&normalize_input("~/Videos"), &normalize_input("~/Videos/inbox"))
//!     .unwrap();
//! for path in &scan.removals {
//!     println!("{}", path.display());
//! }
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::actions::{delete_batch, validate_preserves_copy};
use crate::cli::{Cli, Commands, FindArgs, OutputFormat, RemoveArgs, ScanOptions};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{JsonOutput, JsonRemovalOutput, TextDeleteReporter, TextOutput};
use crate::progress::Progress;
use crate::scanner::path_utils::normalize_input;
use crate::scanner::{FingerprintMode, PrefixSet, WalkerConfig};
use crate::signal::ShutdownHandler;

/// Run the parsed command line against the real terminal.
///
/// # Errors
///
/// Returns an error for bad configuration, a missing search directory,
/// an interrupted scan, or a failure writing the report.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let color = !cli.no_color && io::stdout().is_terminal();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    run_app_with(cli, &mut input, &mut out, color)
}

/// Run the parsed command line with explicit input and output streams.
///
/// The confirmation prompt reads from `input`; reports go to `out`.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_app_with<R: BufRead, W: Write + Send>(
    cli: Cli,
    input: &mut R,
    out: &mut W,
    color: bool,
) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let shutdown = signal::install_handler().context("installing Ctrl+C handler")?;
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let text = TextOutput::new(color);

    match cli.command {
        Commands::Find(args) => handle_find(args, &config, &shutdown, cli.quiet, text, out),
        Commands::Remove(args) => {
            handle_remove(args, &config, &shutdown, cli.quiet, text, input, out)
        }
    }
}

fn handle_find<W: Write>(
    args: FindArgs,
    config: &Config,
    shutdown: &ShutdownHandler,
    quiet: bool,
    text: TextOutput,
    out: &mut W,
) -> Result<ExitCode> {
    let (finder, root) = build_finder(&args.scan, config, shutdown, quiet)?;
    let (groups, summary) = finder.find_duplicates(&root)?;

    let exit_code = if groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    };

    match args.scan.output {
        OutputFormat::Text => text.write_groups(out, &groups)?,
        OutputFormat::Json => JsonOutput::new(&groups, &summary, exit_code).write_to(out, true)?,
    }

    log::info!(
        "{} files scanned, {} skipped, {} reclaimable",
        summary.total_files,
        summary.skipped_files.len(),
        summary.reclaimable_display()
    );

    Ok(exit_code)
}

fn handle_remove<R: BufRead, W: Write + Send>(
    args: RemoveArgs,
    config: &Config,
    shutdown: &ShutdownHandler,
    quiet: bool,
    text: TextOutput,
    input: &mut R,
    out: &mut W,
) -> Result<ExitCode> {
    let format = args.scan.output;
    if format == OutputFormat::Json && !args.yes && !args.dry_run {
        bail!("--output json needs --yes or --dry-run, since it cannot prompt");
    }

    let prefix = normalize_input(&args.remove_prefix);
    let (finder, root) = build_finder(&args.scan, config, shutdown, quiet)?;
    let scan = finder.find_removals(&root, &prefix)?;

    for (group, plan) in scan.groups.iter().zip(&scan.plans) {
        validate_preserves_copy(&plan.remove, &group.paths())
            .with_context(|| format!("refusing removal in group {}", group.fingerprint))?;
    }

    let json =
        |exit_code| JsonRemovalOutput::new(&prefix, &scan.removals, &scan.summary, exit_code);

    if scan.removals.is_empty() {
        match format {
            OutputFormat::Text => text.write_removals(out, &scan.removals)?,
            OutputFormat::Json => json(ExitCode::NoDuplicates).write_to(out, true)?,
        }
        return Ok(ExitCode::NoDuplicates);
    }

    if format == OutputFormat::Text {
        text.write_removals(out, &scan.removals)?;
    }

    if args.dry_run {
        match format {
            OutputFormat::Text => writeln!(out, "\nDry run: nothing was moved to Trash.")?,
            OutputFormat::Json => json(ExitCode::Success)
                .with_dry_run(true)
                .write_to(out, true)?,
        }
        return Ok(ExitCode::Success);
    }

    if !args.yes && !confirm(input, out)? {
        writeln!(out, "Aborted.")?;
        return Ok(ExitCode::Success);
    }

    if shutdown.is_shutdown_requested() {
        return Err(duplicates::FinderError::Interrupted.into());
    }

    let batch = match format {
        OutputFormat::Text => {
            let reporter = TextDeleteReporter::new(&mut *out, text);
            delete_batch(&scan.removals, Some(&reporter))
        }
        OutputFormat::Json => delete_batch::<TextDeleteReporter<io::Sink>>(&scan.removals, None),
    };

    let exit_code = if batch.all_succeeded() {
        ExitCode::Success
    } else {
        ExitCode::PartialSuccess
    };

    if format == OutputFormat::Json {
        json(exit_code).with_batch(&batch).write_to(out, true)?;
    }

    Ok(exit_code)
}

/// Ask before trashing; only `y` or `Y` confirms.
///
/// # Errors
///
/// Returns an error if the prompt cannot be written or the answer read.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<bool> {
    write!(
        out,
        "\nAre you sure you want to move these files to Trash? [y/N]: "
    )?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Merge CLI options over the loaded configuration and build the finder.
fn build_finder(
    scan: &ScanOptions,
    config: &Config,
    shutdown: &ShutdownHandler,
    quiet: bool,
) -> Result<(DuplicateFinder, PathBuf)> {
    let mut merged = config.clone();
    merged
        .exclude_prefixes
        .extend(scan.exclude_prefixes.iter().cloned());
    merged.by_name |= scan.by_name;
    if let Some(threads) = scan.io_threads {
        merged.io_threads = threads;
    }
    if let Some(block_size) = scan.block_size {
        merged.block_size = block_size;
    }
    merged.validate().context("invalid options")?;

    let root = normalize_input(&scan.search_dir);
    DuplicateFinder::check_root(&root)?;

    let exclusions = PrefixSet::new(&merged.exclude_prefixes);
    log::debug!("Excluding {} prefix(es)", exclusions.len());

    let hide_progress = quiet || scan.output == OutputFormat::Json;
    let finder_config = FinderConfig::default()
        .with_io_threads(merged.io_threads)
        .with_mode(FingerprintMode::from_by_name(merged.by_name))
        .with_block_size(merged.block_size)
        .with_walker_config(WalkerConfig::new(exclusions))
        .with_shutdown_flag(shutdown.get_flag())
        .with_progress_callback(Arc::new(Progress::new(hide_progress)));

    Ok((DuplicateFinder::new(finder_config), root))
}
