// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for apidoc-json.
//!
//! This binary provides the `apidoc-json` command for exporting API
//! documentation trees to the simplified JSON format.

use apidoc_json::exporter::{self, JsonStyle};
use apidoc_json::loader;
use lexopt::prelude::*;
use snafu::{ensure, prelude::*};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// File name used when the output is a directory.
const DEFAULT_OUTPUT_NAME: &str = "api.json";

/// Where to write the exported JSON.
#[derive(Clone)]
enum OutputTarget {
    /// Write to the given file, or `api.json` inside it if it is a directory.
    Path(PathBuf),
    /// Write to stdout.
    Stdout,
}

#[allow(clippy::struct_excessive_bools)]
struct Cli {
    input: Vec<PathBuf>,
    output: OutputTarget,
    style: JsonStyle,
    quiet: bool,
    verbose: bool,
    dry_run: bool,
    force: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("at least one input file or directory is required"))]
    NoInputFiles,

    #[snafu(display("{source}"))]
    Load { source: loader::LoadError },

    #[snafu(display("failed to serialize output: {source}"))]
    Serialize { source: serde_json::Error },

    #[snafu(display("failed to create output directory: {source}"))]
    CreateOutputDir { source: std::io::Error },

    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn print_help() {
    println!(
        "\
{name} {version}
Export API documentation to a simplified JSON format

Usage: {name} [OPTIONS] -o <OUTPUT> <INPUT>...

Arguments:
  <INPUT>...  Documentation JSON files or directories containing them

Options:
  -o, --output <OUTPUT>     Output file, directory (writes {default}), or - for stdout
      --pretty              Indent the output (default)
      --compact             Write the output on a single line

Other options:
  -q, --quiet               Only log warnings and errors
  -v, --verbose             Log progress for every class
  -n, --dry-run             Export without writing the output
  -f, --force               Overwrite an existing output file
  -h, --help                Print help
  -V, --version             Print version

Logging can be tuned further with the RUST_LOG environment variable.",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        default = DEFAULT_OUTPUT_NAME,
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut input = Vec::new();
    let mut output: Option<OutputTarget> = None;
    let mut style = JsonStyle::default();
    let mut quiet = false;
    let mut verbose = false;
    let mut dry_run = false;
    let mut force = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => {
                let val: PathBuf = parser.value()?.parse()?;
                output = Some(if val == Path::new("-") {
                    OutputTarget::Stdout
                } else {
                    OutputTarget::Path(val)
                });
            }
            // Last one wins
            Long("pretty") => style = JsonStyle::Pretty,
            Long("compact") => style = JsonStyle::Compact,
            Short('q') | Long("quiet") => quiet = true,
            Short('v') | Long("verbose") => verbose = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('f') | Long("force") => force = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => input.push(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        input,
        output: output.ok_or("missing required option: --output")?,
        style,
        quiet,
        verbose,
        dry_run,
        force,
    })
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over `--quiet`/`--verbose`. A subscriber that
/// cannot be installed leaves logging disabled.
fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;
    init_logging(&cli);

    ensure!(!cli.input.is_empty(), NoInputFilesSnafu);

    let files = loader::collect_input_files(&cli.input);
    ensure!(!files.is_empty(), NoInputFilesSnafu);

    let tree = loader::load_tree(&files).context(LoadSnafu)?;
    let exported = exporter::export(&tree);
    let json = exported.to_json(cli.style).context(SerializeSnafu)?;

    match &cli.output {
        OutputTarget::Stdout => {
            if cli.dry_run {
                tracing::info!(classes = exported.len(), "would write to stdout");
            } else {
                println!("{json}");
            }
        }
        OutputTarget::Path(path) => write_output(&resolve_output_path(path), &json, &cli)?,
    }

    Ok(())
}

/// Writes into `api.json` when the output names an existing directory.
fn resolve_output_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DEFAULT_OUTPUT_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Writes the exported JSON to `path`, honouring `--dry-run` and `--force`.
fn write_output(path: &Path, json: &str, cli: &Cli) -> Result<(), Error> {
    if cli.dry_run {
        tracing::info!("would write {}", path.display());
        return Ok(());
    }

    if path.exists() && !cli.force {
        tracing::warn!(
            "skipping {} (already exists, use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }

    // Create parent directory if needed
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).context(CreateOutputDirSnafu)?;
    }

    std::fs::write(path, json).context(WriteFileSnafu { path })?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}
