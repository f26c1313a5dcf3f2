//! Resforge CLI: incremental resource conversion from the command line.
//!
//! `resforge build` converts resource files (`.resx`, `.resources`, `.txt`)
//! into their outputs, skipping sources whose outputs are up to date, and
//! optionally generates a strongly-typed accessor class.

#![warn(missing_docs)]

mod build;
mod report;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use resforge_common::ResourceFormat;
use tracing_subscriber::EnvFilter;

/// Resforge: incremental resource conversion.
#[derive(Parser, Debug)]
#[command(name = "resforge", version, about = "Incremental resource converter")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `resforge.toml` task file. Defaults to `./resforge.toml`
    /// when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert the configured resource sources.
    Build(BuildArgs),
}

/// Arguments for `resforge build`. Flags extend or override the task file.
#[derive(Parser, Debug, Default)]
pub struct BuildArgs {
    /// Source file; repeat for several. Replaces the task file's sources.
    #[arg(short, long = "source")]
    pub sources: Vec<PathBuf>,

    /// Output file, index-aligned with `--source`. Replaces the task file's outputs.
    #[arg(short, long = "output")]
    pub outputs: Vec<PathBuf>,

    /// Reference assembly; added to the task file's references.
    #[arg(long = "reference")]
    pub references: Vec<PathBuf>,

    /// Extra input that forces a full rebuild when it changes.
    #[arg(long = "additional-input")]
    pub additional_inputs: Vec<PathBuf>,

    /// State file used for incremental builds.
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Format of outputs derived from source names.
    #[arg(long, value_parser = parse_format)]
    pub output_format: Option<ResourceFormat>,

    /// Accessor language (`CSharp`, `C#`, `cs`, `VisualBasic`, `VB`, `vb`).
    #[arg(long)]
    pub str_language: Option<String>,

    /// Accessor namespace.
    #[arg(long)]
    pub str_namespace: Option<String>,

    /// Manifest prefix the accessor loads resources by; defaults to the
    /// accessor namespace.
    #[arg(long)]
    pub str_resources_namespace: Option<String>,

    /// Accessor class name.
    #[arg(long)]
    pub str_class: Option<String>,

    /// Accessor file path.
    #[arg(long)]
    pub str_file: Option<PathBuf>,

    /// Generate a public accessor class.
    #[arg(long)]
    pub public_class: bool,

    /// Worker count; 1 converts sequentially.
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub jobs: Option<u64>,

    /// Per-source converter time limit in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Report format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

fn parse_format(s: &str) -> Result<ResourceFormat, String> {
    s.parse::<ResourceFormat>().map_err(|e| e.to_string())
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from the environment.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a task file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };
    init_logging(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `--verbose` and `--quiet` win over
/// `RUST_LOG`; without either, `RUST_LOG` applies and defaults to `warn`.
fn init_logging(quiet: bool, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
