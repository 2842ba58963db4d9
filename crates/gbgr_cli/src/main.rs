//! gbgr-tokens - design token build tool
//!
//! Commands:
//! - `build`: Generate CSS, JSON and type declarations from a token export
//! - `validate`: Check a build output directory
//! - `normalize`: Rewrite an export with normalized keys and references
//! - `watch`: Build, then rebuild whenever the export changes

mod config;
mod watch;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::TokensConfig;
use gbgr_tokens::validate::validate_dir;
use gbgr_tokens::{build, normalize_file, EmitConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Design token pipeline
#[derive(Parser, Debug)]
#[command(name = "gbgr-tokens")]
#[command(about = "Build, validate and normalize gbgr design tokens")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./gbgr-tokens.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate every artifact from the token export
    Build {
        /// Token export to read
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Validate a build output directory
    Validate {
        /// Output directory to check
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Write a normalized copy of the token export
    Normalize {
        /// Token export to read
        input: Option<PathBuf>,

        /// Normalized document to write
        output: Option<PathBuf>,
    },

    /// Build, then rebuild on every change to the export
    Watch {
        /// Token export to watch
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Quiet period before rebuilding, in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = TokensConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build { input, out_dir } => cmd_build(&config, input, out_dir),
        Commands::Validate { out_dir } => cmd_validate(&config, out_dir),
        Commands::Normalize { input, output } => cmd_normalize(&config, input, output),
        Commands::Watch {
            input,
            out_dir,
            debounce_ms,
        } => {
            let options = config.build_options(input, out_dir);
            let debounce = Duration::from_millis(debounce_ms.unwrap_or(config.watch.debounce_ms));
            watch::run(&options, &EmitConfig::standard(), debounce)
        }
    }
}

fn cmd_build(config: &TokensConfig, input: Option<PathBuf>, out_dir: Option<PathBuf>) -> Result<()> {
    let options = config.build_options(input, out_dir);
    let summary = build(&options, &EmitConfig::standard())
        .with_context(|| format!("Failed to build tokens from {}", options.input.display()))?;

    for path in &summary.written {
        println!("  {}", path.display());
    }
    println!(
        "Built {} tokens ({} dark overrides)",
        summary.token_count, summary.changed
    );
    Ok(())
}

fn cmd_validate(config: &TokensConfig, out_dir: Option<PathBuf>) -> Result<()> {
    let out_dir = out_dir.unwrap_or_else(|| config.build.out_dir.clone());
    let report = validate_dir(&out_dir)
        .with_context(|| format!("Failed to validate {}", out_dir.display()))?;

    for warning in &report.warnings {
        tracing::warn!("{warning}");
    }
    if !report.is_ok() {
        for error in &report.errors {
            eprintln!("  {error}");
        }
        anyhow::bail!("Validation failed with {} error(s)", report.errors.len());
    }

    println!("All {} tokens are valid", report.token_count);
    Ok(())
}

fn cmd_normalize(config: &TokensConfig, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let input = input.unwrap_or_else(|| config.build.input.clone());
    let output = output.unwrap_or_else(|| config.normalize.output.clone());
    normalize_file(&input, &output)
        .with_context(|| format!("Failed to normalize {}", input.display()))?;
    println!("Normalized {} -> {}", input.display(), output.display());
    Ok(())
}
