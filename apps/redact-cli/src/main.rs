//! redact-cli binary
//!
//! Reads interchange documents and parser character dumps, writes JSON to
//! stdout. Logs go to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dedupe_core::{DedupeConfig, KeepPolicy, OverlapMode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "redact-cli")]
#[command(version, about = "Locate and deduplicate sensitive spans in extracted documents")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deduplicate the detections of an interchange document
    Dedupe {
        /// Interchange document (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Dedupe configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the overlap mode: exact, contain or overlap
        #[arg(long)]
        overlap_mode: Option<String>,

        /// Legacy survivor policy: widest, first, last or entity-order
        #[arg(long)]
        keep: Option<String>,
    },
    /// Resolve a canonical span to page rectangles
    Locate {
        /// Character records (JSON array)
        #[arg(long)]
        chars: PathBuf,

        #[arg(long)]
        start: usize,

        #[arg(long)]
        end: usize,
    },
    /// Add structured detections for every plain detection
    Project {
        /// Character records (JSON array)
        #[arg(long)]
        chars: PathBuf,

        /// Interchange document (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the JSON result, so all logging goes to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let output = match args.command {
        Command::Dedupe {
            input,
            config,
            overlap_mode,
            keep,
        } => {
            let mut dedupe_config = match config {
                Some(path) => DedupeConfig::from_file(path)?,
                None => DedupeConfig::default(),
            };
            if let Some(mode) = overlap_mode {
                dedupe_config.overlap_mode = mode.parse::<OverlapMode>()?;
            }
            if let Some(keep) = keep {
                dedupe_config.keep = Some(keep.parse::<KeepPolicy>()?);
            }
            tracing::info!(mode = %dedupe_config.overlap_mode, "Deduplicating {}", input.display());
            redact_cli::dedupe_document(&read(&input)?, dedupe_config)?
        }
        Command::Locate { chars, start, end } => {
            redact_cli::locate_span(&read(&chars)?, start, end)?
        }
        Command::Project { chars, input } => {
            redact_cli::project_document(&read(&chars)?, &read(&input)?)?
        }
    };

    println!("{}", output);
    Ok(())
}
