//! CLI command definitions and handlers.

pub mod models;
pub mod serve;
pub mod translate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ganshift_adapters::artifacts::{self, FORWARD_GENERATOR, REVERSE_GENERATOR};
use ganshift_core::{Direction, ModelStore};

use crate::config::AppConfig;

/// Ganshift - two-generator image-to-image translation demo
#[derive(Parser)]
#[command(name = "ganshift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Translate an image pair through the demo route
    Translate(translate::TranslateArgs),
    /// Start the web upload shell
    Serve(serve::ServeArgs),
    /// Manage generator checkpoints
    Models(models::ModelsArgs),
}

/// Parse and validate a direction value.
pub(crate) fn parse_direction(s: &str) -> Result<Direction, String> {
    s.parse()
}

/// Apply the artifacts directory override: CLI flag > config file > default.
pub(crate) fn apply_models_dir(flag: Option<&PathBuf>, config: &AppConfig) {
    let dir = flag.cloned().or_else(|| config.models.dir.clone());
    if let Some(ref dir) = dir {
        tracing::debug!("Using custom artifacts directory: {}", dir.display());
    }
    artifacts::set_artifacts_dir(dir);
}

/// Loads both generators from the artifacts directory.
///
/// Callers must have verified artifact presence first; a missing or corrupt
/// checkpoint here aborts the run.
pub(crate) fn open_store() -> Result<ModelStore> {
    let forward = artifacts::artifact_path(FORWARD_GENERATOR)
        .context("Forward generator missing from the artifact registry")?;
    let reverse = artifacts::artifact_path(REVERSE_GENERATOR)
        .context("Reverse generator missing from the artifact registry")?;
    ModelStore::open(&forward, &reverse)
}
