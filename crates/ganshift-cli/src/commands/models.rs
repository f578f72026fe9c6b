//! Models command - manage generator checkpoints.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Args, Subcommand};
use ganshift_adapters::artifacts::{
    self, ensure_artifacts_with_progress, ProgressCallback, ARTIFACTS,
};
use indicatif::{ProgressBar, ProgressStyle};

use super::apply_models_dir;
use crate::config::AppConfig;

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,

    /// Custom artifacts directory (overrides default and config)
    #[arg(long, value_name = "DIR", global = true)]
    pub models_dir: Option<PathBuf>,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// Download absent checkpoints
    Fetch,
    /// List checkpoints and their status
    List,
    /// Print the artifacts directory path
    Path,
}

/// Run the models command.
pub fn run(args: &ModelsArgs, config: &AppConfig) -> Result<()> {
    apply_models_dir(args.models_dir.as_ref(), config);
    match args.command {
        ModelsCommand::Fetch => fetch(),
        ModelsCommand::List => list(),
        ModelsCommand::Path => print_path(),
    }
}

fn fetch() -> Result<()> {
    let bar = Arc::new(ProgressBar::new(0));
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
            .map_err(|e| anyhow::anyhow!("Invalid progress template: {e}"))?
            .progress_chars("#>-"),
    );

    // The callback fires per chunk; reset the bar when a new artifact starts.
    let current: Arc<Mutex<String>> = Arc::new(Mutex::new(String::new()));
    let bar_handle = Arc::clone(&bar);
    let current_handle = Arc::clone(&current);

    let progress: ProgressCallback =
        Box::new(move |name: &str, downloaded: u64, total: Option<u64>| {
            let is_new_artifact = {
                let mut current = current_handle
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                if *current == name {
                    false
                } else {
                    *current = name.to_string();
                    true
                }
            };
            if is_new_artifact {
                bar_handle.set_length(total.unwrap_or(0));
                bar_handle.set_message(name.to_string());
            }
            bar_handle.set_position(downloaded);
        });

    ensure_artifacts_with_progress(Some(&progress))?;

    bar.finish_with_message("All checkpoints downloaded");
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn list() -> Result<()> {
    let entries = artifacts::list_artifacts();
    let dir = artifacts::artifacts_dir();

    println!("Artifacts directory: {}", dir.display());
    println!();

    for (name, installed) in &entries {
        let status = if *installed { "✓" } else { "✗" };
        let info = ARTIFACTS.iter().find(|a| a.name == name);
        let filename = info.map_or("unknown", |a| a.filename);
        println!("  {status} {name} ({filename})");
    }

    println!();
    let installed_count = entries.iter().filter(|(_, installed)| *installed).count();
    println!("{}/{} checkpoints installed", installed_count, entries.len());

    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn print_path() -> Result<()> {
    println!("{}", artifacts::artifacts_dir().display());
    Ok(())
}
