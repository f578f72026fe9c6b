//! Serve command - run the web upload shell.
//!
//! Startup sequence: fetch absent checkpoints, re-verify presence, load both
//! generators, then bind. Any failure before bind is fatal; after that,
//! failures are per-request.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use ganshift_adapters::artifacts;
use ganshift_core::{Direction, Translator};
use ganshift_web::AppState;
use tokio::sync::mpsc;
use tracing::info;

use super::{apply_models_dir, open_store, parse_direction};
use crate::config::AppConfig;

/// Pending translation jobs before the shell pushes back.
const JOB_QUEUE_DEPTH: usize = 16;

/// Arguments for the serve command
#[derive(Args)]
pub struct ServeArgs {
    /// Bind address
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port
    #[arg(long)]
    pub port: Option<u16>,

    /// Translation direction applied to every upload (forward|reverse)
    #[arg(long, value_parser = parse_direction)]
    pub direction: Option<Direction>,

    /// Custom artifacts directory (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,
}

/// Run the serve command.
pub fn run(args: &ServeArgs, config: &AppConfig) -> Result<()> {
    apply_models_dir(args.models_dir.as_ref(), config);

    artifacts::ensure_artifacts()?;

    let missing = artifacts::missing_artifacts();
    if !missing.is_empty() {
        bail!("Checkpoints missing after fetch: {}", missing.join(", "));
    }
    info!("All checkpoints present");

    let store = open_store()?;
    let translator = Translator::new(store);

    let direction = args.direction.unwrap_or_else(|| config.direction());
    let host = args
        .host
        .clone()
        .or_else(|| config.server.host.clone())
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = args.port.or(config.server.port).unwrap_or(8080);

    let (job_tx, job_rx) = mpsc::channel(JOB_QUEUE_DEPTH);
    ganshift_web::spawn_worker(translator, job_rx);

    let state = Arc::new(AppState { job_tx, direction });
    let addr = format!("{host}:{port}");
    info!("Starting upload shell on {addr} (route: {direction})");

    tokio::runtime::Runtime::new()
        .context("Failed to start async runtime")?
        .block_on(ganshift_web::serve(&addr, state))
}
