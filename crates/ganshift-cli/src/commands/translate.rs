//! Translate command - one-shot image translation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use ganshift_adapters::artifacts;
use ganshift_adapters::uploads;
use ganshift_core::{Direction, Translator};
use image::DynamicImage;
use tracing::info;

use super::{apply_models_dir, open_store, parse_direction};
use crate::config::AppConfig;

/// Arguments for the translate command
#[derive(Args)]
pub struct TranslateArgs {
    /// First image; this is the one that gets translated
    pub image_a: PathBuf,

    /// Second image; decoded and validated, but not transformed
    pub image_b: PathBuf,

    /// Output path for the translated image
    #[arg(short, long, default_value = "translated.png")]
    pub output: PathBuf,

    /// Translation direction (forward|reverse)
    #[arg(long, value_parser = parse_direction)]
    pub direction: Option<Direction>,

    /// Custom artifacts directory (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,
}

/// Run the translate command.
///
/// Requires checkpoints to already be present; a batch invocation should
/// never block on a surprise download. `ganshift models fetch` gets them.
pub fn run(args: &TranslateArgs, config: &AppConfig) -> Result<()> {
    apply_models_dir(args.models_dir.as_ref(), config);

    let missing = artifacts::missing_artifacts();
    if !missing.is_empty() {
        bail!(
            "Missing checkpoints: {}. Run `ganshift models fetch` first.",
            missing.join(", ")
        );
    }

    let direction = args.direction.unwrap_or_else(|| config.direction());

    let store = open_store()?;
    let translator = Translator::new(store);

    let image_a = load_image(&args.image_a)?;
    // Both inputs must decode, matching the upload shell; only A is used.
    let _image_b = load_image(&args.image_b)?;

    info!("Translating {} ({direction})", args.image_a.display());
    let translated = translator.translate(&image_a, direction)?;

    image::DynamicImage::ImageRgb8(translated)
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("Wrote {}", args.output.display());
    Ok(())
}

fn load_image(path: &Path) -> Result<DynamicImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    uploads::decode_upload(&bytes, path.file_name().and_then(|n| n.to_str()))
}
