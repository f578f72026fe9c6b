//! Model store - owns both loaded generators for the process lifetime.

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::Device;
use tracing::info;

use super::{get_device, load_safetensors, ResnetGenerator};
use crate::domain::Direction;
use crate::ports::Generator;

/// Holds the two loaded generators and routes by [`Direction`].
///
/// Construction is the only place models are deserialized: both checkpoints
/// are loaded eagerly and any failure aborts construction, so a store that
/// exists is a store that can translate. No reloading or eviction afterwards.
pub struct ModelStore {
    device: Device,
    forward: Box<dyn Generator>,
    reverse: Box<dyn Generator>,
}

impl ModelStore {
    /// Loads both generators from their checkpoint files.
    ///
    /// # Errors
    ///
    /// Returns an error if either checkpoint cannot be read, parsed, or does
    /// not describe the generator network.
    pub fn open(forward_path: &Path, reverse_path: &Path) -> Result<Self> {
        let device = get_device();
        let forward = load_generator(forward_path, &device)?;
        let reverse = load_generator(reverse_path, &device)?;
        Ok(Self {
            device,
            forward,
            reverse,
        })
    }

    /// Builds a store from pre-constructed generators (CPU device).
    ///
    /// Intended for tests and embedding scenarios where checkpoints are not
    /// loaded from disk.
    #[must_use]
    pub fn from_generators(forward: Box<dyn Generator>, reverse: Box<dyn Generator>) -> Self {
        Self {
            device: Device::Cpu,
            forward,
            reverse,
        }
    }

    /// Returns the generator handling the given direction.
    #[must_use]
    pub fn generator(&self, direction: Direction) -> &dyn Generator {
        match direction {
            Direction::Forward => self.forward.as_ref(),
            Direction::Reverse => self.reverse.as_ref(),
        }
    }

    /// Device the generators run on.
    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }
}

fn load_generator(path: &Path, device: &Device) -> Result<Box<dyn Generator>> {
    let vb = load_safetensors(path, device)
        .with_context(|| format!("Failed to load checkpoint: {}", path.display()))?;
    let generator = ResnetGenerator::new(vb)
        .with_context(|| format!("Checkpoint is not a generator: {}", path.display()))?;
    info!("Loaded generator from {}", path.display());
    Ok(Box::new(generator))
}
