//! Synthetic fixtures: images with known content and loadable checkpoints.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use ganshift_core::inference::ResnetGenerator;
use image::{DynamicImage, Rgb, RgbImage};
use safetensors::serialize;
use safetensors::tensor::TensorView;

/// Creates a single-color RGB image.
#[must_use]
pub fn uniform_rgb(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
}

/// Creates an RGB image with a horizontal red and vertical green gradient.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
        let g = ((u32::from(u8::MAX) * y) / height.max(1)) as u8;
        Rgb([r, g, 128])
    });
    DynamicImage::ImageRgb8(img)
}

/// Writes a loadable generator checkpoint with synthetic weights.
///
/// Tensor names and shapes come from [`ResnetGenerator::weight_spec`], so a
/// file written here always loads into the real network. Values are small,
/// deterministic, and vary per element; they produce garbage translations
/// but valid `[0, 1]` outputs.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn write_generator_weights(path: &Path) -> Result<()> {
    let spec = ResnetGenerator::weight_spec();

    // Keep the raw buffers alive until serialize copies them out.
    let buffers: Vec<(String, Vec<usize>, Vec<u8>)> = spec
        .into_iter()
        .map(|(name, shape)| {
            let len: usize = shape.iter().product();
            let values: Vec<f32> = (0..len)
                .map(|i| ((i % 17) as f32 - 8.0) * 0.01)
                .collect();
            let bytes: Vec<u8> = bytemuck::cast_slice(&values).to_vec();
            (name.to_string(), shape, bytes)
        })
        .collect();

    let mut tensors: HashMap<String, TensorView<'_>> = HashMap::new();
    for (name, shape, bytes) in &buffers {
        let view = TensorView::new(safetensors::Dtype::F32, shape.clone(), bytes)
            .with_context(|| format!("Invalid synthetic tensor '{name}'"))?;
        tensors.insert(name.clone(), view);
    }

    let serialized = serialize(&tensors, &None).context("Failed to serialize checkpoint")?;
    std::fs::write(path, serialized)
        .with_context(|| format!("Failed to write checkpoint: {}", path.display()))
}
