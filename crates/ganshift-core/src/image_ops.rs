//! Image/tensor conversion for the translation pipeline.
//!
//! Every submitted image is normalized to a fixed 256x256 RGB frame before it
//! reaches a generator, and every generator output is mapped back to an 8-bit
//! RGB image. The output mapping assumes the network's final activation
//! produces values in `[0, 1]`; values outside that range are clamped.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use anyhow::{ensure, Context, Result};
use candle_core::{Device, Tensor};
use image::{DynamicImage, Rgb, RgbImage};

use crate::domain::{CHANNELS, IMAGE_SIZE};

/// Converts an image of arbitrary dimensions into a `(3, 256, 256)` tensor.
///
/// The image is resized (not cropped or padded) with Lanczos3 filtering,
/// converted to RGB (grayscale and alpha inputs are converted, not rejected),
/// and scaled to `f32` values in `[0, 1]`, channel-first.
///
/// # Errors
///
/// Returns an error if tensor creation fails.
pub fn to_tensor(image: &DynamicImage, device: &Device) -> Result<Tensor> {
    let side = IMAGE_SIZE as u32;
    let resized = image.resize_exact(side, side, image::imageops::FilterType::Lanczos3);
    let rgb = resized.to_rgb8();

    let mut data = vec![0f32; CHANNELS * IMAGE_SIZE * IMAGE_SIZE];
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for c in 0..CHANNELS {
            data[c * IMAGE_SIZE * IMAGE_SIZE + y * IMAGE_SIZE + x] =
                f32::from(pixel[c]) / 255.0;
        }
    }

    Tensor::from_vec(data, (CHANNELS, IMAGE_SIZE, IMAGE_SIZE), device)
        .context("Failed to create input tensor")
}

/// Converts a `(3, 256, 256)` tensor with values in `[0, 1]` into an RGB image.
///
/// Values are scaled by 255, rounded, and clamped into u8 range per channel.
///
/// # Errors
///
/// Returns an error if the tensor does not have the expected shape or its
/// data cannot be read back.
pub fn to_image(tensor: &Tensor) -> Result<RgbImage> {
    ensure!(
        tensor.dims() == [CHANNELS, IMAGE_SIZE, IMAGE_SIZE],
        "Unexpected output shape {:?}, wanted ({CHANNELS}, {IMAGE_SIZE}, {IMAGE_SIZE})",
        tensor.dims()
    );

    let data = tensor
        .to_vec3::<f32>()
        .context("Failed to read output tensor")?;

    let side = IMAGE_SIZE as u32;
    Ok(RgbImage::from_fn(side, side, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([
            to_u8(data[0][y][x]),
            to_u8(data[1][y][x]),
            to_u8(data[2][y][x]),
        ])
    }))
}

fn to_u8(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
