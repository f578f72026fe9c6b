//! Residual encoder/decoder generator network.
//!
//! A compact image-to-image generator: a 7x7 stem, two strided downsampling
//! convolutions, two residual blocks at the bottleneck, nearest-neighbor
//! upsampling back to full resolution, and a 7x7 projection with a sigmoid so
//! outputs land in `[0, 1]`. Fully convolutional: spatial dimensions of the
//! input are preserved as long as they are divisible by 4.

use anyhow::{ensure, Context, Result};
use candle_core::{Module, Tensor};
use candle_nn::{conv2d, Conv2d, Conv2dConfig, VarBuilder};

use crate::ports::Generator;

/// Channel count after the stem; doubled at each downsampling stage.
const BASE_CHANNELS: usize = 16;

/// Two 3x3 convolutions with a skip connection, constant channel count.
struct ResidualBlock {
    c1: Conv2d,
    c2: Conv2d,
}

impl ResidualBlock {
    fn new(channels: usize, vb: VarBuilder) -> Result<Self> {
        let cfg = Conv2dConfig {
            padding: 1,
            ..Conv2dConfig::default()
        };
        let c1 = conv2d(channels, channels, 3, cfg, vb.pp("c1"))?;
        let c2 = conv2d(channels, channels, 3, cfg, vb.pp("c2"))?;
        Ok(Self { c1, c2 })
    }

    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let ys = self.c1.forward(xs)?.relu()?;
        let ys = self.c2.forward(&ys)?;
        xs + ys
    }
}

/// Generator network for one translation direction.
pub struct ResnetGenerator {
    init: Conv2d,
    down1: Conv2d,
    down2: Conv2d,
    res1: ResidualBlock,
    res2: ResidualBlock,
    up1: Conv2d,
    up2: Conv2d,
    out: Conv2d,
}

impl ResnetGenerator {
    /// Builds the network from checkpoint weights.
    ///
    /// # Errors
    ///
    /// Returns an error if a required tensor is missing from the checkpoint
    /// or has the wrong shape.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let stem_cfg = Conv2dConfig {
            padding: 3,
            ..Conv2dConfig::default()
        };
        let down_cfg = Conv2dConfig {
            padding: 1,
            stride: 2,
            ..Conv2dConfig::default()
        };
        let up_cfg = Conv2dConfig {
            padding: 1,
            ..Conv2dConfig::default()
        };

        let init = conv2d(3, BASE_CHANNELS, 7, stem_cfg, vb.pp("init"))?;
        let down1 = conv2d(BASE_CHANNELS, BASE_CHANNELS * 2, 3, down_cfg, vb.pp("down1"))?;
        let down2 = conv2d(BASE_CHANNELS * 2, BASE_CHANNELS * 4, 3, down_cfg, vb.pp("down2"))?;
        let res1 = ResidualBlock::new(BASE_CHANNELS * 4, vb.pp("res1"))?;
        let res2 = ResidualBlock::new(BASE_CHANNELS * 4, vb.pp("res2"))?;
        let up1 = conv2d(BASE_CHANNELS * 4, BASE_CHANNELS * 2, 3, up_cfg, vb.pp("up1"))?;
        let up2 = conv2d(BASE_CHANNELS * 2, BASE_CHANNELS, 3, up_cfg, vb.pp("up2"))?;
        let out = conv2d(BASE_CHANNELS, 3, 7, stem_cfg, vb.pp("out"))?;

        Ok(Self {
            init,
            down1,
            down2,
            res1,
            res2,
            up1,
            up2,
            out,
        })
    }

    /// Tensor names and shapes a checkpoint must provide for this network.
    ///
    /// Used by tooling that inspects or synthesizes checkpoints.
    #[must_use]
    pub fn weight_spec() -> Vec<(&'static str, Vec<usize>)> {
        let b = BASE_CHANNELS;
        vec![
            ("init.weight", vec![b, 3, 7, 7]),
            ("init.bias", vec![b]),
            ("down1.weight", vec![b * 2, b, 3, 3]),
            ("down1.bias", vec![b * 2]),
            ("down2.weight", vec![b * 4, b * 2, 3, 3]),
            ("down2.bias", vec![b * 4]),
            ("res1.c1.weight", vec![b * 4, b * 4, 3, 3]),
            ("res1.c1.bias", vec![b * 4]),
            ("res1.c2.weight", vec![b * 4, b * 4, 3, 3]),
            ("res1.c2.bias", vec![b * 4]),
            ("res2.c1.weight", vec![b * 4, b * 4, 3, 3]),
            ("res2.c1.bias", vec![b * 4]),
            ("res2.c2.weight", vec![b * 4, b * 4, 3, 3]),
            ("res2.c2.bias", vec![b * 4]),
            ("up1.weight", vec![b * 2, b * 4, 3, 3]),
            ("up1.bias", vec![b * 2]),
            ("up2.weight", vec![b, b * 2, 3, 3]),
            ("up2.bias", vec![b]),
            ("out.weight", vec![3, b, 7, 7]),
            ("out.bias", vec![3]),
        ]
    }
}

impl Module for ResnetGenerator {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self.init.forward(xs)?.relu()?;
        let xs = self.down1.forward(&xs)?.relu()?;
        let xs = self.down2.forward(&xs)?.relu()?;

        let xs = self.res1.forward(&xs)?;
        let xs = self.res2.forward(&xs)?;

        let (_, _, h, w) = xs.dims4()?;
        let xs = xs.upsample_nearest2d(h * 2, w * 2)?;
        let xs = self.up1.forward(&xs)?.relu()?;

        let (_, _, h, w) = xs.dims4()?;
        let xs = xs.upsample_nearest2d(h * 2, w * 2)?;
        let xs = self.up2.forward(&xs)?.relu()?;

        let xs = self.out.forward(&xs)?;
        candle_nn::ops::sigmoid(&xs)
    }
}

impl Generator for ResnetGenerator {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        ensure!(
            input.dims().len() == 4,
            "Generator input must be batched (rank 4), got shape {:?}",
            input.dims()
        );
        Module::forward(self, input).context("Generator forward pass failed")
    }
}
