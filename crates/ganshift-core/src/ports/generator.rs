//! Generator port - the single capability the pipeline depends on.

use candle_core::Tensor;

/// A loaded generative model, reduced to its one useful operation.
///
/// Implementations take a batched image tensor of shape
/// `(batch, channels, height, width)` and return a tensor of the same shape.
/// Everything else about the underlying network is opaque to callers.
pub trait Generator: Send + Sync {
    /// Runs one forward pass over an already-batched input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input shape is incompatible with the network
    /// or the forward pass itself fails.
    fn forward(&self, input: &Tensor) -> anyhow::Result<Tensor>;
}
