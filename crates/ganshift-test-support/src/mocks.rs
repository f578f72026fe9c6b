//! Mock implementations of the generator port.

use std::sync::{Arc, Mutex};

use candle_core::{Device, Tensor};
use ganshift_core::ports::Generator;

/// Generator that returns a constant-valued tensor of the input's shape.
///
/// Records every input shape it sees for assertions.
pub struct ConstantGenerator {
    value: f32,
    shapes: Arc<Mutex<Vec<Vec<usize>>>>,
}

impl ConstantGenerator {
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self {
            value,
            shapes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the recorded input shapes, in call order.
    #[must_use]
    pub fn input_shapes(&self) -> Arc<Mutex<Vec<Vec<usize>>>> {
        Arc::clone(&self.shapes)
    }

    /// Number of forward calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.shapes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

impl Generator for ConstantGenerator {
    fn forward(&self, input: &Tensor) -> anyhow::Result<Tensor> {
        self.shapes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(input.dims().to_vec());
        Ok(Tensor::full(self.value, input.dims(), &Device::Cpu)?)
    }
}

/// Generator that returns its input unchanged.
pub struct IdentityGenerator;

impl Generator for IdentityGenerator {
    fn forward(&self, input: &Tensor) -> anyhow::Result<Tensor> {
        Ok(input.clone())
    }
}
