//! Ganshift Core - Translation domain and inference engine
//!
//! This crate contains the core domain types, the generator port, the
//! image/tensor adapter, and the translation pipeline built on Candle.

pub mod domain;
pub mod image_ops;
pub mod inference;
pub mod pipeline;
pub mod ports;

pub use domain::{Direction, CHANNELS, IMAGE_SIZE};
pub use inference::ModelStore;
pub use pipeline::Translator;
pub use ports::Generator;
