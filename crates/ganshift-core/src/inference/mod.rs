//! Inference engine built on Candle.
//!
//! Checkpoints are safetensors files holding the weights of a small residual
//! encoder/decoder generator. Both translation directions are loaded eagerly
//! at startup and held for the process lifetime.

mod device;
mod generator;
mod loader;
mod store;

pub use device::get_device;
pub use generator::ResnetGenerator;
pub use loader::load_safetensors;
pub use store::ModelStore;
