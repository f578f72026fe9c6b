//! Shared server state and the worker job type.

use std::sync::Arc;

use ganshift_core::Direction;
use image::{DynamicImage, RgbImage};
use tokio::sync::{mpsc, oneshot};

/// One translation request handed to the inference worker.
pub struct TranslateJob {
    /// Decoded upload to translate.
    pub image: DynamicImage,
    /// Routing for this job.
    pub direction: Direction,
    /// Channel the worker answers on; errors are already rendered.
    pub reply: oneshot::Sender<Result<RgbImage, String>>,
}

/// Shared server state.
pub struct AppState {
    /// Sender feeding the inference worker.
    pub job_tx: mpsc::Sender<TranslateJob>,
    /// The fixed demo route applied to every request.
    pub direction: Direction,
}

pub type SharedState = Arc<AppState>;
