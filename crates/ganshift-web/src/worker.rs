//! Inference worker - owns the translator, drains the job channel.

use std::thread::JoinHandle;

use ganshift_core::Translator;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::state::TranslateJob;

/// Spawns the worker thread.
///
/// The thread owns the [`Translator`] (and with it both loaded generators)
/// and processes jobs one at a time until every sender is dropped. A failed
/// translation is sent back as an error string; the models stay loaded.
pub fn spawn_worker(
    translator: Translator,
    mut job_rx: mpsc::Receiver<TranslateJob>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        while let Some(job) = job_rx.blocking_recv() {
            let result = translator
                .translate(&job.image, job.direction)
                .map_err(|e| format!("{e:#}"));
            if job.reply.send(result).is_err() {
                warn!("Translation finished after the request was dropped");
            }
        }
        debug!("Inference worker shutting down");
    })
}
