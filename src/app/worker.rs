//! Background generation.
//!
//! Each request runs on its own short-lived thread; results come back over a
//! channel that the event loop drains without blocking.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use crate::app::Message;
use crate::app::model::GenerateRequest;
use crate::generator::ContentGenerator;

pub(super) struct GenerationWorker {
    generator: Arc<dyn ContentGenerator>,
    tx: Sender<Message>,
    rx: Receiver<Message>,
}

impl GenerationWorker {
    pub(super) fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { generator, tx, rx }
    }

    /// Start `request` on a new thread.
    ///
    /// # Errors
    /// Returns an error if the thread cannot be spawned.
    pub(super) fn spawn(&self, request: GenerateRequest) -> std::io::Result<()> {
        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();
        std::thread::Builder::new()
            .name(format!("generate-{}", request.id))
            .spawn(move || {
                let result = run_request(generator.as_ref(), &request);
                // The receiver is gone only when the app is shutting down.
                let _ = tx.send(Message::GenerationFinished {
                    id: request.id,
                    result,
                });
            })?;
        Ok(())
    }

    /// Next finished result, if any.
    pub(super) fn try_recv(&self) -> Option<Message> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next result. Used by tests.
    #[cfg(test)]
    pub(super) fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Message> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Run one request on the calling thread.
///
/// Failures are reported through `tracing` and the debug event log, never
/// printed directly, since the TUI owns the terminal.
pub(super) fn run_request(
    generator: &dyn ContentGenerator,
    request: &GenerateRequest,
) -> Result<String, String> {
    let started = Instant::now();
    crate::perf::log_event(
        "generate.start",
        format!("id={} topic={:?} mode={}", request.id, request.topic, request.mode),
    );
    let result = generator
        .generate(&request.topic, request.mode, &request.concept)
        .map_err(|err| {
            tracing::warn!(id = request.id, error = %err, "generation failed");
            err.to_string()
        });
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match &result {
        Ok(_) => crate::perf::log_event(
            "generate.finish",
            format!("id={} ok=true elapsed_ms={elapsed_ms:.1}", request.id),
        ),
        Err(err) => crate::perf::log_event(
            "generate.finish",
            format!("id={} ok=false elapsed_ms={elapsed_ms:.1} error={err}", request.id),
        ),
    }
    result
}
