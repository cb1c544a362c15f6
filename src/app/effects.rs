use std::io::{Write, stdout};

use base64::Engine;

use crate::app::model::ContentState;
use crate::app::{Message, Model, ToastLevel};

use super::worker::GenerationWorker;

pub(super) fn handle_message_side_effects(
    model: &mut Model,
    worker: &GenerationWorker,
    msg: &Message,
) {
    match msg {
        Message::Generate => {
            let Some(request) = model.pending_request.take() else {
                return;
            };
            let id = request.id;
            if let Err(err) = worker.spawn(request) {
                tracing::error!(id, error = %err, "failed to start generation thread");
                model.state = ContentState::Error(
                    crate::app::model::GENERATION_FAILED_MESSAGE.to_string(),
                );
            }
        }
        Message::CopyContent => copy_content(model),
        Message::GenerationFinished { id, result: Ok(text) } => {
            crate::perf::log_event(
                "content.ready",
                format!("id={id} bytes={} lines={}", text.len(), model.document.line_count()),
            );
        }
        _ => {}
    }
}

fn copy_content(model: &mut Model) {
    let text = model.document.source();
    if model.state != ContentState::Ready || text.trim().is_empty() {
        model.show_toast(ToastLevel::Warning, "Nothing to copy yet");
        return;
    }
    let bytes = text.len();
    match copy_to_clipboard_osc52(text) {
        Ok(()) => model.show_toast(ToastLevel::Info, format!("Copied {bytes} bytes")),
        Err(err) => model.show_toast(ToastLevel::Error, format!("Copy failed: {err}")),
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

pub(super) fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
