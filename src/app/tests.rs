use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyCode, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use tracing_subscriber::EnvFilter;

use crate::generator::{ContentGenerator, FixtureGenerator, GenerateError, RevisionMode};
use crate::logging::{self, LogTarget};

use super::effects::osc52_sequence;
use super::event_loop::{ResizeDebouncer, dispatch};
use super::input::{handle_event, handle_key, handle_mouse};
use super::worker::{GenerationWorker, run_request};
use super::{
    App, ContentState, Focus, GENERATION_FAILED_MESSAGE, GenerateRequest, Message, Model,
    ToastLevel, VALIDATION_MESSAGE, update,
};

const FIXTURE: &str = "## Enzymes\n* Lower activation energy\n\n**Induced fit** model\nANSWER: the active site";

struct FailingGenerator;

impl ContentGenerator for FailingGenerator {
    fn generate(
        &self,
        _topic: &str,
        _mode: RevisionMode,
        _detail: &str,
    ) -> Result<String, GenerateError> {
        Err(GenerateError::Http {
            status: 403,
            message: "API key not valid".to_string(),
        })
    }
}

fn key(code: KeyCode) -> event::KeyEvent {
    event::KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> event::KeyEvent {
    event::KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn create_test_model() -> Model {
    Model::new((80, 24))
}

fn create_ready_model(text: &str) -> Model {
    let model = update(create_test_model(), Message::Generate);
    let id = model.request_id;
    update(
        model,
        Message::GenerationFinished {
            id,
            result: Ok(text.to_string()),
        },
    )
}

fn create_long_ready_model() -> Model {
    let mut text = String::from("# Cells\n");
    for i in 1..=50 {
        text.push_str(&format!("Line {i} of content.\n"));
    }
    create_ready_model(&text)
}

// ==================== update ====================

#[test]
fn test_default_model_selects_first_topic() {
    let model = create_test_model();
    assert_eq!(model.topic(), "Biological molecules");
    assert_eq!(model.mode, RevisionMode::Summary);
    assert_eq!(model.focus, Focus::Topics);
    assert_eq!(model.state, ContentState::Empty);
}

#[test]
fn test_topic_selection_is_clamped() {
    let model = update(create_test_model(), Message::TopicUp);
    assert_eq!(model.selected_topic, 0);

    let mut model = model;
    for _ in 0..20 {
        model = update(model, Message::TopicDown);
    }
    assert_eq!(model.selected_topic, model.topics.len() - 1);

    let model = update(model, Message::SelectTopic(99));
    assert_eq!(model.selected_topic, model.topics.len() - 1);
    let model = update(model, Message::SelectTopic(1));
    assert_eq!(model.topic(), "Cells");
}

#[test]
fn test_generate_starts_request() {
    let model = update(create_test_model(), Message::Generate);
    assert!(model.is_loading());
    let request = model.pending_request.clone().expect("request queued");
    assert_eq!(request.id, 1);
    assert_eq!(request.topic, "Biological molecules");
    assert_eq!(request.mode, RevisionMode::Summary);
}

#[test]
fn test_generate_while_loading_is_ignored() {
    let mut model = update(create_test_model(), Message::Generate);
    model.pending_request = None;
    let model = update(model, Message::Generate);
    assert_eq!(model.request_id, 1);
    assert!(model.pending_request.is_none());
}

#[test]
fn test_explain_without_concept_is_rejected() {
    let model = update(create_test_model(), Message::SetMode(RevisionMode::Explain));
    let model = update(model, Message::ConceptInput("   ".to_string()));
    let model = update(model, Message::Generate);
    assert_eq!(model.state, ContentState::Error(VALIDATION_MESSAGE.to_string()));
    assert!(model.pending_request.is_none());
    assert_eq!(model.request_id, 0);
}

#[test]
fn test_explain_request_carries_trimmed_concept() {
    let model = update(create_test_model(), Message::SetMode(RevisionMode::Explain));
    let model = update(model, Message::ConceptInput("  osmosis ".to_string()));
    let model = update(model, Message::Generate);
    let request = model.pending_request.expect("request queued");
    assert_eq!(request.concept, "osmosis");
    assert_eq!(request.mode, RevisionMode::Explain);
}

#[test]
fn test_finished_result_loads_document() {
    let model = create_ready_model(FIXTURE);
    assert_eq!(model.state, ContentState::Ready);
    assert_eq!(model.document.source(), FIXTURE);
    assert_eq!(model.viewport.total_lines(), model.document.line_count());
    assert_eq!(model.viewport.offset(), 0);
}

#[test]
fn test_failed_result_shows_generic_message() {
    let model = update(create_test_model(), Message::Generate);
    let model = update(
        model,
        Message::GenerationFinished {
            id: 1,
            result: Err("HTTP 500: boom".to_string()),
        },
    );
    assert_eq!(
        model.state,
        ContentState::Error(GENERATION_FAILED_MESSAGE.to_string())
    );
}

#[test]
fn test_stale_result_is_dropped() {
    let model = update(create_test_model(), Message::Generate);
    let model = update(
        model,
        Message::GenerationFinished {
            id: 7,
            result: Ok("old".to_string()),
        },
    );
    assert!(model.is_loading());
    assert!(model.document.is_empty());
}

#[test]
fn test_new_result_replaces_previous_content() {
    let model = create_ready_model("first");
    let model = update(model, Message::Generate);
    assert_eq!(model.request_id, 2);
    let model = update(
        model,
        Message::GenerationFinished {
            id: 2,
            result: Ok("second".to_string()),
        },
    );
    assert_eq!(model.document.source(), "second");
}

#[test]
fn test_tick_only_spins_while_loading() {
    let model = update(create_test_model(), Message::Tick);
    assert_eq!(model.spinner_frame, 0);
    let model = update(model, Message::Generate);
    let model = update(model, Message::Tick);
    let model = update(model, Message::Tick);
    assert_eq!(model.spinner_frame, 2);
}

#[test]
fn test_focus_cycle_skips_concept_outside_explain() {
    let model = update(create_test_model(), Message::FocusNext);
    assert_eq!(model.focus, Focus::Content);
    let model = update(model, Message::FocusNext);
    assert_eq!(model.focus, Focus::Topics);
    let model = update(model, Message::FocusPrev);
    assert_eq!(model.focus, Focus::Content);
}

#[test]
fn test_focus_cycle_includes_concept_in_explain() {
    let model = update(create_test_model(), Message::SetMode(RevisionMode::Explain));
    assert_eq!(model.focus, Focus::Concept);
    let model = update(model, Message::FocusNext);
    assert_eq!(model.focus, Focus::Content);
    let model = update(model, Message::FocusNext);
    assert_eq!(model.focus, Focus::Topics);
    let model = update(model, Message::FocusNext);
    assert_eq!(model.focus, Focus::Concept);
}

#[test]
fn test_leaving_explain_moves_focus_off_concept() {
    let model = update(create_test_model(), Message::SetMode(RevisionMode::Explain));
    let model = update(model, Message::SetMode(RevisionMode::Questions));
    assert_eq!(model.focus, Focus::Topics);
    assert!(!model.concept_visible());
}

#[test]
fn test_scroll_down_updates_viewport() {
    let model = create_long_ready_model();
    let model = update(model, Message::ScrollDown(5));
    assert_eq!(model.viewport.offset(), 5);
    let model = update(model, Message::ScrollUp(3));
    assert_eq!(model.viewport.offset(), 2);
}

#[test]
fn test_go_to_bottom_then_top() {
    let model = update(create_long_ready_model(), Message::GoToBottom);
    assert!(!model.viewport.can_scroll_down());
    let model = update(model, Message::GoToTop);
    assert_eq!(model.viewport.offset(), 0);
}

#[test]
fn test_resize_rewraps_document() {
    let text = "word ".repeat(60);
    let model = create_ready_model(&text);
    let wide_lines = model.document.line_count();
    let model = update(model, Message::Resize(50, 24));
    assert!(model.document.line_count() > wide_lines);
    assert_eq!(model.viewport.total_lines(), model.document.line_count());
    assert_eq!(model.viewport.width(), crate::ui::content_width(50));
}

#[test]
fn test_wrap_width_caps_layout() {
    let mut model = create_test_model();
    model.wrap_width = Some(20);
    let model = update(model, Message::Generate);
    let model = update(
        model,
        Message::GenerationFinished {
            id: 1,
            result: Ok("word ".repeat(20)),
        },
    );
    assert_eq!(model.document.width(), 20);
    assert!(model.document.lines().iter().all(|l| l.content().len() <= 20));
}

#[test]
fn test_toggle_help_and_quit() {
    let model = update(create_test_model(), Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

// ==================== input ====================

#[test]
fn test_topics_keys() {
    let model = create_test_model();
    assert_eq!(handle_key(key(KeyCode::Char('j')), &model), Some(Message::TopicDown));
    assert_eq!(handle_key(key(KeyCode::Up), &model), Some(Message::TopicUp));
    assert_eq!(handle_key(key(KeyCode::Enter), &model), Some(Message::Generate));
    assert_eq!(handle_key(key(KeyCode::Char('g')), &model), Some(Message::Generate));
    assert_eq!(
        handle_key(key(KeyCode::End), &model),
        Some(Message::SelectTopic(model.topics.len() - 1))
    );
}

#[test]
fn test_mode_keys() {
    let model = create_test_model();
    assert_eq!(
        handle_key(key(KeyCode::Char('2')), &model),
        Some(Message::SetMode(RevisionMode::Questions))
    );
    assert_eq!(
        handle_key(
            event::KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT),
            &model
        ),
        Some(Message::SetMode(RevisionMode::Questions))
    );
    assert_eq!(
        handle_key(key(KeyCode::Char('e')), &model),
        Some(Message::SetMode(RevisionMode::Explain))
    );
    assert_eq!(
        handle_key(key(KeyCode::Char('s')), &model),
        Some(Message::SetMode(RevisionMode::Summary))
    );
}

#[test]
fn test_concept_focus_types_text() {
    let mut model = update(create_test_model(), Message::SetMode(RevisionMode::Explain));
    model.concept = "osmo".to_string();
    assert_eq!(
        handle_key(key(KeyCode::Char('s')), &model),
        Some(Message::ConceptInput("osmos".to_string()))
    );
    // Letters that are shortcuts elsewhere are plain text here.
    assert_eq!(
        handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::ConceptInput("osmoq".to_string()))
    );
    assert_eq!(
        handle_key(key(KeyCode::Backspace), &model),
        Some(Message::ConceptInput("osm".to_string()))
    );
    assert_eq!(handle_key(ctrl('u'), &model), Some(Message::ConceptInput(String::new())));
    assert_eq!(handle_key(key(KeyCode::Enter), &model), Some(Message::Generate));
    assert_eq!(handle_key(key(KeyCode::Esc), &model), Some(Message::FocusPrev));
}

#[test]
fn test_content_focus_scroll_keys() {
    let mut model = create_long_ready_model();
    model.focus = Focus::Content;
    assert_eq!(handle_key(key(KeyCode::Char('j')), &model), Some(Message::ScrollDown(1)));
    // Already at the top.
    assert_eq!(handle_key(key(KeyCode::Char('k')), &model), None);
    assert_eq!(handle_key(key(KeyCode::Char(' ')), &model), Some(Message::PageDown));
    assert_eq!(handle_key(ctrl('d'), &model), Some(Message::HalfPageDown));
    assert_eq!(handle_key(key(KeyCode::Char('G')), &model), Some(Message::GoToBottom));
    assert_eq!(handle_key(key(KeyCode::Char('g')), &model), Some(Message::GoToTop));
}

#[test]
fn test_global_keys() {
    let model = create_test_model();
    assert_eq!(handle_key(ctrl('c'), &model), Some(Message::Quit));
    assert_eq!(handle_key(key(KeyCode::Char('q')), &model), Some(Message::Quit));
    assert_eq!(handle_key(key(KeyCode::Char('?')), &model), Some(Message::ToggleHelp));
    assert_eq!(handle_key(key(KeyCode::Char('y')), &model), Some(Message::CopyContent));
    assert_eq!(handle_key(key(KeyCode::Tab), &model), Some(Message::FocusNext));
}

#[test]
fn test_any_key_closes_help() {
    let model = update(create_test_model(), Message::ToggleHelp);
    assert_eq!(handle_key(key(KeyCode::Char('x')), &model), Some(Message::HideHelp));
    assert_eq!(handle_key(ctrl('c'), &model), Some(Message::Quit));
}

#[test]
fn test_key_release_is_ignored() {
    let model = create_test_model();
    let mut debouncer = ResizeDebouncer::new(100);
    let mut release = key(KeyCode::Char('q'));
    release.kind = KeyEventKind::Release;
    assert_eq!(
        handle_event(&event::Event::Key(release), &model, 0, &mut debouncer),
        None
    );
}

#[test]
fn test_mouse_wheel_scrolls_content() {
    let model = create_long_ready_model();
    let wheel = |kind: MouseEventKind| MouseEvent {
        kind,
        column: 40,
        row: 5,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
        handle_mouse(wheel(MouseEventKind::ScrollDown), &model),
        Some(Message::ScrollDown(3))
    );
    assert_eq!(handle_mouse(wheel(MouseEventKind::ScrollUp), &model), None);
}

#[test]
fn test_resize_event_is_debounced() {
    let model = create_test_model();
    let mut debouncer = ResizeDebouncer::new(100);
    assert_eq!(
        handle_event(&event::Event::Resize(120, 40), &model, 10, &mut debouncer),
        None
    );
    assert!(debouncer.is_pending());
    assert_eq!(debouncer.take_ready(50), None);
    debouncer.queue(100, 30, 60);
    assert_eq!(debouncer.take_ready(159), None);
    assert_eq!(debouncer.take_ready(160), Some((100, 30)));
    assert!(!debouncer.is_pending());
}

// ==================== effects and worker ====================

#[test]
fn test_osc52_sequence_encodes_base64() {
    assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
}

#[test]
fn test_copy_without_content_warns() {
    let worker = GenerationWorker::new(Arc::new(FixtureGenerator::new(FIXTURE)));
    let mut model = create_test_model();
    dispatch(&mut model, &worker, Message::CopyContent);
    assert_eq!(
        model.active_toast(),
        Some(("Nothing to copy yet", ToastLevel::Warning))
    );
}

#[test]
fn test_toast_expires() {
    let worker = GenerationWorker::new(Arc::new(FixtureGenerator::new(FIXTURE)));
    let mut model = create_test_model();
    dispatch(&mut model, &worker, Message::CopyContent);
    assert!(!model.expire_toast(Instant::now()));
    assert!(model.expire_toast(Instant::now() + Duration::from_secs(10)));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_worker_delivers_fixture_content() {
    let worker = GenerationWorker::new(Arc::new(FixtureGenerator::new(FIXTURE)));
    let mut model = create_test_model();
    dispatch(&mut model, &worker, Message::Generate);
    assert!(model.pending_request.is_none());
    assert!(model.is_loading());

    let msg = worker
        .recv_timeout(Duration::from_secs(5))
        .expect("worker result");
    dispatch(&mut model, &worker, msg);
    assert_eq!(model.state, ContentState::Ready);
    assert_eq!(model.document.source(), FIXTURE);
}

#[test]
fn test_worker_failure_becomes_error_state() {
    let worker = GenerationWorker::new(Arc::new(FailingGenerator));
    let mut model = create_test_model();
    dispatch(&mut model, &worker, Message::Generate);

    let msg = worker
        .recv_timeout(Duration::from_secs(5))
        .expect("worker result");
    match &msg {
        Message::GenerationFinished { result, .. } => {
            assert_eq!(result.as_ref().err().map(String::as_str), Some("HTTP 403: API key not valid"));
        }
        other => panic!("unexpected message {other:?}"),
    }
    dispatch(&mut model, &worker, msg);
    assert_eq!(
        model.state,
        ContentState::Error(GENERATION_FAILED_MESSAGE.to_string())
    );
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_failed_request_reports_through_log_writer_only() {
    assert_eq!(LogTarget::select(None, true), LogTarget::Discard);

    let captured = CapturedLog::default();
    let writer = captured.clone();
    let sub = logging::subscriber(EnvFilter::new("warn"), move || writer.clone());
    let request = GenerateRequest {
        id: 9,
        topic: "Cells".to_string(),
        mode: RevisionMode::Summary,
        concept: String::new(),
    };
    let result =
        tracing::subscriber::with_default(sub, || run_request(&FailingGenerator, &request));

    assert_eq!(result, Err("HTTP 403: API key not valid".to_string()));
    let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(logged.contains("generation failed"));
    assert!(logged.contains("id=9"));
}

#[test]
fn test_no_request_without_generate() {
    let worker = GenerationWorker::new(Arc::new(FixtureGenerator::new(FIXTURE)));
    let mut model = create_test_model();
    dispatch(&mut model, &worker, Message::TopicDown);
    assert!(worker.recv_timeout(Duration::from_millis(50)).is_none());
}

// ==================== App ====================

#[test]
fn test_app_builder_seeds_initial_model() {
    let app = App::new(Arc::new(FixtureGenerator::new(FIXTURE)))
        .with_topic_index(2)
        .with_mode(RevisionMode::Explain)
        .with_concept("diffusion")
        .with_wrap_width(Some(60))
        .with_model_label("fixture")
        .with_config_paths(Some(PathBuf::from("/tmp/revise/config")), None);
    let model = app.initial_model((120, 40));
    assert_eq!(model.selected_topic, 2);
    assert_eq!(model.mode, RevisionMode::Explain);
    assert_eq!(model.concept, "diffusion");
    assert_eq!(model.wrap_width, Some(60));
    assert_eq!(model.model_label, "fixture");
    assert_eq!(model.viewport.width(), crate::ui::content_width(120));
    assert!(model.config_local_path.is_none());
}

#[test]
fn test_app_ignores_out_of_range_topic() {
    let app = App::new(Arc::new(FixtureGenerator::new(FIXTURE))).with_topic_index(42);
    assert_eq!(app.initial_model((80, 24)).selected_topic, 0);
}
