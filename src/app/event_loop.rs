use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};

use super::effects::handle_message_side_effects;
use super::input::handle_event;
use super::worker::GenerationWorker;

const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Apply one message: pure update, then its side effects.
pub(super) fn dispatch(model: &mut Model, worker: &GenerationWorker, msg: Message) {
    let side_msg = msg.clone();
    *model = update(std::mem::take(model), msg);
    handle_message_side_effects(model, worker, &side_msg);
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; revise requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let mut model = self.initial_model((size.width, size.height));
        crate::perf::log_event(
            "init.layout",
            format!(
                "terminal={}x{} content_w={} content_h={} wrap_width={:?}",
                size.width,
                size.height,
                model.viewport.width(),
                model.viewport.height(),
                model.wrap_width
            ),
        );
        let worker = GenerationWorker::new(self.generator());

        let _ = execute!(stdout(), EnableMouseCapture);
        let result = Self::event_loop(&mut terminal, &mut model, &worker);
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        worker: &GenerationWorker,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut last_tick = Instant::now();
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                dispatch(model, worker, Message::Resize(width, height));
                needs_render = true;
            }

            while let Some(msg) = worker.try_recv() {
                if let Message::GenerationFinished { id, result } = &msg {
                    tracing::debug!(id, ok = result.is_ok(), "generation result received");
                }
                dispatch(model, worker, msg);
                needs_render = true;
            }

            if model.is_loading() && last_tick.elapsed() >= SPINNER_INTERVAL {
                dispatch(model, worker, Message::Tick);
                last_tick = Instant::now();
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if model.is_loading() || resize_debouncer.is_pending() {
                20
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if let Some(msg) =
                    handle_event(&event::read()?, model, event_ms, &mut resize_debouncer)
                {
                    crate::perf::log_event(
                        "event.message",
                        format!("frame={frame_idx} msg={msg:?}"),
                    );
                    dispatch(model, worker, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    if let Some(msg) =
                        handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer)
                    {
                        dispatch(model, worker, msg);
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
