use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};

use super::effects::Runtime;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialised or an I/O
    /// error occurs while reading events or drawing.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; newsletter requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = self.initial_model((size.width, size.height));
        let mut runtime = self.new_runtime(&mut model);

        let result = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)
            .context("Failed to enable mouse capture")
            .and_then(|()| self.event_loop(&mut terminal, &mut model, &mut runtime));

        runtime.shutdown(&mut model);
        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    pub(super) fn initial_model(&self, terminal_size: (u16, u16)) -> Model {
        let mut model = Model::new(
            &self.initial_source,
            self.source_path.clone(),
            terminal_size,
        );
        model.watch_enabled = self.watch_enabled;
        model.output_dir.clone_from(&self.output_dir);
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model
    }

    /// Run one message through `update` and its side effects.
    ///
    /// Any change to the source text (re)arms the conversion debounce.
    pub(super) fn dispatch(
        &self,
        model: &mut Model,
        runtime: &mut Runtime,
        msg: Message,
        now_ms: u64,
    ) {
        let revision = model.editor.revision();
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, runtime, &side_msg, now_ms);
        if model.editor.revision() != revision {
            runtime.debounce.arm(now_ms);
        }
    }

    /// Advance timers, apply finished conversions and file changes.
    ///
    /// Returns true when anything visible changed.
    pub(super) fn tick(
        &self,
        model: &mut Model,
        runtime: &mut Runtime,
        now_ms: u64,
        now: Instant,
    ) -> bool {
        let mut changed = false;

        for finished in runtime.worker.drain_finished() {
            let msg = Message::ConversionFinished {
                seq: finished.seq,
                result: finished.result,
            };
            self.dispatch(model, runtime, msg, now_ms);
            changed = true;
        }

        if runtime.debounce.take_ready(now_ms) {
            tracing::debug!(delay_ms = runtime.debounce.delay_ms(), "edits settled");
            Self::start_conversion(model, &mut runtime.worker);
            changed = true;
        }

        if model.watch_enabled
            && runtime
                .file_watcher
                .as_mut()
                .is_some_and(|watcher| watcher.take_change_ready(now_ms))
        {
            self.dispatch(model, runtime, Message::FileChanged, now_ms);
            changed = true;
        }

        changed |= model.expire_copy_ack(now_ms);
        changed |= model.expire_toast(now);
        changed
    }

    /// Issue the startup conversion for the initial source.
    pub(super) fn start(model: &mut Model, runtime: &mut Runtime) {
        tracing::debug!(bytes = model.editor.text().len(), "initial conversion");
        Self::start_conversion(model, &mut runtime.worker);
    }

    fn event_loop(
        &self,
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        runtime: &mut Runtime,
    ) -> Result<()> {
        let start = Instant::now();
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        Self::start(model, runtime);
        let mut needs_render = true;

        loop {
            if self.tick(model, runtime, elapsed_ms(), Instant::now()) {
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if model.in_flight() > 0 {
                10
            } else {
                runtime
                    .debounce
                    .remaining_ms(elapsed_ms())
                    .map_or(100, |ms| ms.clamp(1, 100))
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                let event = event::read()?;
                if let Some(msg) = self.handle_event(&event, model) {
                    self.dispatch(model, runtime, msg, elapsed_ms());
                    needs_render = true;
                }

                // Coalesce key repeat and paste bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    let event = event::read()?;
                    if let Some(msg) = self.handle_event(&event, model) {
                        self.dispatch(model, runtime, msg, elapsed_ms());
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
