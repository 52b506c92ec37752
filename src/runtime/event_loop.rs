use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::config;
use crate::import::Importer;
use crate::transport::{Direction, PlaybackDevice, TransportController};
use crate::ui;

/// What the loop should do after a key press.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: drains device events and import results, draws
/// and handles input.
/// Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut TransportController<AudioPlayer>,
    importer: &Arc<Importer>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        controller.pump_events();

        app.follow(controller.state().current_index);
        app.clamp_selected(controller.playlist().len());

        let display = controller.display();
        app.tick_spinner(display.spinning);
        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                &display,
                controller.playlist(),
                &settings.ui,
                &settings.controls,
            )
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, controller, importer, state) == Flow::Quit {
                    info!("quit requested");
                    controller
                        .device_mut()
                        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                    break;
                }
            }
        }
    }

    Ok(())
}

fn seek_step(settings: &config::Settings) -> i64 {
    settings.controls.seek_seconds.min(i64::MAX as u64) as i64
}

/// Translate one key press into app and transport operations.
pub fn handle_key_event<D: PlaybackDevice>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut TransportController<D>,
    importer: &Arc<Importer>,
    state: &mut EventLoopState,
) -> Flow {
    if app.is_prompting() {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Enter => {
                let paths = app.submit_prompt();
                debug!(?paths, "prompt import");
                controller.import_in_background(importer, paths);
            }
            KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
            _ => {}
        }
        return Flow::Continue;
    }

    let len = controller.playlist().len();
    let step = seek_step(settings);

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('p') | KeyCode::Char(' ') => controller.toggle_playback(),
        KeyCode::Left => controller.seek_by(-step),
        KeyCode::Right => controller.seek_by(step),
        KeyCode::Up => controller.adjust_volume(settings.controls.volume_step),
        KeyCode::Down => controller.adjust_volume(-settings.controls.volume_step),
        KeyCode::Char('h') => {
            app.follow_playback = true;
            controller.advance(Direction::Previous);
        }
        KeyCode::Char('l') => {
            app.follow_playback = true;
            controller.advance(Direction::Next);
        }
        KeyCode::Char('j') => app.next(len),
        KeyCode::Char('k') => app.prev(len),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.top();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.bottom(len),
        KeyCode::Enter => {
            if controller.is_dragging() {
                controller.end_drag();
            } else if len > 0 {
                app.follow_playback = true;
                if controller.state().current_index != Some(app.selected) {
                    controller.select(app.selected);
                }
                if !controller.state().is_active() {
                    controller.toggle_playback();
                }
            }
        }
        KeyCode::Esc => controller.cancel_drag(),
        KeyCode::Char('[') => controller.drag_by(-step),
        KeyCode::Char(']') => controller.drag_by(step),
        KeyCode::Char('d') => {
            controller.remove(app.selected);
            app.clamp_selected(controller.playlist().len());
        }
        KeyCode::Char('s') => controller.toggle_shuffle(),
        KeyCode::Char('r') => controller.toggle_repeat(),
        KeyCode::Char('a') => app.open_prompt(),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    Flow::Continue
}
