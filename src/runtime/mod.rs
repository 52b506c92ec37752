use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::import::{Importer, seed_playlist};
use crate::logging;
use crate::transport::TransportController;

mod event_loop;
mod settings;
mod startup;

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();

    let _log_guard = match logging::init(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            // Logging is optional; the player still runs without a log file.
            eprintln!("encore: logging disabled: {e}");
            None
        }
    };
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let mut paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        paths.push(env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    }

    let importer = Arc::new(Importer::new(&settings.import));
    let playlist = seed_playlist(&paths, &importer);
    info!(paths = ?paths, tracks = playlist.len(), "starting");

    let (audio_player, events) = AudioPlayer::new(&settings.audio);
    let mut controller = TransportController::new(playlist, audio_player, events);
    startup::apply_player_defaults(&mut controller, &settings.player);

    let mut app = App::new(settings.ui.follow_playback);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut controller,
            &importer,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
