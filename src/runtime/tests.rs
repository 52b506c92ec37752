use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::event_loop::{EventLoopState, Flow, handle_key_event};
use super::startup::apply_player_defaults;
use crate::app::App;
use crate::config::{ImportSettings, PlayerSettings, Settings};
use crate::import::Importer;
use crate::playlist::{Playlist, SourceLocator, Track, TrackMetadata};
use crate::transport::TransportController;
use crate::transport::testing::{Cmd, MockDevice};

struct Fixture {
    settings: Settings,
    app: App,
    controller: TransportController<MockDevice>,
    importer: Arc<Importer>,
    state: EventLoopState,
}

impl Fixture {
    fn new(n: usize) -> Self {
        let tracks = (0..n)
            .map(|i| {
                Track::from_metadata(
                    Path::new(&format!("song{i}.mp3")),
                    TrackMetadata {
                        duration: Some(Duration::from_secs(120)),
                        ..TrackMetadata::default()
                    },
                    SourceLocator::File(PathBuf::from(format!("/music/song{i}.mp3"))),
                )
            })
            .collect();
        let (_tx, rx) = mpsc::channel();
        Self {
            settings: Settings::default(),
            app: App::new(true),
            controller: TransportController::new(Playlist::with_tracks(tracks), MockDevice::default(), rx),
            importer: Arc::new(Importer::new(&ImportSettings::default())),
            state: EventLoopState::default(),
        }
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    fn press(&mut self, code: KeyCode) -> Flow {
        handle_key_event(
            KeyEvent::new(code, KeyModifiers::NONE),
            &self.settings,
            &mut self.app,
            &mut self.controller,
            &self.importer,
            &mut self.state,
        )
    }
}

#[test]
fn q_quits_in_normal_mode() {
    let mut fx = Fixture::new(1);
    assert_eq!(fx.press(KeyCode::Char('q')), Flow::Quit);
}

#[test]
fn prompt_swallows_shortcuts() {
    let mut fx = Fixture::new(2);
    fx.press(KeyCode::Char('a'));
    assert_eq!(fx.press(KeyCode::Char('q')), Flow::Continue);
    fx.press(KeyCode::Char('d'));
    fx.press(KeyCode::Char(' '));

    assert_eq!(fx.app.prompt, "qd ");
    assert_eq!(fx.controller.playlist().len(), 2);
    assert_eq!(fx.controller.device().count(&Cmd::Play), 0);

    fx.press(KeyCode::Esc);
    assert!(!fx.app.is_prompting());
}

#[test]
fn prompt_with_missing_path_imports_nothing() {
    let mut fx = Fixture::new(1);
    fx.press(KeyCode::Char('a'));
    fx.type_text("/definitely/not/here.mp3");
    fx.press(KeyCode::Enter);
    assert!(!fx.app.is_prompting());
    assert_eq!(fx.controller.playlist().len(), 1);
}

#[test]
fn prompt_import_finishes_in_the_background() {
    let dir = tempfile::tempdir().unwrap();
    let song = dir.path().join("extra.mp3");
    fs::write(&song, b"not really audio").unwrap();

    let mut fx = Fixture::new(1);
    fx.press(KeyCode::Char('a'));
    fx.type_text(&song.display().to_string());
    fx.press(KeyCode::Enter);
    assert!(fx.controller.is_importing());

    let deadline = Instant::now() + Duration::from_secs(5);
    while fx.controller.is_importing() {
        assert!(Instant::now() < deadline, "import never finished");
        fx.controller.pump_events();
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(fx.controller.playlist().len(), 2);
    assert_eq!(fx.controller.playlist().get(1).unwrap().title, "extra");
}

#[test]
fn enter_plays_track_under_cursor() {
    let mut fx = Fixture::new(3);
    fx.press(KeyCode::Char('j'));
    fx.press(KeyCode::Char('j'));
    fx.press(KeyCode::Enter);

    assert_eq!(fx.controller.state().current_index, Some(2));
    assert!(fx.controller.state().play_pending);
    assert!(fx.app.follow_playback);
}

#[test]
fn enter_commits_drag_instead_of_selecting() {
    let mut fx = Fixture::new(3);
    fx.controller.device_mut().time = Duration::from_secs(10);
    fx.press(KeyCode::Char('j'));
    fx.press(KeyCode::Char(']'));
    assert!(fx.controller.is_dragging());
    fx.press(KeyCode::Enter);

    assert!(!fx.controller.is_dragging());
    assert_eq!(fx.controller.device().seeks(), vec![Duration::from_secs(15)]);
    assert_eq!(fx.controller.state().current_index, Some(0));
}

#[test]
fn d_removes_track_under_cursor() {
    let mut fx = Fixture::new(2);
    fx.press(KeyCode::Char('G'));
    fx.press(KeyCode::Char('d'));
    assert_eq!(fx.controller.playlist().len(), 1);
    assert_eq!(fx.app.selected, 0);
}

#[test]
fn gg_jumps_to_top() {
    let mut fx = Fixture::new(4);
    fx.press(KeyCode::Char('G'));
    fx.press(KeyCode::Char('g'));
    assert_eq!(fx.app.selected, 3);
    fx.press(KeyCode::Char('g'));
    assert_eq!(fx.app.selected, 0);
}

#[test]
fn volume_keys_step_by_configured_amount() {
    let mut fx = Fixture::new(1);
    fx.press(KeyCode::Down);
    fx.press(KeyCode::Down);
    assert_eq!(fx.controller.volume(), 0.8);
}

#[test]
fn player_defaults_apply_flags_and_autoplay() {
    let mut fx = Fixture::new(2);
    let player = PlayerSettings {
        shuffle: true,
        repeat: true,
        volume: 0.25,
        autoplay: true,
    };
    apply_player_defaults(&mut fx.controller, &player);

    let state = fx.controller.state();
    assert!(state.is_shuffle);
    assert!(state.is_repeat);
    assert!(state.play_pending);
    assert_eq!(fx.controller.volume(), 0.25);
}

#[test]
fn autoplay_on_empty_playlist_does_nothing() {
    let mut fx = Fixture::new(0);
    let player = PlayerSettings {
        autoplay: true,
        ..PlayerSettings::default()
    };
    apply_player_defaults(&mut fx.controller, &player);
    assert_eq!(fx.controller.device().count(&Cmd::Play), 0);
}
