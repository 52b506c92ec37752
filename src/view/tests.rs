use std::path::{Path, PathBuf};
use std::time::Duration;

use super::*;
use crate::playlist::{Playlist, SourceLocator, Track, TrackMetadata};
use crate::transport::{PlayerState, Telemetry};

fn t(title: &str, secs: Option<u64>) -> Track {
    Track::from_metadata(
        Path::new(&format!("{title}.mp3")),
        TrackMetadata {
            title: Some(title.to_string()),
            artist: Some("Artist".to_string()),
            duration: secs.map(Duration::from_secs),
            ..TrackMetadata::default()
        },
        SourceLocator::File(PathBuf::from(format!("/music/{title}.mp3"))),
    )
}

fn input<'a>(playlist: &'a Playlist, state: PlayerState, telemetry: Telemetry) -> ViewInput<'a> {
    ViewInput {
        playlist,
        state,
        telemetry,
        volume: 1.0,
        drag: None,
        status: None,
        importing: false,
    }
}

#[test]
fn progress_is_zero_when_duration_unknown_or_zero() {
    assert_eq!(progress_percent(Duration::from_secs(10), None), 0.0);
    assert_eq!(progress_percent(Duration::from_secs(10), Some(Duration::ZERO)), 0.0);
    assert_eq!(
        progress_percent(Duration::from_secs(30), Some(Duration::from_secs(120))),
        25.0
    );
    assert_eq!(
        progress_percent(Duration::from_secs(500), Some(Duration::from_secs(120))),
        100.0
    );
}

#[test]
fn volume_icon_bands() {
    assert_eq!(VolumeIcon::from_level(0.0), VolumeIcon::Muted);
    assert_eq!(VolumeIcon::from_level(0.01), VolumeIcon::Low);
    assert_eq!(VolumeIcon::from_level(0.49), VolumeIcon::Low);
    assert_eq!(VolumeIcon::from_level(0.5), VolumeIcon::Normal);
    assert_eq!(VolumeIcon::from_level(1.0), VolumeIcon::Normal);
}

#[test]
fn empty_playlist_shows_cleared_fields() {
    let playlist = Playlist::new();
    let display = derive(&input(&playlist, PlayerState::default(), Telemetry::default()));
    assert_eq!(display.now_playing.title, EMPTY_PLAYLIST_TITLE);
    assert!(display.now_playing.artist.is_empty());
    assert!(display.now_playing.album.is_empty());
    assert_eq!(display.now_playing.duration, "0:00");
    assert_eq!(display.elapsed, "0:00");
    assert_eq!(display.progress_percent, 0.0);
    assert!(display.rows.is_empty());
    assert_eq!(display.play_icon, PlayIcon::Play);
}

#[test]
fn active_row_follows_current_index() {
    let playlist = Playlist::with_tracks(vec![t("a", Some(200)), t("b", None), t("c", Some(61))]);
    let state = PlayerState {
        current_index: Some(1),
        ..PlayerState::default()
    };
    let display = derive(&input(&playlist, state, Telemetry::default()));
    let active: Vec<bool> = display.rows.iter().map(|r| r.active).collect();
    assert_eq!(active, vec![false, true, false]);
    assert_eq!(display.rows[0].duration, "3:20");
    assert_eq!(display.rows[1].duration, "0:00");
    assert_eq!(display.now_playing.title, "b");
    assert_eq!(display.now_playing.duration, "0:00");
}

#[test]
fn telemetry_drives_elapsed_and_progress() {
    let playlist = Playlist::with_tracks(vec![t("a", Some(200))]);
    let state = PlayerState {
        current_index: Some(0),
        is_playing: true,
        ..PlayerState::default()
    };
    let telemetry = Telemetry {
        elapsed: Duration::from_secs(50),
        duration: Some(Duration::from_secs(200)),
    };
    let display = derive(&input(&playlist, state, telemetry));
    assert_eq!(display.elapsed, "0:50");
    assert_eq!(display.remaining, "-2:30");
    assert_eq!(display.progress_percent, 25.0);
    assert_eq!(display.play_icon, PlayIcon::Pause);
    assert!(display.spinning);
}

#[test]
fn drag_position_overrides_device_time() {
    let playlist = Playlist::with_tracks(vec![t("a", Some(100))]);
    let state = PlayerState {
        current_index: Some(0),
        is_playing: true,
        ..PlayerState::default()
    };
    let telemetry = Telemetry {
        elapsed: Duration::from_secs(10),
        duration: Some(Duration::from_secs(100)),
    };
    let mut view = input(&playlist, state, telemetry);
    view.drag = Some(Duration::from_secs(75));
    let display = derive(&view);
    assert_eq!(display.elapsed, "1:15");
    assert_eq!(display.remaining, "-0:25");
    assert_eq!(display.progress_percent, 75.0);
    assert!(display.dragging);
}

#[test]
fn pending_play_shows_pause_icon_without_spinning() {
    let playlist = Playlist::with_tracks(vec![t("a", None)]);
    let state = PlayerState {
        current_index: Some(0),
        play_pending: true,
        ..PlayerState::default()
    };
    let display = derive(&input(&playlist, state, Telemetry::default()));
    assert_eq!(display.play_icon, PlayIcon::Pause);
    assert!(!display.spinning);
}
