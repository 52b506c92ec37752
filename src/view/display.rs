use std::time::Duration;

use crate::playlist::{Playlist, format_optional_time, format_time};
use crate::transport::{PlayerState, Telemetry};

pub const EMPTY_PLAYLIST_TITLE: &str = "No songs in playlist";

/// Everything `derive` needs, borrowed from the controller.
pub struct ViewInput<'a> {
    pub playlist: &'a Playlist,
    pub state: PlayerState,
    pub telemetry: Telemetry,
    pub volume: f32,
    /// Position of an in-flight progress drag.
    pub drag: Option<Duration>,
    pub status: Option<&'a str>,
    /// A background import is still adding tracks.
    pub importing: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayIcon {
    Play,
    Pause,
}

impl PlayIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Play => "▶",
            Self::Pause => "⏸",
        }
    }

    /// What pressing the button would do.
    pub fn label(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Pause => "Pause",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VolumeIcon {
    Muted,
    Low,
    Normal,
}

impl VolumeIcon {
    /// Muted at exactly 0, low below one half, normal otherwise.
    pub fn from_level(level: f32) -> Self {
        if level <= 0.0 {
            Self::Muted
        } else if level < 0.5 {
            Self::Low
        } else {
            Self::Normal
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Muted => "🔇",
            Self::Low => "🔉",
            Self::Normal => "🔊",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover: String,
    pub duration: String,
}

impl NowPlaying {
    fn cleared() -> Self {
        Self {
            title: EMPTY_PLAYLIST_TITLE.to_string(),
            artist: String::new(),
            album: String::new(),
            cover: String::new(),
            duration: "0:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRow {
    pub title: String,
    pub duration: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub now_playing: NowPlaying,
    pub elapsed: String,
    /// Time left as "-m:ss", empty when the duration is unknown.
    pub remaining: String,
    /// Progress through the current track, 0..=100.
    pub progress_percent: f64,
    pub rows: Vec<PlaylistRow>,
    pub play_icon: PlayIcon,
    /// The cover "spins" while audio is playing.
    pub spinning: bool,
    pub volume: f32,
    pub volume_icon: VolumeIcon,
    pub shuffle: bool,
    pub repeat: bool,
    pub dragging: bool,
    pub status: Option<String>,
    pub importing: bool,
}

/// `elapsed / duration * 100`, or 0 when the duration is unknown or zero.
pub fn progress_percent(elapsed: Duration, duration: Option<Duration>) -> f64 {
    match duration {
        Some(d) if !d.is_zero() => (elapsed.as_secs_f64() / d.as_secs_f64() * 100.0).clamp(0.0, 100.0),
        _ => 0.0,
    }
}

/// Project the current player state into display state.
///
/// While a drag is in flight the elapsed text and progress follow the drag
/// position, not the device.
pub fn derive(input: &ViewInput<'_>) -> DisplayState {
    let state = input.state;
    let current = state.current_index.and_then(|i| input.playlist.get(i));

    let now_playing = match current {
        Some(track) => NowPlaying {
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            cover: track.cover.label(),
            duration: match input.telemetry.duration {
                Some(d) => format_time(d),
                None => track.duration_display.clone(),
            },
        },
        None => NowPlaying::cleared(),
    };

    let (elapsed, remaining, progress_percent) = if current.is_none() {
        ("0:00".to_string(), String::new(), 0.0)
    } else {
        let position = input.drag.unwrap_or(input.telemetry.elapsed);
        let duration = input.telemetry.duration;
        (
            format_time(position),
            duration
                .map(|d| format!("-{}", format_time(d.saturating_sub(position))))
                .unwrap_or_default(),
            progress_percent(position, duration),
        )
    };

    let rows = input
        .playlist
        .iter()
        .enumerate()
        .map(|(i, track)| PlaylistRow {
            title: track.title.clone(),
            duration: if track.duration_display.is_empty() {
                format_optional_time(track.duration)
            } else {
                track.duration_display.clone()
            },
            active: state.current_index == Some(i),
        })
        .collect();

    DisplayState {
        now_playing,
        elapsed,
        remaining,
        progress_percent,
        rows,
        play_icon: if state.is_active() {
            PlayIcon::Pause
        } else {
            PlayIcon::Play
        },
        spinning: state.is_playing,
        volume: input.volume,
        volume_icon: VolumeIcon::from_level(input.volume),
        shuffle: state.is_shuffle,
        repeat: state.is_repeat,
        dragging: input.drag.is_some(),
        status: input.status.map(str::to_string),
        importing: input.importing,
    }
}
