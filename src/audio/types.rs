//! Commands understood by the audio thread and the state it shares back.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::playlist::MediaSource;
use crate::transport::LoadTicket;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source with `media`, paused at the start.
    Load { ticket: LoadTicket, media: MediaSource },
    /// Drop the current source.
    Unload,
    Play,
    Pause,
    /// Jump to an absolute position in the current source.
    Seek(Duration),
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the controller.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Load the numbers below belong to.
    pub ticket: Option<LoadTicket>,
    /// Elapsed playback time for the current source.
    pub elapsed: Duration,
    /// Total length of the current source, if the decoder knows it.
    pub duration: Option<Duration>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
