use std::time::Duration;

use rand::Rng;

/// Snapshot of the transport's playback state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerState {
    /// `None` only while the playlist is empty.
    pub current_index: Option<usize>,
    /// True only once the device has confirmed playback.
    pub is_playing: bool,
    /// A play command was issued and has not completed yet.
    pub play_pending: bool,
    pub is_shuffle: bool,
    pub is_repeat: bool,
}

impl PlayerState {
    /// Playback is running or about to.
    pub fn is_active(&self) -> bool {
        self.is_playing || self.play_pending
    }
}

/// Device-reported timing, read fresh whenever the view is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Telemetry {
    pub elapsed: Duration,
    pub duration: Option<Duration>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Index before `current`, wrapping to the end.
pub fn previous_index(current: usize, len: usize) -> usize {
    (current + len - 1) % len
}

/// Index after `current`, wrapping to the start.
pub fn next_index(current: usize, len: usize) -> usize {
    (current + 1) % len
}

/// Uniform random index in `0..len` other than `current`.
///
/// With fewer than two tracks there is nothing else to pick and `current`
/// comes back unchanged.
pub fn shuffled_index<R: Rng + ?Sized>(current: usize, len: usize, rng: &mut R) -> usize {
    if len < 2 {
        return current;
    }
    let pick = rng.random_range(0..len - 1);
    if pick >= current { pick + 1 } else { pick }
}

/// Clamp a volume level into `[0, 1]`. NaN counts as silence.
pub fn clamp_volume(level: f32) -> f32 {
    if level.is_nan() {
        return 0.0;
    }
    level.clamp(0.0, 1.0)
}

/// Round a stepped volume to hundredths so repeated ±0.1 steps land exactly
/// on 0 and 1.
pub fn snap_volume(level: f32) -> f32 {
    clamp_volume((level * 100.0).round() / 100.0)
}
