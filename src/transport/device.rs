use std::fmt;
use std::time::Duration;

use crate::error::DeviceError;
use crate::playlist::MediaSource;

/// Identifies one `load` on a device. Events carry the ticket of the load
/// they belong to, so events from a superseded source can be told apart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

impl fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEventKind {
    /// A play command completed; audio is now coming out.
    PlayStarted,
    /// A play command was refused.
    PlayRejected(DeviceError),
    /// Periodic elapsed-time report while playing.
    TimeUpdated(Duration),
    /// The source was opened and its total duration is known.
    MetadataReady(Duration),
    /// The source played to its end.
    Ended,
    /// The source failed while loading or playing.
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceEvent {
    pub ticket: LoadTicket,
    pub kind: DeviceEventKind,
}

impl DeviceEvent {
    pub fn new(ticket: LoadTicket, kind: DeviceEventKind) -> Self {
        Self { ticket, kind }
    }
}

/// A media output that plays one source at a time.
///
/// Commands return once they are accepted; `play` completes later with a
/// `PlayStarted` or `PlayRejected` event on the device's event channel.
pub trait PlaybackDevice {
    /// Switch to `media`, paused at the start. Supersedes any previous load.
    fn load(&mut self, media: MediaSource) -> Result<LoadTicket, DeviceError>;
    /// Drop the current source.
    fn unload(&mut self) -> Result<(), DeviceError>;
    fn play(&mut self) -> Result<(), DeviceError>;
    fn pause(&mut self) -> Result<(), DeviceError>;
    fn seek(&mut self, position: Duration) -> Result<(), DeviceError>;
    /// `level` is already clamped to `[0, 1]`.
    fn set_volume(&mut self, level: f32) -> Result<(), DeviceError>;
    fn current_time(&self) -> Duration;
    /// Total duration of the loaded source, when known.
    fn duration(&self) -> Option<Duration>;
}
