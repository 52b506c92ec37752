//! Error types shared by the player core and its collaborators.
//!
//! None of these are fatal: the transport controller catches every failure at
//! the point where the command (or its completion) is handled, logs it and
//! falls back to a state-preserving default.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures reported by a playback device.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeviceError {
    /// The device worker is gone and can no longer take commands.
    #[error("playback device disconnected")]
    Disconnected,

    /// A command that needs a loaded source was issued without one.
    #[error("no source loaded")]
    NoSource,

    /// No audio output is available.
    #[error("audio output unavailable: {0}")]
    Output(String),

    /// The source could not be opened.
    #[error("failed to open {path:?}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// The source could not be decoded.
    #[error("failed to decode source: {0}")]
    Decode(String),
}

/// Failures while resolving metadata for an imported file.
///
/// The importer swaps these for default fields; the controller only
/// surfaces them as a status hint.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read tags from {path:?}: {source}")]
    Tags {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    #[error("metadata resolution timed out after {0:?}")]
    TimedOut(Duration),

    #[error("metadata worker exited without a result")]
    WorkerGone,

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Player-level failure taxonomy.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The track's source could not be applied to the device.
    #[error("Error loading song: {0}")]
    Load(#[source] DeviceError),

    /// The device rejected a play command.
    #[error("Playback failed: {0}")]
    Playback(#[source] DeviceError),

    /// The device reported an error while playing.
    #[error("Error playing audio: {0}")]
    Device(String),

    /// An import fell back to default metadata or could not start.
    #[error("Import fell back to defaults: {0}")]
    Import(#[from] ImportError),
}

impl PlayerError {
    /// Short text suitable for the status line.
    pub fn status_text(&self) -> String {
        match self {
            Self::Load(_) => "Error loading song".to_string(),
            Self::Playback(_) => "Playback failed - see log".to_string(),
            Self::Device(_) => "Error playing audio, skipping".to_string(),
            Self::Import(_) => "Imported with default metadata".to_string(),
        }
    }
}
