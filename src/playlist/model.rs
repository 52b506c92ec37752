use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::source::SourceLocator;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Album art attached to a track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cover {
    /// No art was found; the UI shows its placeholder.
    #[default]
    Default,
    /// Art stored next to the audio file.
    File(PathBuf),
    /// Art embedded in the audio file's tags.
    Embedded { mime: String, data: Arc<[u8]> },
}

impl Cover {
    /// Short human-readable description used by the now-playing panel.
    pub fn label(&self) -> String {
        match self {
            Self::Default => "default cover".to_string(),
            Self::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Embedded { mime, data } => format!("embedded {mime} ({} KiB)", data.len() / 1024),
        }
    }
}

/// Best-effort metadata resolved for a file. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub cover: Option<Cover>,
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub source: SourceLocator,
    pub cover: Cover,
    pub duration: Option<Duration>,
    pub duration_display: String,
}

impl Track {
    /// Build a track from resolved metadata, filling every unresolved field
    /// with its default. `file_name` supplies the fallback title.
    pub fn from_metadata(file_name: &Path, metadata: TrackMetadata, source: SourceLocator) -> Self {
        let title = non_blank(metadata.title).unwrap_or_else(|| title_from_file_name(file_name));
        let artist = non_blank(metadata.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        let album = non_blank(metadata.album).unwrap_or_else(|| UNKNOWN_ALBUM.to_string());
        // A zero duration means the container had nothing useful to say.
        let duration = metadata.duration.filter(|d| !d.is_zero());

        Self {
            title,
            artist,
            album,
            source,
            cover: metadata.cover.unwrap_or_default(),
            duration,
            duration_display: format_optional_time(duration),
        }
    }

    /// Record a duration learned later (e.g. once the device has opened the source).
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = Some(duration);
        self.duration_display = format_time(duration);
    }

    /// Whether the track owns a transient source that must be released.
    pub fn is_transient(&self) -> bool {
        matches!(self.source, SourceLocator::Transient(_))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The file name with its last extension stripped. A dotfile such as
/// `.mp3` is all extension, so it gets the unknown title.
pub fn title_from_file_name(file_name: &Path) -> String {
    let name = file_name
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let stem = match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => &name[..],
    };
    if stem.trim().is_empty() {
        UNKNOWN_TITLE.to_string()
    } else {
        stem.to_string()
    }
}

/// Format a duration as `m:ss`.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Like [`format_time`], with `0:00` for an unknown duration.
pub fn format_optional_time(d: Option<Duration>) -> String {
    d.map(format_time).unwrap_or_else(|| "0:00".to_string())
}
