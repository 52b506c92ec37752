use std::path::Path;

use super::model::{Track, TrackMetadata};
use super::source::{MediaSource, SourceRegistry};

/// What [`Playlist::remove_at`] removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub track: Track,
    /// The removed track was the current one.
    pub was_current: bool,
    /// A transient source was released along with the track.
    pub released: bool,
}

/// Ordered list of tracks with a bounds-safe current index.
///
/// `current` is `Some` exactly when `tracks` is non-empty.
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
    sources: SourceRegistry,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `tracks`, positioned on the first one.
    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        let current = if tracks.is_empty() { None } else { Some(0) };
        Self {
            tracks,
            current,
            sources: SourceRegistry::new(),
        }
    }

    /// Append a track, returning its index.
    pub fn append(&mut self, track: Track) -> usize {
        self.tracks.push(track);
        if self.current.is_none() {
            self.current = Some(0);
        }
        self.tracks.len() - 1
    }

    /// Register `bytes` as a transient source and append a track built from
    /// `metadata` that plays them.
    pub fn append_transient(&mut self, file_name: &Path, metadata: TrackMetadata, bytes: Vec<u8>) -> usize {
        let source = self.sources.allocate(bytes);
        self.append(Track::from_metadata(file_name, metadata, source))
    }

    /// Remove the track at `index`. Out-of-range indices are ignored.
    ///
    /// The current index moves down by one when an earlier track is removed.
    /// Removing the current track selects the previous one (or stays at 0),
    /// and an emptied store has no current index.
    pub fn remove_at(&mut self, index: usize) -> Option<Removal> {
        if index >= self.tracks.len() {
            tracing::debug!(index, len = self.tracks.len(), "ignoring removal of missing track");
            return None;
        }

        let track = self.tracks.remove(index);
        let released = self.sources.release(&track.source);
        let was_current = self.current == Some(index);

        self.current = match self.current {
            _ if self.tracks.is_empty() => None,
            Some(cur) if index < cur => Some(cur - 1),
            Some(cur) if index == cur => Some(cur.saturating_sub(1)),
            other => other,
        };

        Some(Removal {
            track,
            was_current,
            released,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn current_mut(&mut self) -> Option<&mut Track> {
        self.current.and_then(|i| self.tracks.get_mut(i))
    }

    /// Move the cursor to `index`. Returns false (and changes nothing) when
    /// `index` is out of range.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Resolve the track at `index` to a playable source.
    pub fn media(&self, index: usize) -> Option<MediaSource> {
        self.tracks
            .get(index)
            .and_then(|t| self.sources.resolve(&t.source))
    }

    #[cfg(test)]
    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }
}
