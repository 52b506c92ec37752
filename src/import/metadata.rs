use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use lofty::prelude::*;

use crate::error::ImportError;
use crate::playlist::{Cover, TrackMetadata};

/// Image files looked up next to a track when its tags carry no picture.
const SIDECAR_COVERS: &[&str] = &[
    "cover.jpg",
    "cover.png",
    "folder.jpg",
    "folder.png",
    "front.jpg",
    "album.jpg",
];

/// Something that can read metadata for an audio file.
pub trait MetadataReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<TrackMetadata, ImportError>;
}

/// Reads tags and stream properties with `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagReader;

impl MetadataReader for TagReader {
    fn read(&self, path: &Path) -> Result<TrackMetadata, ImportError> {
        let tagged = lofty::read_from_path(path).map_err(|source| ImportError::Tags {
            path: path.to_path_buf(),
            source,
        })?;

        let mut metadata = TrackMetadata {
            duration: Some(tagged.properties().duration()),
            ..TrackMetadata::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            metadata.title = tag.title().map(|v| v.trim().to_string());
            metadata.artist = tag.artist().map(|v| v.trim().to_string());
            metadata.album = tag.album().map(|v| v.trim().to_string());
            metadata.cover = tag.pictures().first().map(|picture| Cover::Embedded {
                mime: picture
                    .mime_type()
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| "image".to_string()),
                data: Arc::from(picture.data()),
            });
        }

        if metadata.cover.is_none() {
            metadata.cover = sidecar_cover(path).map(Cover::File);
        }

        Ok(metadata)
    }
}

fn sidecar_cover(path: &Path) -> Option<PathBuf> {
    let dir = path.parent()?;
    SIDECAR_COVERS
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Run `reader` for `path` on a worker thread and wait at most `timeout`.
///
/// A worker that overruns is left to finish on its own; its result is dropped.
pub fn resolve_with_timeout(
    reader: Arc<dyn MetadataReader>,
    path: &Path,
    timeout: Duration,
) -> Result<TrackMetadata, ImportError> {
    let (tx, rx) = mpsc::channel();
    let worker_path = path.to_path_buf();

    thread::Builder::new()
        .name("encore-metadata".to_string())
        .spawn(move || {
            let _ = tx.send(reader.read(&worker_path));
        })
        .map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(ImportError::TimedOut(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(ImportError::WorkerGone),
    }
}
