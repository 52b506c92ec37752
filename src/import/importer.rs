use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::ImportSettings;
use crate::error::ImportError;
use crate::playlist::{Playlist, SourceLocator, Track, TrackMetadata};

use super::metadata::{MetadataReader, TagReader, resolve_with_timeout};
use super::scan::expand_paths;

/// Outcome of one import batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Tracks appended to the playlist.
    pub added: usize,
    /// Inputs ignored because they are not audio files.
    pub skipped: usize,
    /// Appended tracks whose metadata fell back to defaults.
    pub fallbacks: usize,
}

/// Where an imported track's audio lives.
#[derive(Debug)]
pub enum Payload {
    /// The file's bytes, to be held as a transient source.
    Bytes(Vec<u8>),
    /// The file could not be buffered; play it from disk.
    File(PathBuf),
}

/// One file the importer is done with, ready to be appended.
#[derive(Debug)]
pub struct ImportedTrack {
    pub file_name: PathBuf,
    pub metadata: TrackMetadata,
    pub payload: Payload,
    /// Why the metadata fell back to defaults, if it did.
    pub fallback: Option<ImportError>,
}

impl ImportedTrack {
    /// Append the track to `playlist` and return its index.
    pub fn append_to(self, playlist: &mut Playlist) -> usize {
        match self.payload {
            Payload::Bytes(bytes) => playlist.append_transient(&self.file_name, self.metadata, bytes),
            Payload::File(path) => playlist.append(Track::from_metadata(
                &self.file_name,
                self.metadata,
                SourceLocator::File(path),
            )),
        }
    }
}

/// What a background import sends back to the player.
#[derive(Debug)]
pub enum ImportMessage {
    Track(ImportedTrack),
    Finished(ImportReport),
}

pub struct Importer {
    reader: Arc<dyn MetadataReader>,
    timeout: Duration,
    settings: ImportSettings,
}

impl Importer {
    /// An importer that reads tags with `lofty`.
    pub fn new(settings: &ImportSettings) -> Self {
        Self::with_reader(Arc::new(TagReader), settings)
    }

    pub fn with_reader(reader: Arc<dyn MetadataReader>, settings: &ImportSettings) -> Self {
        Self {
            reader,
            timeout: Duration::from_millis(settings.metadata_timeout_ms),
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Whether `path` has one of the configured audio extensions.
    pub fn is_audio(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                self.settings
                    .extensions
                    .iter()
                    .map(|e| e.trim().trim_start_matches('.'))
                    .any(|e| e.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Metadata for `path`, bounded by the configured timeout.
    pub fn resolve(&self, path: &Path) -> Result<TrackMetadata, ImportError> {
        resolve_with_timeout(self.reader.clone(), path, self.timeout)
    }

    /// Prepare every audio file under `paths` and hand each one to `deliver`
    /// as soon as it is ready. Directories are expanded; files that are not
    /// audio are skipped silently.
    ///
    /// Each file's bytes are read into memory for a transient source. If the
    /// bytes cannot be read the track still gets delivered, pointing at the
    /// file on disk.
    pub fn import_each<P, F>(&self, paths: &[P], mut deliver: F) -> ImportReport
    where
        P: AsRef<Path>,
        F: FnMut(ImportedTrack),
    {
        let mut report = ImportReport::default();

        for path in expand_paths(paths, &self.settings) {
            if !self.is_audio(&path) {
                debug!(path = %path.display(), "skipping non-audio file");
                report.skipped += 1;
                continue;
            }

            let (metadata, fallback) = match self.resolve(&path) {
                Ok(metadata) => (metadata, None),
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "using default metadata");
                    report.fallbacks += 1;
                    (TrackMetadata::default(), Some(err))
                }
            };

            let payload = match fs::read(&path) {
                Ok(bytes) => Payload::Bytes(bytes),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not buffer file, playing from disk");
                    Payload::File(path.clone())
                }
            };
            let file_name = path.file_name().map(PathBuf::from).unwrap_or_else(|| path.clone());
            deliver(ImportedTrack {
                file_name,
                metadata,
                payload,
                fallback,
            });
            report.added += 1;
        }

        info!(
            added = report.added,
            skipped = report.skipped,
            fallbacks = report.fallbacks,
            "import finished"
        );
        report
    }

    /// Run an import on its own thread. Every finished track is sent on `tx`
    /// followed by one [`ImportMessage::Finished`].
    pub fn spawn(
        self: &Arc<Self>,
        paths: Vec<PathBuf>,
        tx: Sender<ImportMessage>,
    ) -> Result<JoinHandle<()>, ImportError> {
        let importer = Arc::clone(self);
        let first = paths.first().cloned().unwrap_or_default();
        thread::Builder::new()
            .name("encore-import".to_string())
            .spawn(move || {
                // The receiver only goes away during shutdown.
                let report = importer.import_each(&paths, |track| {
                    let _ = tx.send(ImportMessage::Track(track));
                });
                let _ = tx.send(ImportMessage::Finished(report));
            })
            .map_err(|source| ImportError::Io { path: first, source })
    }
}
