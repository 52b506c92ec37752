use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::ImportSettings;
use crate::playlist::{Playlist, SourceLocator, Track, TrackMetadata};

use super::importer::Importer;

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk `dir` and return every file below it, sorted by path.
fn walk_dir(dir: &Path, settings: &ImportSettings) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

/// Expand directories in `paths` into the files they contain. Plain files
/// are passed through untouched, in order; missing paths are dropped.
pub fn expand_paths<P: AsRef<Path>>(paths: &[P], settings: &ImportSettings) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            files.extend(walk_dir(path, settings));
        } else if path.exists() {
            files.push(path.to_path_buf());
        } else {
            warn!(path = %path.display(), "path does not exist");
        }
    }
    files
}

/// Build the startup playlist from `paths`. Seed tracks play straight from
/// disk, so nothing is buffered in memory.
pub fn seed_playlist<P: AsRef<Path>>(paths: &[P], importer: &Importer) -> Playlist {
    let tracks: Vec<Track> = expand_paths(paths, importer.settings())
        .into_iter()
        .filter(|path| importer.is_audio(path))
        .map(|path| {
            let metadata = importer.resolve(&path).unwrap_or_else(|err| {
                debug!(path = %path.display(), error = %err, "using default metadata");
                TrackMetadata::default()
            });
            let file_name = path.file_name().map(PathBuf::from).unwrap_or_else(|| path.clone());
            Track::from_metadata(&file_name, metadata, SourceLocator::File(path))
        })
        .collect();

    info!(tracks = tracks.len(), "seeded playlist");
    Playlist::with_tracks(tracks)
}
