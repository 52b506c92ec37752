use std::fs;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use tempfile::tempdir;

use super::*;
use crate::config::ImportSettings;
use crate::error::ImportError;
use crate::playlist::{Cover, MediaSource, Playlist, SourceLocator, TrackMetadata, UNKNOWN_ALBUM, UNKNOWN_ARTIST};

struct FixedReader(TrackMetadata);

impl MetadataReader for FixedReader {
    fn read(&self, _path: &Path) -> Result<TrackMetadata, ImportError> {
        Ok(self.0.clone())
    }
}

struct SlowReader(Duration);

impl MetadataReader for SlowReader {
    fn read(&self, _path: &Path) -> Result<TrackMetadata, ImportError> {
        thread::sleep(self.0);
        Ok(TrackMetadata {
            title: Some("Too Late".to_string()),
            ..TrackMetadata::default()
        })
    }
}

struct FailingReader;

impl MetadataReader for FailingReader {
    fn read(&self, _path: &Path) -> Result<TrackMetadata, ImportError> {
        Err(ImportError::WorkerGone)
    }
}

fn import_into<P: AsRef<Path>>(importer: &Importer, paths: &[P], playlist: &mut Playlist) -> ImportReport {
    importer.import_each(paths, |track| {
        track.append_to(playlist);
    })
}

fn settings(timeout_ms: u64) -> ImportSettings {
    ImportSettings {
        metadata_timeout_ms: timeout_ms,
        ..ImportSettings::default()
    }
}

#[test]
fn is_audio_matches_configured_extensions_case_insensitive() {
    let importer = Importer::new(&ImportSettings::default());
    assert!(importer.is_audio(Path::new("/tmp/a.mp3")));
    assert!(importer.is_audio(Path::new("/tmp/a.MP3")));
    assert!(importer.is_audio(Path::new("/tmp/a.flac")));
    assert!(importer.is_audio(Path::new("/tmp/a.ogg")));
    assert!(!importer.is_audio(Path::new("/tmp/a.txt")));
    assert!(!importer.is_audio(Path::new("/tmp/a")));
}

#[test]
fn non_audio_files_are_ignored() {
    let dir = tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, b"not music").unwrap();

    let importer = Importer::with_reader(Arc::new(FailingReader), &settings(50));
    let mut playlist = Playlist::new();
    let report = import_into(&importer, &[notes], &mut playlist);

    assert_eq!(playlist.len(), 0);
    assert_eq!(report.added, 0);
    assert_eq!(report.skipped, 1);
}

#[test]
fn timed_out_metadata_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("Night Drive.mp3");
    fs::write(&song, b"fake audio").unwrap();

    let importer = Importer::with_reader(Arc::new(SlowReader(Duration::from_millis(500))), &settings(20));
    let mut playlist = Playlist::new();
    let report = import_into(&importer, &[&song], &mut playlist);

    assert_eq!(report.added, 1);
    assert_eq!(report.fallbacks, 1);
    let track = playlist.get(0).unwrap();
    assert_eq!(track.title, "Night Drive");
    assert_eq!(track.artist, UNKNOWN_ARTIST);
    assert_eq!(track.album, UNKNOWN_ALBUM);
    assert_eq!(track.cover, Cover::Default);
    assert_eq!(track.duration_display, "0:00");
}

#[test]
fn failing_reader_still_appends_track() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("broken.ogg");
    fs::write(&song, b"fake audio").unwrap();

    let importer = Importer::with_reader(Arc::new(FailingReader), &settings(200));
    let mut playlist = Playlist::new();
    import_into(&importer, &[&song], &mut playlist);

    assert_eq!(playlist.len(), 1);
    assert_eq!(playlist.get(0).unwrap().title, "broken");
}

#[test]
fn imported_files_are_buffered_as_transient_sources() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("a.wav");
    fs::write(&song, b"0123456789").unwrap();

    let resolved = TrackMetadata {
        title: Some("Real Title".to_string()),
        artist: Some("Real Artist".to_string()),
        album: None,
        cover: None,
        duration: Some(Duration::from_secs(75)),
    };
    let importer = Importer::with_reader(Arc::new(FixedReader(resolved)), &settings(1000));
    let mut playlist = Playlist::new();
    import_into(&importer, &[&song], &mut playlist);

    let track = playlist.get(0).unwrap();
    assert!(matches!(track.source, SourceLocator::Transient(_)));
    assert_eq!(track.title, "Real Title");
    assert_eq!(track.artist, "Real Artist");
    assert_eq!(track.album, UNKNOWN_ALBUM);
    assert_eq!(track.duration_display, "1:15");
    assert_eq!(playlist.sources().live(), 1);
    assert!(matches!(playlist.media(0), Some(MediaSource::Memory(ref b)) if &b[..] == b"0123456789"));
}

#[test]
fn directories_are_expanded_in_name_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.mp3"), b"x").unwrap();
    fs::write(dir.path().join("a.mp3"), b"x").unwrap();
    fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("c.mp3"), b"x").unwrap();

    let importer = Importer::with_reader(Arc::new(FailingReader), &settings(100));
    let mut playlist = Playlist::new();
    let report = import_into(&importer, &[dir.path()], &mut playlist);

    let titles: Vec<&str> = playlist.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
    assert_eq!(report.skipped, 1);
}

#[test]
fn expand_paths_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"x").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"x").unwrap();

    let settings = ImportSettings {
        recursive: false,
        ..ImportSettings::default()
    };
    let files = expand_paths(&[dir.path()], &settings);
    assert_eq!(files, vec![dir.path().join("root.mp3")]);
}

#[test]
fn seed_playlist_uses_file_locators() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one.mp3"), b"x").unwrap();
    fs::write(dir.path().join("two.flac"), b"x").unwrap();
    fs::write(dir.path().join("readme.md"), b"x").unwrap();

    let importer = Importer::with_reader(Arc::new(FailingReader), &settings(100));
    let playlist = seed_playlist(&[dir.path()], &importer);

    assert_eq!(playlist.len(), 2);
    assert_eq!(playlist.current_index(), Some(0));
    assert!(playlist.iter().all(|t| matches!(t.source, SourceLocator::File(_))));
    assert_eq!(playlist.sources().live(), 0);
}

#[test]
fn spawned_import_sends_tracks_then_report() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), b"x").unwrap();
    fs::write(dir.path().join("b.txt"), b"x").unwrap();

    let importer = Arc::new(Importer::with_reader(Arc::new(FailingReader), &settings(200)));
    let (tx, rx) = mpsc::channel();
    importer
        .spawn(vec![dir.path().to_path_buf()], tx)
        .unwrap()
        .join()
        .unwrap();

    let messages: Vec<ImportMessage> = rx.try_iter().collect();
    assert_eq!(messages.len(), 2);
    match &messages[0] {
        ImportMessage::Track(track) => {
            assert_eq!(track.file_name, Path::new("a.mp3"));
            assert!(matches!(track.payload, Payload::Bytes(ref b) if b == b"x"));
            assert!(matches!(track.fallback, Some(ImportError::WorkerGone)));
        }
        other => panic!("expected a track, got {other:?}"),
    }
    assert!(matches!(
        messages[1],
        ImportMessage::Finished(ImportReport {
            added: 1,
            skipped: 1,
            fallbacks: 1
        })
    ));
}
