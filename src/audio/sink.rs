//! Utilities for creating `rodio` sinks from media sources.
//!
//! The helper here encapsulates opening/decoding a source and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::DeviceError;
use crate::playlist::MediaSource;

/// Create a paused `Sink` for `media` that starts playback at `start_at`.
/// Also returns the source's total duration when the decoder knows it.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    media: &MediaSource,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), DeviceError> {
    let sink = Sink::connect_new(stream.mixer());
    sink.pause();

    let total = match media {
        MediaSource::File(path) => {
            let file = File::open(path).map_err(|e| DeviceError::Open {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            append_decoded(&sink, BufReader::new(file), start_at)?
        }
        MediaSource::Memory(bytes) => append_decoded(&sink, Cursor::new(bytes.clone()), start_at)?,
    };

    Ok((sink, total))
}

fn append_decoded<R>(sink: &Sink, reader: R, start_at: Duration) -> Result<Option<Duration>, DeviceError>
where
    R: Read + Seek + Send + Sync + 'static,
{
    let decoder = Decoder::new(reader).map_err(|e| DeviceError::Decode(e.to_string()))?;
    let total = decoder.total_duration();
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    Ok(total)
}
