//! A scripted [`PlaybackDevice`] for tests.

use std::time::Duration;

use crate::error::DeviceError;
use crate::playlist::MediaSource;

use super::device::{LoadTicket, PlaybackDevice};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cmd {
    Load(MediaSource),
    Unload,
    Play,
    Pause,
    Seek(Duration),
    Volume(f32),
}

/// Records every command and reports whatever time the test sets.
#[derive(Debug, Default)]
pub(crate) struct MockDevice {
    pub(crate) log: Vec<Cmd>,
    pub(crate) next_ticket: u64,
    pub(crate) time: Duration,
    pub(crate) duration: Option<Duration>,
    pub(crate) fail_loads: bool,
}

impl MockDevice {
    pub(crate) fn count(&self, wanted: &Cmd) -> usize {
        self.log.iter().filter(|c| *c == wanted).count()
    }

    pub(crate) fn loads(&self) -> usize {
        self.log.iter().filter(|c| matches!(c, Cmd::Load(_))).count()
    }

    pub(crate) fn seeks(&self) -> Vec<Duration> {
        self.log
            .iter()
            .filter_map(|c| match c {
                Cmd::Seek(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl PlaybackDevice for MockDevice {
    fn load(&mut self, media: MediaSource) -> Result<LoadTicket, DeviceError> {
        self.log.push(Cmd::Load(media));
        if self.fail_loads {
            return Err(DeviceError::Decode("bad data".to_string()));
        }
        self.next_ticket += 1;
        self.time = Duration::ZERO;
        Ok(LoadTicket(self.next_ticket))
    }

    fn unload(&mut self) -> Result<(), DeviceError> {
        self.log.push(Cmd::Unload);
        Ok(())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        self.log.push(Cmd::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), DeviceError> {
        self.log.push(Cmd::Pause);
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<(), DeviceError> {
        self.log.push(Cmd::Seek(position));
        self.time = position;
        Ok(())
    }

    fn set_volume(&mut self, level: f32) -> Result<(), DeviceError> {
        self.log.push(Cmd::Volume(level));
        Ok(())
    }

    fn current_time(&self) -> Duration {
        self.time
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }
}
