use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::config::AudioSettings;
use crate::error::DeviceError;
use crate::playlist::MediaSource;
use crate::transport::{DeviceEvent, LoadTicket, PlaybackDevice};

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Handle to the audio thread. Implements [`PlaybackDevice`].
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    ticket: Option<LoadTicket>,
    next_ticket: u64,
    join: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    /// Start the audio thread. The receiver carries the thread's events.
    pub fn new(audio_settings: &AudioSettings) -> (Self, Receiver<DeviceEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events_rx) = mpsc::channel::<DeviceEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, events_tx, playback_info.clone(), audio_settings.clone());

        let player = Self {
            tx,
            playback: playback_info,
            ticket: None,
            next_ticket: 0,
            join: Some(audio_handle),
        };
        (player, events_rx)
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), DeviceError> {
        self.tx.send(cmd).map_err(|_| DeviceError::Disconnected)
    }

    /// Shared info, but only when it describes the current load.
    fn current_info(&self) -> Option<PlaybackInfo> {
        let info = self.playback.lock().ok()?;
        (info.ticket.is_some() && info.ticket == self.ticket).then(|| info.clone())
    }

    pub fn quit_softly(&mut self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl PlaybackDevice for AudioPlayer {
    fn load(&mut self, media: MediaSource) -> Result<LoadTicket, DeviceError> {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        debug!(ticket = %ticket, source = ?media, "loading source");
        self.send(AudioCmd::Load { ticket, media })?;
        self.ticket = Some(ticket);
        Ok(ticket)
    }

    fn unload(&mut self) -> Result<(), DeviceError> {
        self.ticket = None;
        self.send(AudioCmd::Unload)
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) -> Result<(), DeviceError> {
        self.send(AudioCmd::Pause)
    }

    fn seek(&mut self, position: Duration) -> Result<(), DeviceError> {
        self.send(AudioCmd::Seek(position))
    }

    fn set_volume(&mut self, level: f32) -> Result<(), DeviceError> {
        self.send(AudioCmd::SetVolume(level))
    }

    fn current_time(&self) -> Duration {
        self.current_info().map_or(Duration::ZERO, |info| info.elapsed)
    }

    fn duration(&self) -> Option<Duration> {
        self.current_info().and_then(|info| info.duration)
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        if self.join.is_some() {
            self.quit_softly(Duration::ZERO);
        }
    }
}
