use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::config::AudioSettings;
use crate::error::DeviceError;
use crate::playlist::MediaSource;
use crate::transport::{DeviceEvent, DeviceEventKind, LoadTicket};

use super::sink::create_sink_at;
use super::types::{AudioCmd, PlaybackHandle};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<DeviceEvent>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's
                // noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                error!(error = %e, "no audio output device; playback requests will be rejected");
                None
            }
        };

        let mut deck = Deck::new(stream, events, playback_info);
        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));

        loop {
            match rx.recv_timeout(tick) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    deck.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => deck.apply(cmd),
                Err(RecvTimeoutError::Timeout) => deck.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("audio thread finished");
    })
}

/// Everything the audio thread knows about the loaded source.
pub(super) struct Deck {
    stream: Option<OutputStream>,
    events: Sender<DeviceEvent>,
    info: PlaybackHandle,
    ticket: Option<LoadTicket>,
    media: Option<MediaSource>,
    sink: Option<Sink>,
    paused: bool,
    ended: bool,
    // Start time of the current run and elapsed time banked while paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    total: Option<Duration>,
    volume: f32,
}

impl Deck {
    pub(super) fn new(stream: Option<OutputStream>, events: Sender<DeviceEvent>, info: PlaybackHandle) -> Self {
        Self {
            stream,
            events,
            info,
            ticket: None,
            media: None,
            sink: None,
            paused: true,
            ended: false,
            started_at: None,
            accumulated: Duration::ZERO,
            total: None,
            volume: 1.0,
        }
    }

    pub(super) fn apply(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load { ticket, media } => self.load(ticket, media),
            AudioCmd::Unload => self.unload(),
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(position) => self.seek(position),
            AudioCmd::SetVolume(level) => {
                self.volume = level;
                if let Some(s) = self.sink.as_ref() {
                    s.set_volume(level);
                }
            }
            AudioCmd::Quit { fade_out_ms } => self.quit(fade_out_ms),
        }
    }

    /// Periodic report; also detects the end of the source.
    pub(super) fn tick(&mut self) {
        if self.paused {
            return;
        }
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        if sink.empty() {
            if !self.ended {
                self.bank_elapsed();
                self.paused = true;
                self.ended = true;
                self.publish();
                self.emit(DeviceEventKind::Ended);
            }
            return;
        }

        self.publish();
        self.emit(DeviceEventKind::TimeUpdated(self.elapsed()));
    }

    fn emit(&self, kind: DeviceEventKind) {
        if let Some(ticket) = self.ticket {
            // The receiver only goes away during shutdown.
            let _ = self.events.send(DeviceEvent::new(ticket, kind));
        }
    }

    fn elapsed(&self) -> Duration {
        let raw = self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        match self.total {
            Some(total) => raw.min(total),
            None => raw,
        }
    }

    fn bank_elapsed(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    fn publish(&self) {
        if let Ok(mut info) = self.info.lock() {
            info.ticket = self.ticket;
            info.elapsed = self.elapsed();
            info.duration = self.total;
        }
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn rewind_state(&mut self, position: Duration) {
        self.paused = true;
        self.ended = false;
        self.started_at = None;
        self.accumulated = position;
    }

    fn load(&mut self, ticket: LoadTicket, media: MediaSource) {
        self.stop_sink();
        self.ticket = Some(ticket);
        self.total = None;
        self.rewind_state(Duration::ZERO);

        if let Some(stream) = self.stream.as_ref() {
            match create_sink_at(stream, &media, Duration::ZERO) {
                Ok((sink, total)) => {
                    sink.set_volume(self.volume);
                    self.sink = Some(sink);
                    self.total = total;
                    self.media = Some(media);
                    if let Some(total) = total {
                        self.emit(DeviceEventKind::MetadataReady(total));
                    }
                }
                Err(e) => {
                    warn!(ticket = %ticket, source = ?media, error = %e, "failed to load source");
                    self.media = None;
                    self.emit(DeviceEventKind::Error(e.to_string()));
                }
            }
        } else {
            // Keep the source so a later play is answered with a rejection
            // naming the missing output rather than a missing source.
            self.media = Some(media);
        }
        self.publish();
    }

    fn unload(&mut self) {
        self.stop_sink();
        self.ticket = None;
        self.media = None;
        self.total = None;
        self.rewind_state(Duration::ZERO);
        self.publish();
    }

    fn play(&mut self) {
        if self.stream.is_none() {
            let reason = DeviceError::Output("no output device".to_string());
            self.emit(DeviceEventKind::PlayRejected(reason));
            return;
        }
        if self.ended {
            // Playing again after the end starts over.
            self.rebuild_at(Duration::ZERO);
        }
        let Some(sink) = self.sink.as_ref() else {
            self.emit(DeviceEventKind::PlayRejected(DeviceError::NoSource));
            return;
        };

        sink.play();
        if self.paused {
            self.started_at = Some(Instant::now());
            self.paused = false;
        }
        self.publish();
        self.emit(DeviceEventKind::PlayStarted);
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if !self.paused {
            self.bank_elapsed();
            self.paused = true;
        }
        self.publish();
    }

    fn seek(&mut self, position: Duration) {
        if self.media.is_none() {
            return;
        }
        let position = match self.total {
            Some(total) => position.min(total),
            None => position,
        };
        self.rebuild_at(position);
        self.publish();
        self.emit(DeviceEventKind::TimeUpdated(position));
    }

    /// Replace the sink with a fresh one that starts at `position`, keeping
    /// the play/pause state. Uses `Source::skip_duration` under the hood.
    fn rebuild_at(&mut self, position: Duration) {
        let was_playing = !self.paused;
        self.stop_sink();
        self.rewind_state(position);

        let (Some(stream), Some(media)) = (self.stream.as_ref(), self.media.as_ref()) else {
            return;
        };
        match create_sink_at(stream, media, position) {
            Ok((sink, _)) => {
                sink.set_volume(self.volume);
                if was_playing {
                    sink.play();
                    self.started_at = Some(Instant::now());
                    self.paused = false;
                }
                self.sink = Some(sink);
            }
            Err(e) => {
                warn!(error = %e, "failed to seek");
                self.emit(DeviceEventKind::Error(e.to_string()));
            }
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.as_ref() {
            if !self.paused {
                fade_out_sink(s, self.volume, fade_out_ms);
            }
            s.stop();
        }
        self.sink = None;
        self.paused = true;
        self.publish();
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
