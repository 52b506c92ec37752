//! The transport controller: the only component that commands the playback
//! device. Every user action and every device event ends up as one of the
//! transition methods below.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

use crate::error::{DeviceError, PlayerError};
use crate::import::{ImportMessage, ImportedTrack, Importer};
use crate::playlist::Playlist;
use crate::view::{self, DisplayState, ViewInput};

use super::device::{DeviceEvent, DeviceEventKind, LoadTicket, PlaybackDevice};
use super::state::{
    Direction, PlayerState, Telemetry, clamp_volume, next_index, previous_index, shuffled_index,
    snap_volume,
};

pub struct TransportController<D: PlaybackDevice> {
    playlist: Playlist,
    device: D,
    events: Receiver<DeviceEvent>,
    /// Ticket of the source currently loaded on the device.
    ticket: Option<LoadTicket>,
    is_playing: bool,
    play_pending: bool,
    is_shuffle: bool,
    is_repeat: bool,
    volume: f32,
    /// Position the user is dragging the progress bar to, if a drag is in flight.
    drag: Option<Duration>,
    status: Option<String>,
    /// Errors in an unbroken chain of automatic skips.
    consecutive_errors: usize,
    rng: StdRng,
    import_tx: Sender<ImportMessage>,
    imports: Receiver<ImportMessage>,
    pending_imports: usize,
}

impl<D: PlaybackDevice> TransportController<D> {
    /// Take ownership of the playlist and device and load the current track
    /// (if any), paused.
    pub fn new(playlist: Playlist, device: D, events: Receiver<DeviceEvent>) -> Self {
        let (import_tx, imports) = mpsc::channel();
        let mut controller = Self {
            playlist,
            device,
            events,
            ticket: None,
            is_playing: false,
            play_pending: false,
            is_shuffle: false,
            is_repeat: false,
            volume: 1.0,
            drag: None,
            status: None,
            consecutive_errors: 0,
            rng: StdRng::from_os_rng(),
            import_tx,
            imports,
            pending_imports: 0,
        };
        controller.load_current();
        controller
    }

    /// Replace the shuffle RNG with a deterministic one.
    #[cfg(test)]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    #[cfg(test)]
    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn state(&self) -> PlayerState {
        PlayerState {
            current_index: self.playlist.current_index(),
            is_playing: self.is_playing,
            play_pending: self.play_pending,
            is_shuffle: self.is_shuffle,
            is_repeat: self.is_repeat,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Whether a background import is still running.
    pub fn is_importing(&self) -> bool {
        self.pending_imports > 0
    }

    #[cfg(test)]
    pub fn current_ticket(&self) -> Option<LoadTicket> {
        self.ticket
    }

    pub fn telemetry(&self) -> Telemetry {
        if self.ticket.is_none() {
            return Telemetry::default();
        }
        Telemetry {
            elapsed: self.device.current_time(),
            duration: self.total_duration(),
        }
    }

    /// Derive what the UI should show right now.
    pub fn display(&self) -> DisplayState {
        view::derive(&ViewInput {
            playlist: &self.playlist,
            state: self.state(),
            telemetry: self.telemetry(),
            volume: self.volume,
            drag: self.drag,
            status: self.status.as_deref(),
            importing: self.is_importing(),
        })
    }

    // ---- user-facing operations ----

    /// Play when paused, pause when playing. No-op on an empty playlist.
    pub fn toggle_playback(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        if self.is_playing || self.play_pending {
            self.pause();
        } else {
            if self.ticket.is_none() && !self.load_current() {
                return;
            }
            self.request_play();
        }
    }

    /// Move to the previous or next track on the user's behalf.
    pub fn advance(&mut self, direction: Direction) {
        self.consecutive_errors = 0;
        self.step(direction);
    }

    /// Jump to the track at `index`, keeping playback running if it was.
    pub fn select(&mut self, index: usize) {
        if !self.playlist.set_current(index) {
            debug!(index, "ignoring selection of missing track");
            return;
        }
        self.consecutive_errors = 0;
        self.change_track();
    }

    fn step(&mut self, direction: Direction) {
        let (Some(current), len) = (self.playlist.current_index(), self.playlist.len()) else {
            return;
        };
        let target = match direction {
            Direction::Previous => previous_index(current, len),
            Direction::Next if self.is_shuffle => shuffled_index(current, len, &mut self.rng),
            Direction::Next => next_index(current, len),
        };
        self.playlist.set_current(target);
        self.change_track();
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.is_shuffle = on;
    }

    pub fn set_repeat(&mut self, on: bool) {
        self.is_repeat = on;
    }

    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.is_shuffle);
    }

    pub fn toggle_repeat(&mut self) {
        self.set_repeat(!self.is_repeat);
    }

    /// Seek to `target`, clamped to the track length. Ignored while the
    /// progress bar is being dragged; the drag commits its own seek.
    pub fn seek_to(&mut self, target: Duration) {
        if self.drag.is_some() {
            debug!(?target, "seek suppressed while dragging");
            return;
        }
        if self.ticket.is_none() {
            return;
        }
        let target = self.clamp_position(target);
        if let Err(e) = self.device.seek(target) {
            warn!(error = %e, "seek failed");
        }
    }

    /// Seek relative to the current position by `delta_secs` seconds.
    pub fn seek_by(&mut self, delta_secs: i64) {
        let now = self.device.current_time();
        let step = Duration::from_secs(delta_secs.unsigned_abs());
        let target = if delta_secs < 0 {
            now.saturating_sub(step)
        } else {
            now.saturating_add(step)
        };
        self.seek_to(target);
    }

    pub fn begin_drag(&mut self) {
        if self.ticket.is_none() || self.drag.is_some() {
            return;
        }
        self.drag = Some(self.clamp_position(self.device.current_time()));
    }

    pub fn drag_to(&mut self, target: Duration) {
        if self.drag.is_some() {
            self.drag = Some(self.clamp_position(target));
        }
    }

    /// Move the drag position by `delta_secs`, starting a drag if needed.
    pub fn drag_by(&mut self, delta_secs: i64) {
        self.begin_drag();
        if let Some(pos) = self.drag {
            let step = Duration::from_secs(delta_secs.unsigned_abs());
            let target = if delta_secs < 0 {
                pos.saturating_sub(step)
            } else {
                pos.saturating_add(step)
            };
            self.drag_to(target);
        }
    }

    /// Release the drag and seek to where it ended.
    pub fn end_drag(&mut self) {
        if let Some(pos) = self.drag.take() {
            self.seek_to(pos);
        }
    }

    /// Drop the drag without seeking.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn set_volume(&mut self, level: f32) {
        self.volume = clamp_volume(level);
        if let Err(e) = self.device.set_volume(self.volume) {
            warn!(error = %e, "failed to apply volume");
        }
    }

    /// Step the volume by `delta`, landing on whole hundredths.
    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(snap_volume(self.volume + delta));
    }

    /// Remove the track at `index`. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) {
        let Some(removal) = self.playlist.remove_at(index) else {
            return;
        };
        info!(index, title = %removal.track.title, released = removal.released, "removed track");
        self.consecutive_errors = 0;

        if self.playlist.is_empty() {
            self.reset();
        } else if removal.was_current {
            self.change_track();
        }
    }

    /// Import `paths` on a worker thread. Tracks are appended as they arrive
    /// through [`pump_events`](Self::pump_events).
    pub fn import_in_background(&mut self, importer: &Arc<Importer>, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        match importer.spawn(paths, self.import_tx.clone()) {
            Ok(_) => self.pending_imports += 1,
            Err(e) => self.fail(PlayerError::Import(e)),
        }
    }

    // ---- device events ----

    /// Drain every device event and import result queued so far.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        while let Ok(message) = self.imports.try_recv() {
            self.handle_import(message);
            handled += 1;
        }
        handled
    }

    fn handle_import(&mut self, message: ImportMessage) {
        match message {
            ImportMessage::Track(track) => self.append_imported(track),
            ImportMessage::Finished(report) => {
                self.pending_imports = self.pending_imports.saturating_sub(1);
                debug!(added = report.added, skipped = report.skipped, "background import done");
            }
        }
    }

    /// The first track imported into an empty playlist is loaded straight away.
    fn append_imported(&mut self, mut track: ImportedTrack) {
        let fallback = track.fallback.take();
        let was_empty = self.playlist.is_empty();
        track.append_to(&mut self.playlist);
        if was_empty {
            self.load_current();
        }
        if let Some(err) = fallback {
            self.fail(PlayerError::Import(err));
        }
    }

    pub fn handle_event(&mut self, event: DeviceEvent) {
        if self.ticket != Some(event.ticket) {
            debug!(ticket = %event.ticket, kind = ?event.kind, "dropping event for superseded load");
            return;
        }
        match event.kind {
            DeviceEventKind::PlayStarted => self.on_play_started(),
            DeviceEventKind::PlayRejected(e) => self.on_play_rejected(e),
            DeviceEventKind::TimeUpdated(_) => self.consecutive_errors = 0,
            DeviceEventKind::MetadataReady(duration) => self.on_metadata_ready(duration),
            DeviceEventKind::Ended => self.on_track_ended(),
            DeviceEventKind::Error(reason) => self.on_playback_error(reason),
        }
    }

    fn on_play_started(&mut self) {
        self.consecutive_errors = 0;
        // A pause issued while the play was in flight wins.
        if !self.play_pending {
            debug!("play completed after being cancelled");
            return;
        }
        self.play_pending = false;
        self.is_playing = true;
        self.status = None;
    }

    fn on_play_rejected(&mut self, e: DeviceError) {
        self.play_pending = false;
        self.is_playing = false;
        self.fail(PlayerError::Playback(e));
    }

    fn on_metadata_ready(&mut self, duration: Duration) {
        self.consecutive_errors = 0;
        if duration.is_zero() {
            return;
        }
        if let Some(track) = self.playlist.current_mut() {
            track.set_duration(duration);
        }
    }

    /// Repeat restarts the same track; otherwise move on like `advance(Next)`.
    pub fn on_track_ended(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        if self.is_repeat {
            self.is_playing = false;
            if let Err(e) = self.device.seek(Duration::ZERO) {
                warn!(error = %e, "failed to rewind for repeat");
            }
            self.request_play();
        } else {
            self.advance(Direction::Next);
        }
    }

    /// Skip a track the device could not play. Once every track in a row has
    /// failed, stop instead of cycling forever.
    pub fn on_playback_error(&mut self, reason: String) {
        self.consecutive_errors += 1;
        self.fail(PlayerError::Device(reason));
        if self.consecutive_errors >= self.playlist.len() {
            warn!(failures = self.consecutive_errors, "no playable track left, pausing");
            self.pause();
            return;
        }
        self.step(Direction::Next);
    }

    // ---- internals ----

    fn change_track(&mut self) {
        let resume = self.is_playing || self.play_pending;
        if self.load_current() && resume {
            self.request_play();
        }
        debug!(index = ?self.playlist.current_index(), resume, "changed track");
    }

    /// Load the current track onto the device, paused. Returns false when
    /// there is nothing to load or loading failed.
    fn load_current(&mut self) -> bool {
        self.drag = None;
        self.is_playing = false;
        self.play_pending = false;

        let Some(index) = self.playlist.current_index() else {
            self.ticket = None;
            return false;
        };
        let Some(media) = self.playlist.media(index) else {
            self.ticket = None;
            self.fail(PlayerError::Load(DeviceError::NoSource));
            return false;
        };

        match self.device.load(media) {
            Ok(ticket) => {
                debug!(index, %ticket, "loaded track");
                self.ticket = Some(ticket);
                self.status = None;
                true
            }
            Err(e) => {
                self.ticket = None;
                self.fail(PlayerError::Load(e));
                false
            }
        }
    }

    fn request_play(&mut self) {
        match self.device.play() {
            Ok(()) => self.play_pending = true,
            Err(e) => {
                self.play_pending = false;
                self.is_playing = false;
                self.fail(PlayerError::Playback(e));
            }
        }
    }

    fn pause(&mut self) {
        if let Err(e) = self.device.pause() {
            warn!(error = %e, "pause command failed");
        }
        self.is_playing = false;
        self.play_pending = false;
    }

    /// Return to the empty-playlist state.
    fn reset(&mut self) {
        if let Err(e) = self.device.unload() {
            warn!(error = %e, "failed to unload device");
        }
        self.ticket = None;
        self.is_playing = false;
        self.play_pending = false;
        self.drag = None;
        self.consecutive_errors = 0;
        info!("playlist empty, playback reset");
    }

    fn total_duration(&self) -> Option<Duration> {
        self.device
            .duration()
            .or_else(|| self.playlist.current().and_then(|t| t.duration))
    }

    fn clamp_position(&self, target: Duration) -> Duration {
        match self.total_duration() {
            Some(total) => target.min(total),
            None => target,
        }
    }

    fn fail(&mut self, err: PlayerError) {
        match &err {
            PlayerError::Device(_) | PlayerError::Import(_) => warn!(error = %err, "player error"),
            PlayerError::Load(_) | PlayerError::Playback(_) => error!(error = %err, "player error"),
        }
        self.status = Some(err.status_text());
    }
}
