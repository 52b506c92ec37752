use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::thread::Deck;
use super::types::{AudioCmd, PlaybackInfo};
use crate::error::DeviceError;
use crate::playlist::MediaSource;
use crate::transport::{DeviceEvent, DeviceEventKind, LoadTicket};

fn headless_deck() -> (Deck, mpsc::Receiver<DeviceEvent>, Arc<Mutex<PlaybackInfo>>) {
    let (tx, rx) = mpsc::channel();
    let info = Arc::new(Mutex::new(PlaybackInfo::default()));
    (Deck::new(None, tx, info.clone()), rx, info)
}

#[test]
fn play_without_output_is_rejected_with_the_load_ticket() {
    let (mut deck, rx, _) = headless_deck();
    deck.apply(AudioCmd::Load {
        ticket: LoadTicket(3),
        media: MediaSource::File(PathBuf::from("/nowhere/song.mp3")),
    });
    deck.apply(AudioCmd::Play);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.ticket, LoadTicket(3));
    assert!(matches!(
        event.kind,
        DeviceEventKind::PlayRejected(DeviceError::Output(_))
    ));
    assert!(rx.try_recv().is_err());
}

#[test]
fn load_publishes_ticket_and_resets_elapsed() {
    let (mut deck, _rx, info) = headless_deck();
    deck.apply(AudioCmd::Load {
        ticket: LoadTicket(7),
        media: MediaSource::Memory(Arc::from(&b"bytes"[..])),
    });

    let info = info.lock().unwrap().clone();
    assert_eq!(info.ticket, Some(LoadTicket(7)));
    assert_eq!(info.elapsed, Duration::ZERO);
    assert_eq!(info.duration, None);
}

#[test]
fn unload_clears_shared_ticket() {
    let (mut deck, rx, info) = headless_deck();
    deck.apply(AudioCmd::Load {
        ticket: LoadTicket(1),
        media: MediaSource::File(PathBuf::from("/nowhere/song.mp3")),
    });
    deck.apply(AudioCmd::Unload);
    deck.apply(AudioCmd::Play);

    assert_eq!(info.lock().unwrap().ticket, None);
    // Without a ticket there is nobody to address the rejection to.
    assert!(rx.try_recv().is_err());
}

#[test]
fn tick_while_paused_emits_nothing() {
    let (mut deck, rx, _) = headless_deck();
    deck.apply(AudioCmd::Load {
        ticket: LoadTicket(2),
        media: MediaSource::File(PathBuf::from("/nowhere/song.mp3")),
    });
    deck.tick();
    assert!(rx.try_recv().is_err());
}
