//! The rodio-backed playback device.
//!
//! A dedicated thread owns the output stream and the current `Sink`. The
//! [`AudioPlayer`] handle sends it commands over a channel; the thread answers
//! with [`DeviceEvent`](crate::transport::DeviceEvent)s and publishes elapsed
//! time through a shared [`PlaybackHandle`].

mod player;
mod sink;
mod thread;
mod types;

pub use player::*;
pub use types::*;

#[cfg(test)]
mod tests;
