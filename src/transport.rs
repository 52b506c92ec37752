//! Transport control: playback intent (playing/paused, shuffle, repeat), the
//! progress drag gate and volume, plus the [`PlaybackDevice`] seam the
//! controller drives.

mod controller;
mod device;
mod state;

pub use controller::*;
pub use device::*;
pub use state::*;

#[cfg(test)]
pub(crate) mod testing;
