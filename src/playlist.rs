//! Playlist store: the ordered list of tracks plus the current-index cursor.
//!
//! Track identity is its position in the store. Tracks imported at runtime keep
//! their audio bytes in a [`SourceRegistry`] owned by the store, and removing a
//! track releases them.

mod model;
mod source;
mod store;

pub use model::*;
pub use source::*;
pub use store::*;
