//! Importing audio files into the playlist.
//!
//! Files are filtered to the configured audio extensions, their tags are
//! read on a worker thread bounded by a timeout, and anything left
//! unresolved falls back to defaults. Importing never fails outright.

mod importer;
mod metadata;
mod scan;

pub use importer::*;
pub use metadata::*;
pub use scan::*;

#[cfg(test)]
mod tests;
