//! Source locators and the registry of transient (in-memory) sources.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Id of an in-memory source held by a [`SourceRegistry`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TransientId(u64);

impl fmt::Display for TransientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mem:{}", self.0)
    }
}

/// Where a track's audio comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    /// A file on disk, owned by nobody in particular.
    File(PathBuf),
    /// Bytes held by the registry until released.
    Transient(TransientId),
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Transient(id) => write!(f, "{id}"),
        }
    }
}

/// A locator resolved to something a playback device can open.
#[derive(Clone, PartialEq, Eq)]
pub enum MediaSource {
    File(PathBuf),
    Memory(Arc<[u8]>),
}

impl fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
        }
    }
}

/// Owns the bytes behind every live transient locator.
///
/// A device that is still playing a released source keeps its own `Arc`, so
/// releasing never pulls audio out from under the output thread.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    next_id: u64,
    entries: HashMap<TransientId, Arc<[u8]>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` and hand back a transient locator for them.
    pub fn allocate(&mut self, bytes: Vec<u8>) -> SourceLocator {
        let id = TransientId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, Arc::from(bytes));
        tracing::trace!(%id, live = self.live(), "allocated transient source");
        SourceLocator::Transient(id)
    }

    /// Release the bytes behind `locator`. Returns false for file locators and
    /// for ids that were already released.
    pub fn release(&mut self, locator: &SourceLocator) -> bool {
        match locator {
            SourceLocator::File(_) => false,
            SourceLocator::Transient(id) => {
                let released = self.entries.remove(id).is_some();
                if released {
                    tracing::trace!(%id, live = self.live(), "released transient source");
                }
                released
            }
        }
    }

    pub fn resolve(&self, locator: &SourceLocator) -> Option<MediaSource> {
        match locator {
            SourceLocator::File(path) => Some(MediaSource::File(path.clone())),
            SourceLocator::Transient(id) => self.entries.get(id).cloned().map(MediaSource::Memory),
        }
    }

    /// Number of transient sources not yet released.
    pub fn live(&self) -> usize {
        self.entries.len()
    }
}
