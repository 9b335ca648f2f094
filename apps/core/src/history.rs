use std::sync::Mutex;
use tracing::warn;

use crate::models::PlaylistHistoryEntry;

/// Entries shown by default when listing recent playlists
pub const RECENT_HISTORY_LEN: usize = 5;

/// Process-local, append-only record of generated playlists
#[derive(Debug, Default)]
pub struct PlaylistHistory {
    entries: Mutex<Vec<PlaylistHistoryEntry>>,
}

impl PlaylistHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: PlaylistHistoryEntry) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => {
                warn!("History lock poisoned, recovering");
                poisoned.into_inner().push(entry);
            }
        }
    }

    /// Up to `n` entries, newest first
    pub fn recent(&self, n: usize) -> Vec<PlaylistHistoryEntry> {
        let entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.iter().rev().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
