// Snapshot store
//
// Single-writer cell holding the snapshot currently on screen. Every write
// replaces the whole value; readers borrow whatever is current.

use super::Snapshot;
use std::time::Instant;
use thiserror::Error;

/// A fetched snapshot that lost the race against a newer one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("snapshot #{seq} is not newer than applied snapshot #{applied_seq}")]
pub struct StaleSnapshot {
    pub seq: u64,
    pub applied_seq: u64,
}

/// Owner of the current snapshot
///
/// Each fetch is tagged with a sequence number when it is issued. A result
/// is only applied if its sequence number is higher than the one currently
/// shown, so a slow response can never overwrite a fresher one.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Option<Snapshot>,
    applied_seq: Option<u64>,
    applied_at: Option<Instant>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot currently displayed, if any fetch has succeeded
    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    /// Sequence number of the snapshot currently displayed
    pub fn applied_seq(&self) -> Option<u64> {
        self.applied_seq
    }

    /// When the current snapshot was applied
    pub fn applied_at(&self) -> Option<Instant> {
        self.applied_at
    }

    /// Replace the current snapshot in one assignment
    ///
    /// Returns the snapshot that is now current.
    pub fn replace(&mut self, seq: u64, snapshot: Snapshot) -> Result<&Snapshot, StaleSnapshot> {
        if let Some(applied_seq) = self.applied_seq {
            if seq <= applied_seq {
                return Err(StaleSnapshot { seq, applied_seq });
            }
        }
        self.applied_seq = Some(seq);
        self.applied_at = Some(Instant::now());
        Ok(self.current.insert(snapshot))
    }
}
