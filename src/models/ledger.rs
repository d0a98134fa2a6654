//! Structured publication ledger.
//!
//! Each output target keeps a `ledger.json` next to its published
//! artifacts: an ordered-by-recency array of entries, newest first. The
//! cross-target history table is built by matching entries on their
//! timestamp string, so every target must stamp entries with the same
//! fixed format (see [`crate::format::display_datetime`]).

use serde::{Deserialize, Serialize};

/// File name of the per-target publication ledger.
pub const LEDGER_FILE: &str = "ledger.json";

/// One prior publication of a target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Revision identifier assigned by the target's own versioning
    pub revision: String,

    /// Publication timestamp, `%d-%b-%Y %H:%M UTC`
    pub timestamp: String,

    /// Job-count summary line published with that revision
    pub summary: String,
}

/// A target's publication history, newest entry first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Ledger {
    pub entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Find the entry published at the given timestamp, if any.
    pub fn entry_at(&self, timestamp: &str) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.timestamp == timestamp)
    }

    /// Prepend a new entry, keeping newest-first order.
    pub fn push_front(&mut self, entry: LedgerEntry) {
        self.entries.insert(0, entry);
    }
}
