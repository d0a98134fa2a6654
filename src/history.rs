// src/history.rs

//! Cross-target publication history.
//!
//! Every target maintains its own `ledger.json`; runs are matched across
//! targets by the identical publication timestamp stamped into each entry.
//! The combined table has one row per entry in the primary target's ledger;
//! a secondary target only contributes a cell where a matching timestamp
//! exists.

use crate::models::Ledger;

/// One reconciled timeline across all targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTable {
    /// Column labels for the secondary targets, in publication order
    pub labels: Vec<String>,
    /// Rows in the primary ledger's order (newest first)
    pub rows: Vec<HistoryRow>,
}

/// One publication event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// Matching key: the shared publication timestamp
    pub timestamp: String,
    /// Primary target's summary for this event
    pub primary: String,
    /// Per-secondary summaries; `None` where the target has no matching entry
    pub cells: Vec<Option<String>>,
}

/// Reconcile the primary ledger with each secondary ledger.
///
/// Unreadable ledgers are expected to arrive here already degraded to
/// empty ones; this function never fails.
pub fn aggregate(primary: &Ledger, secondaries: &[(String, Ledger)]) -> HistoryTable {
    let labels = secondaries.iter().map(|(label, _)| label.clone()).collect();
    let rows = primary
        .entries
        .iter()
        .map(|entry| HistoryRow {
            timestamp: entry.timestamp.clone(),
            primary: entry.summary.clone(),
            cells: secondaries
                .iter()
                .map(|(_, ledger)| {
                    ledger
                        .entry_at(&entry.timestamp)
                        .map(|e| e.summary.clone())
                })
                .collect(),
        })
        .collect();
    HistoryTable { labels, rows }
}
