//! Output sink abstractions.
//!
//! The pipeline renders every artifact into a [`WritePlan`] first and only
//! then asks a sink to commit it. Buffering all writes behind the render
//! phase is what makes "all targets or none" hold at the render boundary;
//! an I/O failure mid-commit is still fatal for the run.

pub mod local;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Ledger;

// Re-export for convenience
pub use local::LocalSink;

/// One pending file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    /// Path relative to the sink root
    pub path: PathBuf,
    /// Full file content
    pub bytes: Vec<u8>,
}

/// The buffered output of a complete render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritePlan {
    pub writes: Vec<PlannedWrite>,
}

impl WritePlan {
    /// Queue a write. Paths are relative to the sink root; commit order is
    /// insertion order.
    pub fn add(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.writes.push(PlannedWrite {
            path: path.into(),
            bytes,
        });
    }

    /// Total bytes across all planned writes.
    pub fn total_bytes(&self) -> usize {
        self.writes.iter().map(|w| w.bytes.len()).sum()
    }
}

/// Destination for published artifacts.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Write every planned file, creating directories as needed. Any
    /// failure propagates; nothing is silently swallowed.
    async fn commit(&self, plan: &WritePlan) -> Result<()>;

    /// Load a target's publication ledger. A missing or unreadable ledger
    /// is an empty one, never an error.
    async fn load_ledger(&self, target_dir: &Path) -> Ledger;
}
