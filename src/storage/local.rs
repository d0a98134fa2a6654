//! Local filesystem sink.
//!
//! ## Output layout
//!
//! ```text
//! {root}/
//! ├── worldwide/            # primary target
//! │   ├── jobs.md
//! │   ├── jobs.json
//! │   ├── summary.txt
//! │   └── ledger.json
//! ├── emea/                 # secondary targets
//! └── apac/
//! ```
//!
//! Writes go through a temp file and rename so a crash never leaves a
//! half-written artifact behind. In dry-run mode nothing is mutated; each
//! intended write is logged with its byte length.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{LEDGER_FILE, Ledger};
use crate::storage::{OutputSink, WritePlan};

/// Filesystem-backed output sink.
#[derive(Clone)]
pub struct LocalSink {
    root_dir: PathBuf,
    dry_run: bool,
}

impl LocalSink {
    /// Create a sink rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root_dir: root_dir.into(),
            dry_run,
        }
    }

    fn path(&self, rel: &Path) -> PathBuf {
        self.root_dir.join(rel)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, rel: &Path, bytes: &[u8]) -> Result<()> {
        let path = self.path(rel);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, rel: &Path) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(rel)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl OutputSink for LocalSink {
    async fn commit(&self, plan: &WritePlan) -> Result<()> {
        if self.dry_run {
            for write in &plan.writes {
                log::info!(
                    "[dry-run] would write {} ({} bytes)",
                    self.path(&write.path).display(),
                    write.bytes.len()
                );
            }
            return Ok(());
        }
        for write in &plan.writes {
            self.write_bytes(&write.path, &write.bytes).await?;
            log::debug!(
                "Wrote {} ({} bytes)",
                self.path(&write.path).display(),
                write.bytes.len()
            );
        }
        Ok(())
    }

    async fn load_ledger(&self, target_dir: &Path) -> Ledger {
        let rel = target_dir.join(LEDGER_FILE);
        match self.read_bytes(&rel).await {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                log::warn!("Ledger at {rel:?} is unreadable ({e}); treating as empty");
                Ledger::default()
            }),
            Ok(None) => {
                log::debug!("No ledger at {rel:?} yet");
                Ledger::default()
            }
            Err(e) => {
                log::warn!("Failed to read ledger at {rel:?} ({e}); treating as empty");
                Ledger::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LedgerEntry;
    use tempfile::TempDir;

    #[tokio::test]
    async fn commit_creates_directories_and_writes() {
        let tmp = TempDir::new().unwrap();
        let sink = LocalSink::new(tmp.path(), false);

        let mut plan = WritePlan::default();
        plan.add("emea/jobs.md", b"# Jobs".to_vec());
        sink.commit(&plan).await.unwrap();

        let content = std::fs::read(tmp.path().join("emea/jobs.md")).unwrap();
        assert_eq!(content, b"# Jobs");
    }

    #[tokio::test]
    async fn commit_overwrites_prior_content() {
        let tmp = TempDir::new().unwrap();
        let sink = LocalSink::new(tmp.path(), false);

        let mut first = WritePlan::default();
        first.add("jobs.md", b"old".to_vec());
        sink.commit(&first).await.unwrap();

        let mut second = WritePlan::default();
        second.add("jobs.md", b"new".to_vec());
        sink.commit(&second).await.unwrap();

        let content = std::fs::read(tmp.path().join("jobs.md")).unwrap();
        assert_eq!(content, b"new");
    }

    #[tokio::test]
    async fn dry_run_mutates_nothing() {
        let tmp = TempDir::new().unwrap();
        let sink = LocalSink::new(tmp.path(), true);

        let mut plan = WritePlan::default();
        plan.add("emea/jobs.md", b"# Jobs".to_vec());
        sink.commit(&plan).await.unwrap();

        assert!(!tmp.path().join("emea").exists());
    }

    #[tokio::test]
    async fn missing_ledger_is_empty() {
        let tmp = TempDir::new().unwrap();
        let sink = LocalSink::new(tmp.path(), false);
        let ledger = sink.load_ledger(Path::new("emea")).await;
        assert!(ledger.entries.is_empty());
    }

    #[tokio::test]
    async fn corrupt_ledger_degrades_to_empty() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("emea")).unwrap();
        std::fs::write(tmp.path().join("emea/ledger.json"), b"{broken").unwrap();

        let sink = LocalSink::new(tmp.path(), false);
        let ledger = sink.load_ledger(Path::new("emea")).await;
        assert!(ledger.entries.is_empty());
    }

    #[tokio::test]
    async fn ledger_round_trip() {
        let tmp = TempDir::new().unwrap();
        let sink = LocalSink::new(tmp.path(), false);

        let ledger = Ledger {
            entries: vec![LedgerEntry {
                revision: "20260226043500".into(),
                timestamp: "26-Feb-2026 04:35 UTC".into(),
                summary: "128 jobs".into(),
            }],
        };
        let mut plan = WritePlan::default();
        plan.add("ww/ledger.json", serde_json::to_vec_pretty(&ledger).unwrap());
        sink.commit(&plan).await.unwrap();

        let loaded = sink.load_ledger(Path::new("ww")).await;
        assert_eq!(loaded, ledger);
    }
}
