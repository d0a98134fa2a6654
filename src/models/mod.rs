//! Data structures shared across the pipeline.

pub mod feed;
pub mod job;
pub mod ledger;

pub use feed::{Envelope, FeedMeta, normalize_company};
pub use job::{JobRecord, Region, Visibility};
pub use ledger::{LEDGER_FILE, Ledger, LedgerEntry};
