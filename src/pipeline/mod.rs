//! Pipeline entry points.
//!
//! - `run_publish`: fetch the feed, render every target, commit the writes

pub mod publish;

pub use publish::run_publish;
