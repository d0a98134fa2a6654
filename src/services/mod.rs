//! External data acquisition services.

pub mod feed;

pub use feed::{FeedClient, FeedPayload, parse_feed};
