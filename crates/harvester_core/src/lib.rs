//! Harvester core: pure domain model for audiobook feeds.
//!
//! Nothing in this crate performs IO; the engine drives it.
mod feed;
mod progress;
mod slug;

pub use feed::{
    ordinal_timestamp, BookAddress, Feed, FeedItem, ENCLOSURE_LENGTH, ENCLOSURE_MIME_TYPE,
    FEED_EXTENSION, FEED_LANGUAGE, ORDINAL_SPACING_HOURS,
};
pub use progress::{HarvestProgress, ProgressLine};
pub use slug::{clean, SEPARATOR};
