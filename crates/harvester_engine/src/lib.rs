//! Harvester engine: catalog listing, feed building and the worker pool.
mod builder;
mod catalog;
mod chapters;
mod config;
mod decode;
mod detail;
mod engine;
mod fetch;
mod persist;
mod render;
mod types;

pub use builder::FeedBuilder;
pub use catalog::{listing_page_url, parse_listing_page, CatalogLister};
pub use chapters::{Chapter, ChapterSource, DirectLinkSource, StationApiSource};
pub use config::{
    available_workers, ChapterStrategy, Clock, HarvestConfig, CATALOG_PAGES, LISTING_URL,
    STATION_API_URL,
};
pub use decode::{decode_html, DecodedHtml};
pub use detail::{parse_detail_page, ChapterEntry, DetailPage};
pub use engine::{harvest, BookProcessor, Completion, HarvestReport};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use render::render_feed;
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, HarvestError, ListingError};
