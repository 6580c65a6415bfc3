use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::fetch::FetchSettings;

/// Ranked catalog of the free audiobooks, paginated as `<base>/page/<n>`.
pub const LISTING_URL: &str =
    "https://www.litteratureaudio.com/classement-de-nos-livres-audio-gratuits-les-plus-apprecies";
/// Number of listing pages; the catalog size is known ahead of time.
pub const CATALOG_PAGES: u32 = 276;
/// WordPress endpoint resolving a chapter play-id to its stream.
pub const STATION_API_URL: &str = "https://www.litteratureaudio.com/wp-json/wp/v2/station";

/// Where chapter titles and media addresses come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChapterStrategy {
    /// Resolve each `data-play-id` through the station API.
    #[default]
    StationApi,
    /// Read title and download link straight from the page.
    DirectLink,
}

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct HarvestConfig {
    pub listing_url: String,
    pub catalog_pages: u32,
    pub station_api_url: String,
    pub strategy: ChapterStrategy,
    pub workers: usize,
    pub output_dir: PathBuf,
    pub fetch: FetchSettings,
    /// Base time for the ordinal timestamps of a feed.
    pub clock: Clock,
}

impl HarvestConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            listing_url: LISTING_URL.to_string(),
            catalog_pages: CATALOG_PAGES,
            station_api_url: STATION_API_URL.to_string(),
            strategy: ChapterStrategy::default(),
            workers: available_workers(),
            output_dir,
            fetch: FetchSettings::default(),
            clock: Arc::new(Utc::now),
        }
    }
}

impl std::fmt::Debug for HarvestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarvestConfig")
            .field("listing_url", &self.listing_url)
            .field("catalog_pages", &self.catalog_pages)
            .field("station_api_url", &self.station_api_url)
            .field("strategy", &self.strategy)
            .field("workers", &self.workers)
            .field("output_dir", &self.output_dir)
            .field("fetch", &self.fetch)
            .finish_non_exhaustive()
    }
}

/// One worker per unit of host parallelism.
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
