use std::sync::Arc;

use harvest_logging::{harvest_debug, harvest_info};
use harvester_core::BookAddress;
use scraper::{Html, Selector};
use url::Url;

use crate::decode::page_text;
use crate::fetch::Fetcher;
use crate::{HarvestError, ListingError};

const BOOK_LINK_SELECTOR: &str = "article header h3.entry-title a";

/// Walks the paginated catalog and collects every book's detail page.
pub struct CatalogLister {
    fetcher: Arc<dyn Fetcher>,
    page_count: u32,
}

impl CatalogLister {
    pub fn new(fetcher: Arc<dyn Fetcher>, page_count: u32) -> Self {
        Self {
            fetcher,
            page_count,
        }
    }

    /// Fetches pages `1..=page_count` in order.
    ///
    /// The first page that cannot be fetched or parsed ends the listing; the
    /// error keeps what the earlier pages produced.
    pub async fn list_books(&self, base_url: &str) -> Result<Vec<BookAddress>, ListingError> {
        let mut addresses = Vec::new();
        for page in 1..=self.page_count {
            let page_url = listing_page_url(base_url, page);
            harvest_info!("Getting books at {}", page_url);

            let found = match self.fetch_page(&page_url).await {
                Ok(found) => found,
                Err(source) => {
                    return Err(ListingError {
                        page,
                        collected: addresses,
                        source,
                    })
                }
            };
            for address in &found {
                harvest_debug!("Found {}", address);
            }
            addresses.extend(found);
        }
        Ok(addresses)
    }

    async fn fetch_page(&self, page_url: &str) -> Result<Vec<BookAddress>, HarvestError> {
        let output = self
            .fetcher
            .fetch(page_url)
            .await
            .map_err(|err| HarvestError::fetch(page_url, err))?;
        let html = page_text(&output);
        parse_listing_page(&html, page_url)
    }
}

/// `<base>/page/<n>`
pub fn listing_page_url(base_url: &str, page: u32) -> String {
    format!("{}/page/{}", base_url.trim_end_matches('/'), page)
}

/// Book addresses of one listing page, in document order.
///
/// Relative links are resolved against `page_url`; anchors without a target
/// are skipped.
pub fn parse_listing_page(html: &str, page_url: &str) -> Result<Vec<BookAddress>, HarvestError> {
    let selector = Selector::parse(BOOK_LINK_SELECTOR)
        .map_err(|err| HarvestError::parse(page_url, err.to_string()))?;
    let base = Url::parse(page_url).ok();
    let doc = Html::parse_document(html);

    Ok(doc
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| resolve(base.as_ref(), href))
        .collect())
}

pub(crate) fn resolve(base: Option<&Url>, href: &str) -> String {
    base.and_then(|base| base.join(href).ok())
        .map(String::from)
        .unwrap_or_else(|| href.to_string())
}
