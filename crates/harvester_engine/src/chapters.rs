use std::sync::Arc;

use harvest_logging::harvest_warn;
use scraper::Html;
use serde::Deserialize;

use crate::detail::ChapterEntry;
use crate::fetch::Fetcher;
use crate::HarvestError;

/// Fields requested from the station API; only title and stream are read.
const STATION_FIELDS: &str = "title,meta.stream,media.download_url";

/// A chapter ready to become a feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Position on the detail page.
    pub index: usize,
    pub title: String,
    pub media_url: String,
}

/// Turns the chapter blocks of one detail page into chapters.
///
/// Chapters that cannot be resolved are logged and left out; the result
/// keeps page order.
#[async_trait::async_trait]
pub trait ChapterSource: Send + Sync {
    async fn chapters(&self, page_url: &str, entries: &[ChapterEntry]) -> Vec<Chapter>;
}

/// Resolves each play-id through the WordPress station endpoint, one chapter
/// at a time.
pub struct StationApiSource {
    fetcher: Arc<dyn Fetcher>,
    api_url: String,
}

impl StationApiSource {
    pub fn new(fetcher: Arc<dyn Fetcher>, api_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            api_url: api_url.into(),
        }
    }

    pub fn station_url(&self, play_id: &str) -> String {
        format!(
            "{}/{}?_fields={}",
            self.api_url.trim_end_matches('/'),
            play_id,
            STATION_FIELDS
        )
    }

    async fn resolve(&self, page_url: &str, entry: &ChapterEntry) -> Result<Chapter, HarvestError> {
        let chapter_error = |reference: &str, message: String| HarvestError::Chapter {
            url: page_url.to_string(),
            reference: reference.to_string(),
            message,
        };

        let play_id = entry
            .play_id
            .as_deref()
            .ok_or_else(|| chapter_error(&format!("#{}", entry.index), "no play id".into()))?;
        let station_url = self.station_url(play_id);
        let output = self
            .fetcher
            .fetch(&station_url)
            .await
            .map_err(|err| chapter_error(play_id, format!("{station_url}: {err}")))?;
        let station: Station = serde_json::from_slice(&output.bytes)
            .map_err(|err| chapter_error(play_id, format!("invalid station json: {err}")))?;

        Ok(Chapter {
            index: entry.index,
            title: rendered_text(&station.title.rendered),
            media_url: station.meta.stream.trim().to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ChapterSource for StationApiSource {
    async fn chapters(&self, page_url: &str, entries: &[ChapterEntry]) -> Vec<Chapter> {
        let mut chapters = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.resolve(page_url, entry).await {
                Ok(chapter) => chapters.push(chapter),
                Err(err) => harvest_warn!("{}", err),
            }
        }
        chapters
    }
}

/// Reads title and download link written inline on the detail page.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectLinkSource;

#[async_trait::async_trait]
impl ChapterSource for DirectLinkSource {
    async fn chapters(&self, _page_url: &str, entries: &[ChapterEntry]) -> Vec<Chapter> {
        entries
            .iter()
            .map(|entry| Chapter {
                index: entry.index,
                title: entry.title.clone().unwrap_or_default(),
                media_url: entry.download_url.clone().unwrap_or_default(),
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct Station {
    #[serde(default)]
    title: Rendered,
    #[serde(default)]
    meta: StationMeta,
}

#[derive(Debug, Default, Deserialize)]
struct Rendered {
    #[serde(default)]
    rendered: String,
}

#[derive(Debug, Default, Deserialize)]
struct StationMeta {
    #[serde(default)]
    stream: String,
}

/// WordPress renders titles as HTML; keep the text only.
fn rendered_text(rendered: &str) -> String {
    Html::parse_fragment(rendered)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}
