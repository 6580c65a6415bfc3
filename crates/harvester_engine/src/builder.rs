use std::path::PathBuf;
use std::sync::Arc;

use harvest_logging::{harvest_debug, harvest_info};
use harvester_core::Feed;

use crate::chapters::{ChapterSource, DirectLinkSource, StationApiSource};
use crate::config::{ChapterStrategy, Clock, HarvestConfig};
use crate::decode::page_text;
use crate::detail::parse_detail_page;
use crate::engine::BookProcessor;
use crate::fetch::Fetcher;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::render::render_feed;
use crate::HarvestError;

/// Builds and writes the feed of one book from its detail page.
pub struct FeedBuilder {
    fetcher: Arc<dyn Fetcher>,
    chapters: Arc<dyn ChapterSource>,
    writer: AtomicFileWriter,
    clock: Clock,
}

impl FeedBuilder {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        chapters: Arc<dyn ChapterSource>,
        writer: AtomicFileWriter,
        clock: Clock,
    ) -> Self {
        Self {
            fetcher,
            chapters,
            writer,
            clock,
        }
    }

    /// Wires the chapter strategy and output directory named by `config`.
    pub fn from_config(fetcher: Arc<dyn Fetcher>, config: &HarvestConfig) -> Self {
        let chapters: Arc<dyn ChapterSource> = match config.strategy {
            ChapterStrategy::StationApi => Arc::new(StationApiSource::new(
                fetcher.clone(),
                config.station_api_url.clone(),
            )),
            ChapterStrategy::DirectLink => Arc::new(DirectLinkSource),
        };
        Self::new(
            fetcher,
            chapters,
            AtomicFileWriter::new(config.output_dir.clone()),
            config.clock.clone(),
        )
    }

    /// Assembles the feed for `address` without writing it.
    ///
    /// Fails before any chapter is resolved when author and title leave no
    /// usable filename.
    pub async fn assemble(&self, address: &str) -> Result<(String, Feed), HarvestError> {
        let output = self
            .fetcher
            .fetch(address)
            .await
            .map_err(|err| HarvestError::fetch(address, err))?;
        let html = page_text(&output);
        let page = parse_detail_page(&html, address)?;

        let mut feed =
            Feed::new(address, &page.title, &page.author_name).with_cover(page.cover_image_url);
        let filename = feed.filename().ok_or_else(|| HarvestError::EmptyTitle {
            url: address.to_string(),
        })?;

        let chapters = self.chapters.chapters(address, &page.chapters).await;
        harvest_debug!(
            "{}: {} of {} chapters resolved",
            address,
            chapters.len(),
            page.chapters.len()
        );

        let base = (self.clock)();
        for chapter in chapters {
            feed.push_chapter(chapter.index, chapter.title, chapter.media_url, base);
        }
        Ok((filename, feed))
    }

    /// Builds the feed for `address` and writes `<slug>.rss`, replacing any
    /// previous file of that name.
    pub async fn build(&self, address: &str) -> Result<PathBuf, HarvestError> {
        let (filename, feed) = self.assemble(address).await?;
        let document = render_feed(&feed)?;

        let writer = self.writer.clone();
        let path = tokio::task::spawn_blocking(move || writer.write(&filename, &document))
            .await
            .map_err(|err| PersistError::Io(std::io::Error::other(err)))??;

        harvest_info!(
            "Wrote {} ({} chapters)",
            path.display(),
            feed.items.len()
        );
        Ok(path)
    }
}

#[async_trait::async_trait]
impl BookProcessor for FeedBuilder {
    async fn process(&self, address: &str) -> Result<PathBuf, HarvestError> {
        self.build(address).await
    }
}
