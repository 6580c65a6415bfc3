use chrono::{DateTime, Duration, Utc};

use crate::slug::clean;

/// Address of one audiobook detail page.
pub type BookAddress = String;

pub const FEED_LANGUAGE: &str = "fr";
pub const FEED_EXTENSION: &str = "rss";
pub const ENCLOSURE_MIME_TYPE: &str = "audio/mpeg";
/// Placeholder; the real media size is never fetched.
pub const ENCLOSURE_LENGTH: &str = "1000000";
pub const ORDINAL_SPACING_HOURS: i64 = 24;

/// Synthetic publish date for the chapter at `index`.
///
/// Players that sort by date then play chapters in page order.
pub fn ordinal_timestamp(base: DateTime<Utc>, index: usize) -> DateTime<Utc> {
    base + Duration::hours(ORDINAL_SPACING_HOURS * index as i64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub media_url: String,
    pub description: String,
    pub published: DateTime<Utc>,
}

/// One book's feed, filled in as the detail page is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub title: String,
    pub description: String,
    pub language: String,
    pub author_name: String,
    pub cover_image_url: Option<String>,
    pub source_link: BookAddress,
    pub items: Vec<FeedItem>,
}

impl Feed {
    /// Starts a feed with trimmed title and author and no chapters.
    pub fn new(source_link: impl Into<BookAddress>, title: &str, author_name: &str) -> Self {
        let title = title.trim().to_string();
        Self {
            description: title.clone(),
            title,
            language: FEED_LANGUAGE.to_string(),
            author_name: author_name.trim().to_string(),
            cover_image_url: None,
            source_link: source_link.into(),
            items: Vec::new(),
        }
    }

    pub fn with_cover(mut self, cover_image_url: Option<String>) -> Self {
        self.cover_image_url = cover_image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self
    }

    /// Slug of `"<author> <title>"`, or `None` when nothing usable remains.
    pub fn slug(&self) -> Option<String> {
        let slug = clean(&format!("{} {}", self.author_name, self.title));
        (!slug.is_empty()).then_some(slug)
    }

    /// On-disk name of the feed: `<slug>.rss`.
    pub fn filename(&self) -> Option<String> {
        self.slug().map(|slug| format!("{slug}.{FEED_EXTENSION}"))
    }

    /// Appends the chapter found at position `index` on the page.
    pub fn push_chapter(
        &mut self,
        index: usize,
        title: impl Into<String>,
        media_url: impl Into<String>,
        base: DateTime<Utc>,
    ) {
        let title = title.into();
        self.items.push(FeedItem {
            description: title.clone(),
            title,
            media_url: media_url.into(),
            published: ordinal_timestamp(base, index),
        });
    }
}
