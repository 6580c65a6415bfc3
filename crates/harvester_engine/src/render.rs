use harvester_core::{Feed, FeedItem, ENCLOSURE_LENGTH, ENCLOSURE_MIME_TYPE};
use rss::{Channel, ChannelBuilder, EnclosureBuilder, ImageBuilder, Item, ItemBuilder};

use crate::HarvestError;

/// Serializes a feed as an RSS 2.0 document.
pub fn render_feed(feed: &Feed) -> Result<String, HarvestError> {
    let channel = build_channel(feed);
    let bytes = channel
        .pretty_write_to(Vec::new(), b' ', 2)
        .map_err(|err| serialize_error(feed, err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| serialize_error(feed, err.to_string()))
}

fn build_channel(feed: &Feed) -> Channel {
    let image = feed.cover_image_url.as_ref().map(|url| {
        ImageBuilder::default()
            .url(url.clone())
            .title(feed.title.clone())
            .link(feed.source_link.clone())
            .build()
    });
    let managing_editor = (!feed.author_name.is_empty()).then(|| feed.author_name.clone());

    ChannelBuilder::default()
        .title(feed.title.clone())
        .link(feed.source_link.clone())
        .description(feed.description.clone())
        .language(Some(feed.language.clone()))
        .managing_editor(managing_editor)
        .image(image)
        .items(feed.items.iter().map(build_item).collect::<Vec<_>>())
        .build()
}

fn build_item(item: &FeedItem) -> Item {
    let enclosure = EnclosureBuilder::default()
        .url(item.media_url.clone())
        .mime_type(ENCLOSURE_MIME_TYPE)
        .length(ENCLOSURE_LENGTH)
        .build();

    ItemBuilder::default()
        .title(Some(item.title.clone()))
        .link(Some(item.media_url.clone()))
        .description(Some(item.description.clone()))
        .enclosure(Some(enclosure))
        .pub_date(Some(item.published.to_rfc2822()))
        .build()
}

fn serialize_error(feed: &Feed, message: String) -> HarvestError {
    HarvestError::Serialize {
        url: feed.source_link.clone(),
        message,
    }
}
