use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::catalog::resolve;
use crate::HarvestError;

const TITLE_SELECTOR: &str = "article.post .header-station > .entry-header h1.entry-title";
const AUTHOR_SELECTOR: &str = "article.post .header-station > .entry-header .entry-auteur a";
const COVER_SELECTOR: &str = "article.post .header-station .post-thumbnail img";
const CHAPTER_SELECTOR: &str = "article.album-track";
const CHAPTER_TITLE_SELECTOR: &str = ".entry-header .entry-title";
const CHAPTER_LINK_SELECTOR: &str = ".entry-footer a.no-ajax";
const PLAY_ID_ATTR: &str = "data-play-id";

/// What a detail page says about a book, before any chapter is resolved.
///
/// Missing elements stay empty; only the title-derived filename is checked
/// later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    pub title: String,
    pub author_name: String,
    pub cover_image_url: Option<String>,
    pub chapters: Vec<ChapterEntry>,
}

/// One `album-track` block, holding the fields either strategy may need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterEntry {
    /// Position on the page, starting at 0.
    pub index: usize,
    pub play_id: Option<String>,
    pub title: Option<String>,
    pub download_url: Option<String>,
}

struct Selectors {
    title: Selector,
    author: Selector,
    cover: Selector,
    chapter: Selector,
    chapter_title: Selector,
    chapter_link: Selector,
}

impl Selectors {
    fn new(url: &str) -> Result<Self, HarvestError> {
        let parse = |css: &str| {
            Selector::parse(css).map_err(|err| HarvestError::parse(url, err.to_string()))
        };
        Ok(Self {
            title: parse(TITLE_SELECTOR)?,
            author: parse(AUTHOR_SELECTOR)?,
            cover: parse(COVER_SELECTOR)?,
            chapter: parse(CHAPTER_SELECTOR)?,
            chapter_title: parse(CHAPTER_TITLE_SELECTOR)?,
            chapter_link: parse(CHAPTER_LINK_SELECTOR)?,
        })
    }
}

pub fn parse_detail_page(html: &str, url: &str) -> Result<DetailPage, HarvestError> {
    let selectors = Selectors::new(url)?;
    let base = Url::parse(url).ok();
    let doc = Html::parse_document(html);

    let first_text = |selector: &Selector| {
        doc.select(selector)
            .next()
            .map(|element| element_text(&element))
            .unwrap_or_default()
    };

    let cover_image_url = doc
        .select(&selectors.cover)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(|src| resolve(base.as_ref(), src));

    let chapters = doc
        .select(&selectors.chapter)
        .enumerate()
        .map(|(index, track)| ChapterEntry {
            index,
            play_id: non_empty(track.value().attr(PLAY_ID_ATTR)),
            title: track
                .select(&selectors.chapter_title)
                .next()
                .map(|element| element_text(&element))
                .filter(|title| !title.is_empty()),
            download_url: track
                .select(&selectors.chapter_link)
                .next()
                .and_then(|link| non_empty(link.value().attr("href")))
                .map(|href| resolve(base.as_ref(), &href)),
        })
        .collect();

    Ok(DetailPage {
        title: first_text(&selectors.title),
        author_name: first_text(&selectors.author),
        cover_image_url,
        chapters,
    })
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
