#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use harvester_engine::Clock;

/// Listing page with one book heading per href.
pub fn listing_page(hrefs: &[&str]) -> String {
    let articles: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<article class="post"><header><h3 class="entry-title"><a href="{href}">Livre</a></h3></header><p>Résumé</p></article>"#
            )
        })
        .collect();
    format!(r#"<html><body><main>{articles}</main><aside><a href="/ignored">x</a></aside></body></html>"#)
}

pub struct TrackHtml<'a> {
    pub play_id: Option<&'a str>,
    pub title: &'a str,
    pub download: Option<&'a str>,
}

impl<'a> TrackHtml<'a> {
    pub fn api(play_id: &'a str) -> Self {
        Self {
            play_id: Some(play_id),
            title: "",
            download: None,
        }
    }

    pub fn direct(title: &'a str, download: &'a str) -> Self {
        Self {
            play_id: None,
            title,
            download: Some(download),
        }
    }
}

pub fn detail_page(title: &str, author: &str, cover: Option<&str>, tracks: &[TrackHtml<'_>]) -> String {
    let cover = cover
        .map(|src| format!(r#"<div class="post-thumbnail"><img src="{src}"></div>"#))
        .unwrap_or_default();
    let tracks: String = tracks
        .iter()
        .map(|track| {
            let id = track
                .play_id
                .map(|id| format!(r#" data-play-id="{id}""#))
                .unwrap_or_default();
            let link = track
                .download
                .map(|href| format!(r#"<a class="no-ajax" href="{href}">Télécharger</a>"#))
                .unwrap_or_default();
            format!(
                r#"<article class="album-track"{id}><div class="entry-header"><h3 class="entry-title">{}</h3></div><div class="entry-footer">{link}</div></article>"#,
                track.title
            )
        })
        .collect();
    format!(
        r#"<html><head><meta charset="utf-8"><title>site</title></head><body>
<article class="post"><div class="header-station">{cover}<div class="entry-header"><h1 class="entry-title">{title}</h1><div class="entry-auteur"><a href="/auteur">{author}</a></div></div></div>
<div class="tracks">{tracks}</div></article></body></html>"#
    )
}

pub fn station_json(title: &str, stream: &str) -> serde_json::Value {
    serde_json::json!({ "title": { "rendered": title }, "meta": { "stream": stream } })
}

pub fn fixed_clock() -> Clock {
    Arc::new(|| Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
}
