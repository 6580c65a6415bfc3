mod common;

use std::fs;
use std::sync::Arc;

use common::{detail_page, fixed_clock, station_json, TrackHtml};
use harvester_engine::{
    AtomicFileWriter, ChapterStrategy, DirectLinkSource, FailureKind, FeedBuilder, FetchSettings,
    HarvestConfig, HarvestError, ReqwestFetcher, StationApiSource,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> Arc<ReqwestFetcher> {
    Arc::new(ReqwestFetcher::new(FetchSettings::default()).expect("client"))
}

fn api_builder(server: &MockServer, out: &TempDir) -> FeedBuilder {
    let fetcher = fetcher();
    let source = StationApiSource::new(
        fetcher.clone(),
        format!("{}/wp-json/wp/v2/station", server.uri()),
    );
    FeedBuilder::new(
        fetcher,
        Arc::new(source),
        AtomicFileWriter::new(out.path().to_path_buf()),
        fixed_clock(),
    )
}

fn direct_builder(out: &TempDir) -> FeedBuilder {
    FeedBuilder::new(
        fetcher(),
        Arc::new(DirectLinkSource),
        AtomicFileWriter::new(out.path().to_path_buf()),
        fixed_clock(),
    )
}

async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn mount_station(server: &MockServer, id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/wp-json/wp/v2/station/{id}")))
        .and(query_param("_fields", "title,meta.stream,media.download_url"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn rss_files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".rss"))
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn station_chapters_resolve_in_page_order() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    mount_page(
        &server,
        "/livre/germinal.html",
        detail_page(
            "Germinal",
            "Émile Zola",
            Some("https://img.example.com/germinal.jpg"),
            &[TrackHtml::api("11"), TrackHtml::api("12"), TrackHtml::api("13")],
        ),
    )
    .await;
    for (id, n) in [("11", 1), ("12", 2), ("13", 3)] {
        mount_station(
            &server,
            id,
            ResponseTemplate::new(200).set_body_json(station_json(
                &format!("Partie {n}"),
                &format!("https://cdn.example.com/germinal-{n}.mp3"),
            )),
        )
        .await;
    }

    let address = format!("{}/livre/germinal.html", server.uri());
    let (filename, feed) = api_builder(&server, &out).assemble(&address).await.unwrap();

    assert_eq!(filename, "emile_zola_germinal.rss");
    assert_eq!(feed.title, "Germinal");
    assert_eq!(feed.author_name, "Émile Zola");
    assert_eq!(feed.source_link, address);
    assert_eq!(
        feed.cover_image_url.as_deref(),
        Some("https://img.example.com/germinal.jpg")
    );
    let titles: Vec<_> = feed.items.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, ["Partie 1", "Partie 2", "Partie 3"]);
    assert_eq!(feed.items[2].media_url, "https://cdn.example.com/germinal-3.mp3");
    assert!(feed
        .items
        .windows(2)
        .all(|pair| pair[0].published < pair[1].published));
}

#[tokio::test]
async fn failing_chapter_is_skipped_and_feed_still_written() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    mount_page(
        &server,
        "/livre/horla.html",
        detail_page(
            "Le Horla",
            "Guy de Maupassant",
            None,
            &[
                TrackHtml::api("1"),
                TrackHtml::api("2"),
                TrackHtml::api("3"),
                TrackHtml::direct("sans identifiant", "/x.mp3"),
            ],
        ),
    )
    .await;
    mount_station(
        &server,
        "1",
        ResponseTemplate::new(200).set_body_json(station_json("Un", "https://cdn/1.mp3")),
    )
    .await;
    mount_station(&server, "2", ResponseTemplate::new(500)).await;
    mount_station(
        &server,
        "3",
        ResponseTemplate::new(200).set_body_string("{not json"),
    )
    .await;

    let address = format!("{}/livre/horla.html", server.uri());
    let path = api_builder(&server, &out).build(&address).await.unwrap();

    assert_eq!(path, out.path().join("guy_de_maupassant_le_horla.rss"));
    let xml = fs::read_to_string(&path).unwrap();
    assert_eq!(xml.matches("<item>").count(), 1);
    assert!(xml.contains("https://cdn/1.mp3"));
}

#[tokio::test]
async fn direct_links_need_no_secondary_fetch() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    mount_page(
        &server,
        "/livre/verne.html",
        detail_page(
            "Le Tour du monde en quatre-vingts jours",
            "Jules Verne",
            None,
            &[
                TrackHtml::direct("Chapitre 1", "/mp3/verne-01.mp3"),
                TrackHtml::direct("Chapitre 2", "/mp3/verne-02.mp3"),
            ],
        ),
    )
    .await;

    let address = format!("{}/livre/verne.html", server.uri());
    let path = direct_builder(&out).build(&address).await.unwrap();

    assert_eq!(
        rss_files(&out),
        ["jules_verne_le_tour_du_monde_en_quatre_vingts_jours.rss"]
    );
    let xml = fs::read_to_string(path).unwrap();
    let first = xml.find("Chapitre 1").unwrap();
    let second = xml.find("Chapitre 2").unwrap();
    assert!(first < second);
    assert!(xml.contains(&format!("{}/mp3/verne-02.mp3", server.uri())));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_cover_gives_feed_without_image() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    mount_page(
        &server,
        "/livre/candide.html",
        detail_page(
            "Candide",
            "Voltaire",
            None,
            &[TrackHtml::direct("Chapitre premier", "/c1.mp3")],
        ),
    )
    .await;

    let address = format!("{}/livre/candide.html", server.uri());
    let builder = direct_builder(&out);
    let (_, feed) = builder.assemble(&address).await.unwrap();
    assert_eq!(feed.cover_image_url, None);
    assert_eq!(feed.title, "Candide");
    assert_eq!(feed.items.len(), 1);

    let path = builder.build(&address).await.unwrap();
    let xml = fs::read_to_string(path).unwrap();
    assert!(!xml.contains("<image>"));
}

#[tokio::test]
async fn empty_title_writes_nothing_and_skips_chapters() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    mount_page(
        &server,
        "/livre/vide.html",
        detail_page("  ", " -- ", None, &[TrackHtml::api("7")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/station/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let address = format!("{}/livre/vide.html", server.uri());
    let err = api_builder(&server, &out).build(&address).await.unwrap_err();

    assert!(matches!(err, HarvestError::EmptyTitle { ref url } if *url == address));
    assert!(rss_files(&out).is_empty());
}

#[tokio::test]
async fn missing_page_is_a_fetch_error() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let address = format!("{}/livre/absent.html", server.uri());
    let err = direct_builder(&out).build(&address).await.unwrap_err();

    assert_eq!(err.http_status(), Some(404));
    assert!(matches!(
        err,
        HarvestError::Fetch { ref source, .. } if source.kind == FailureKind::HttpStatus(404)
    ));
    assert!(rss_files(&out).is_empty());
}

#[tokio::test]
async fn rebuilding_overwrites_previous_feed() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    mount_page(
        &server,
        "/livre/candide.html",
        detail_page("Candide", "Voltaire", None, &[TrackHtml::direct("Un", "/1.mp3")]),
    )
    .await;
    fs::write(out.path().join("voltaire_candide.rss"), "stale").unwrap();

    let address = format!("{}/livre/candide.html", server.uri());
    let path = direct_builder(&out).build(&address).await.unwrap();

    let xml = fs::read_to_string(path).unwrap();
    assert!(xml.contains("<title>Candide</title>"));
    assert_eq!(rss_files(&out), ["voltaire_candide.rss"]);
}

#[test]
fn config_selects_chapter_strategy() {
    let out = TempDir::new().unwrap();
    let mut config = HarvestConfig::default_with_output(out.path().to_path_buf());
    assert_eq!(config.strategy, ChapterStrategy::StationApi);
    assert!(config.workers >= 1);
    config.strategy = ChapterStrategy::DirectLink;
    // building must not touch the network
    let _builder = FeedBuilder::from_config(fetcher(), &config);
}
