mod common;

use std::fs;
use std::sync::Arc;

use common::{detail_page, fixed_clock, listing_page, station_json, TrackHtml};
use harvester_engine::{
    harvest, CatalogLister, ChapterStrategy, FeedBuilder, FetchSettings, HarvestConfig,
    ReqwestFetcher,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOOKS: [(&str, &str); 6] = [
    ("Germinal", "Émile Zola"),
    ("Le Horla", "Guy de Maupassant"),
    ("Candide", "Voltaire"),
    ("", ""),
    ("Les Misérables", "Victor Hugo"),
    ("Bel-Ami", "Guy de Maupassant"),
];

async fn mount_html(server: &MockServer, route: String, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn three_page_catalog_harvests_into_feeds() {
    harvest_logging::initialize_for_tests();
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    for page in 1..=3 {
        let hrefs = [
            format!("/livre/{}.html", page * 2 - 1),
            format!("/livre/{}.html", page * 2),
        ];
        let hrefs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
        mount_html(&server, format!("/classement/page/{page}"), listing_page(&hrefs)).await;
    }
    for (i, (title, author)) in BOOKS.iter().enumerate() {
        let book = i + 1;
        // book 6 is missing: its detail page answers 404
        if book == 6 {
            continue;
        }
        let id = format!("{book}00");
        mount_html(
            &server,
            format!("/livre/{book}.html"),
            detail_page(title, author, None, &[TrackHtml::api(&id)]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path(format!("/wp-json/wp/v2/station/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(station_json(
                "Chapitre 1",
                &format!("https://cdn.example.com/{book}.mp3"),
            )))
            .mount(&server)
            .await;
    }

    let mut config = HarvestConfig::default_with_output(out.path().to_path_buf());
    config.listing_url = format!("{}/classement", server.uri());
    config.catalog_pages = 3;
    config.station_api_url = format!("{}/wp-json/wp/v2/station", server.uri());
    config.strategy = ChapterStrategy::StationApi;
    config.workers = 2;
    config.clock = fixed_clock();

    let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone()).expect("client"));
    let addresses = CatalogLister::new(fetcher.clone(), config.catalog_pages)
        .list_books(&config.listing_url)
        .await
        .expect("listing ok");
    assert_eq!(addresses.len(), 6);

    let builder = Arc::new(FeedBuilder::from_config(fetcher, &config));
    let report = harvest(builder, addresses, config.workers).await;

    assert_eq!(report.completions.len(), 6);
    assert_eq!(report.succeeded(), 4);
    assert_eq!(report.failed(), 2);

    let mut written: Vec<String> = fs::read_dir(out.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(
        written,
        [
            "emile_zola_germinal.rss",
            "guy_de_maupassant_le_horla.rss",
            "victor_hugo_les_miserables.rss",
            "voltaire_candide.rss",
        ]
    );

    let germinal = fs::read_to_string(out.path().join("emile_zola_germinal.rss")).unwrap();
    assert!(germinal.contains("https://cdn.example.com/1.mp3"));
}

#[test]
fn default_settings_have_no_timeouts() {
    let settings = FetchSettings::default();
    assert_eq!(settings.connect_timeout, None);
    assert_eq!(settings.request_timeout, None);
}
