//! Whole-run tests: crawl, write the JSON file, publish

use crate::common::{listing_page, product_card, MapFetcher};
use market_trawler::adapters::AdapterKind;
use market_trawler::config::{
    CategoryConfig, Config, CrawlerConfig, OutputConfig, PublishConfig, SiteConfig,
};
use market_trawler::crawler::{run_category, RunOptions};
use market_trawler::{Record, TrawlError};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEED: &str = "https://celltronics.lk/product-category/microphones/";

fn config(dir: &TempDir, endpoint: Option<String>) -> Config {
    Config {
        crawler: CrawlerConfig::default(),
        publish: PublishConfig::default(),
        output: OutputConfig {
            directory: dir.path().join("out").to_string_lossy().into_owned(),
        },
        categories: vec![CategoryConfig {
            name: "mic".to_string(),
            output_file: "mic.json".to_string(),
            endpoint,
            sites: vec![SiteConfig {
                adapter: AdapterKind::Celltronics,
                seeds: vec![SEED.to_string()],
                max_pages: 5,
            }],
        }],
    }
}

fn fetcher() -> MapFetcher {
    MapFetcher::new().page(
        SEED,
        &listing_page(
            &[
                product_card("mic-stand", "Mic Stand", "4,900.00", false, &["Steel"]),
                product_card("pop-filter", "Pop Filter", "2,000.00", false, &["Nylon"]),
            ],
            None,
        ),
    )
}

#[tokio::test]
async fn test_run_writes_file_and_publishes() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mic"))
        .and(header("x-api-key", "from-cli"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&dir, Some("http://unused.invalid/api/mic".to_string()));
    let options = RunOptions {
        api_key: Some("from-cli".to_string()),
        endpoint: Some(format!("{}/api/mic", server.uri())),
    };

    let summary = run_category(&config, "mic", &options, &fetcher())
        .await
        .unwrap();

    assert_eq!(summary.records, 2);
    assert_eq!(summary.output_path, dir.path().join("out").join("mic.json"));

    let written: Vec<Record> =
        serde_json::from_str(&std::fs::read_to_string(&summary.output_path).unwrap()).unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].title, "Mic Stand");

    let publish = summary.publish.unwrap();
    assert_eq!(publish.chunks_sent, 1);
    assert_eq!(publish.records_accepted, 2);
}

#[tokio::test]
async fn test_run_without_api_key_skips_publish() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let config = config(&dir, Some(server.uri()));
    let summary = run_category(&config, "mic", &RunOptions::default(), &fetcher())
        .await
        .unwrap();

    assert!(summary.publish.is_none());
    assert!(summary.output_path.exists());
}

#[tokio::test]
async fn test_run_empty_crawl_writes_empty_array() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, None);

    let summary = run_category(&config, "mic", &RunOptions::default(), &MapFetcher::new())
        .await
        .unwrap();

    assert_eq!(summary.records, 0);
    assert_eq!(summary.crawl.fetch_failures, 1);
    let contents = std::fs::read_to_string(&summary.output_path).unwrap();
    let written: Vec<Record> = serde_json::from_str(&contents).unwrap();
    assert!(written.is_empty());
}

#[tokio::test]
async fn test_run_unknown_category() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, None);

    let result = run_category(&config, "boats", &RunOptions::default(), &MapFetcher::new()).await;
    assert!(matches!(result, Err(TrawlError::UnknownCategory(name)) if name == "boats"));
}
