//! End-to-end crawl tests
//!
//! These run a whole category through the dispatcher's event loop with pages
//! served from memory.

use crate::common::{
    category, detail_page, listing_page, product_card, sold_out_card, MapFetcher,
};
use market_trawler::adapters::{AdapterKind, AdapterRegistry, SiteId};
use market_trawler::collector::{Collector, DedupKey};
use market_trawler::config::{CrawlerConfig, SiteConfig};
use market_trawler::crawler::{crawl_category, drive, Dispatcher};
use market_trawler::state::SitePhase;

const SEED: &str = "https://celltronics.lk/product-category/microphones/";

fn page_url(n: u32) -> String {
    format!("{}page/{}/", SEED, n)
}

#[tokio::test]
async fn test_listing_detail_and_stock_filter() {
    let listing = listing_page(
        &[
            product_card("shure-sm58", "Shure SM58", "42,500.00", true, &["Dynamic", "Cardioid"]),
            product_card("mic-stand", "Mic Stand", "4,900.00", false, &["Steel", "Foldable"]),
            sold_out_card("rode-podmic", "Rode PodMic"),
        ],
        None,
    );
    let fetcher = MapFetcher::new()
        .page(SEED, &listing)
        .page(
            "https://celltronics.lk/product/shure-sm58/",
            &detail_page("shure-sm58"),
        );

    let (records, stats) = crawl_category(
        &CrawlerConfig::default(),
        &category(AdapterKind::Celltronics, SEED, 5),
        &fetcher,
    )
    .await
    .unwrap();

    // One detail fetch; the sold-out product is never followed
    assert_eq!(
        fetcher.requested(),
        [SEED, "https://celltronics.lk/product/shure-sm58/"]
    );
    assert!(!fetcher.was_requested("https://celltronics.lk/product/rode-podmic/"));

    assert_eq!(stats.listing_pages, 1);
    assert_eq!(stats.detail_pages, 1);
    assert_eq!(stats.records_collected, 2);
    assert_eq!(stats.dropped_invalid, 0);
    assert_eq!(records.len(), 2);

    // The card without a detail link is finalized straight from the listing
    let stand = &records[0];
    assert_eq!(stand.title, "Mic Stand");
    assert_eq!(stand.price, "4,900.00");
    assert_eq!(stand.url, "https://celltronics.lk/product/mic-stand/");
    assert_eq!(stand.image, ["https://celltronics.lk/thumbs/mic-stand.jpg"]);
    assert_eq!(stand.description, "Steel | Foldable");
    assert_eq!(stand.site, "celltronics");

    let shure = &records[1];
    assert_eq!(shure.title, "Shure SM58");
    assert_eq!(shure.price, "42,500.00");
    assert_eq!(shure.description, "Dynamic | Cardioid");
    assert_eq!(
        shure.image,
        [
            "https://celltronics.lk/uploads/shure-sm58-1.jpg",
            "https://celltronics.lk/uploads/shure-sm58-2.jpg",
        ]
    );
    assert!(shure.model_year.is_none());
}

#[tokio::test]
async fn test_pagination_stops_at_max_pages() {
    let mut fetcher = MapFetcher::new().page(SEED, &listing_page(&[], Some("page/2/")));
    for n in 2..=6 {
        let next = format!("../{}/", n + 1);
        fetcher = fetcher.page(&page_url(n), &listing_page(&[], Some(&next)));
    }

    let registry =
        AdapterRegistry::from_category(&category(AdapterKind::Celltronics, SEED, 2)).unwrap();
    let mut dispatcher = Dispatcher::new(registry, Collector::new(DedupKey::Record), 4);
    drive(&mut dispatcher, &fetcher).await;

    assert_eq!(fetcher.requested(), [SEED.to_string(), page_url(2), page_url(3)]);
    assert_eq!(dispatcher.page_count(SiteId(0)), 2);
    assert_eq!(dispatcher.site_phase(SiteId(0)), SitePhase::Done);
    assert_eq!(dispatcher.pending(), 0);
    assert_eq!(dispatcher.stats().listing_pages, 3);
}

#[tokio::test]
async fn test_zero_max_pages_fetches_seed_only() {
    let fetcher = MapFetcher::new()
        .page(SEED, &listing_page(&[], Some("page/2/")))
        .page(&page_url(2), &listing_page(&[], None));

    let (_, stats) = crawl_category(
        &CrawlerConfig::default(),
        &category(AdapterKind::Celltronics, SEED, 0),
        &fetcher,
    )
    .await
    .unwrap();

    assert_eq!(fetcher.requested(), [SEED]);
    assert_eq!(stats.listing_pages, 1);
}

#[tokio::test]
async fn test_record_without_description_is_dropped() {
    let listing = listing_page(
        &[
            product_card("cable", "XLR Cable", "1,500.00", false, &[]),
            product_card("pop-filter", "Pop Filter", "2,000.00", false, &["Nylon"]),
        ],
        None,
    );
    let fetcher = MapFetcher::new().page(SEED, &listing);

    let (records, stats) = crawl_category(
        &CrawlerConfig::default(),
        &category(AdapterKind::Celltronics, SEED, 5),
        &fetcher,
    )
    .await
    .unwrap();

    assert_eq!(stats.dropped_invalid, 1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Pop Filter");
}

#[tokio::test]
async fn test_duplicate_listing_across_pages_collected_once() {
    let card = product_card("mic-stand", "Mic Stand", "4,900.00", false, &["Steel"]);
    let fetcher = MapFetcher::new()
        .page(SEED, &listing_page(&[card.clone()], Some("page/2/")))
        .page(&page_url(2), &listing_page(&[card], None));

    let (records, stats) = crawl_category(
        &CrawlerConfig::default(),
        &category(AdapterKind::Celltronics, SEED, 5),
        &fetcher,
    )
    .await
    .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(stats.records_collected, 1);
    assert_eq!(stats.duplicates, 1);
}

#[tokio::test]
async fn test_failed_seed_ends_chain() {
    let fetcher = MapFetcher::new();

    let registry =
        AdapterRegistry::from_category(&category(AdapterKind::Celltronics, SEED, 5)).unwrap();
    let mut dispatcher = Dispatcher::new(registry, Collector::new(DedupKey::Record), 4);
    drive(&mut dispatcher, &fetcher).await;

    assert_eq!(fetcher.requested(), [SEED]);
    assert_eq!(dispatcher.stats().fetch_failures, 1);
    assert_eq!(dispatcher.site_phase(SiteId(0)), SitePhase::Done);
    assert!(dispatcher.collector().is_empty());
}

#[tokio::test]
async fn test_failed_detail_keeps_paging() {
    let fetcher = MapFetcher::new()
        .page(
            SEED,
            &listing_page(
                &[product_card("shure-sm58", "Shure SM58", "42,500.00", true, &["Dynamic"])],
                Some("page/2/"),
            ),
        )
        .page(
            &page_url(2),
            &listing_page(
                &[product_card("mic-stand", "Mic Stand", "4,900.00", false, &["Steel"])],
                None,
            ),
        );

    let (records, stats) = crawl_category(
        &CrawlerConfig::default(),
        &category(AdapterKind::Celltronics, SEED, 5),
        &fetcher,
    )
    .await
    .unwrap();

    assert!(fetcher.was_requested("https://celltronics.lk/product/shure-sm58/"));
    assert!(fetcher.was_requested(&page_url(2)));
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Mic Stand");
}

#[tokio::test]
async fn test_listing_redirected_off_site_is_unrouted() {
    let fetcher = MapFetcher::new()
        .redirect(SEED, "https://example.com/parked/")
        .page(
            "https://example.com/parked/",
            &listing_page(
                &[product_card("mic-stand", "Mic Stand", "4,900.00", false, &["Steel"])],
                None,
            ),
        );

    let registry =
        AdapterRegistry::from_category(&category(AdapterKind::Celltronics, SEED, 5)).unwrap();
    let mut dispatcher = Dispatcher::new(registry, Collector::new(DedupKey::Record), 4);
    drive(&mut dispatcher, &fetcher).await;

    let stats = dispatcher.stats();
    assert_eq!(stats.unrouted_pages, 1);
    assert_eq!(stats.records_collected, 0);
    assert_eq!(dispatcher.site_phase(SiteId(0)), SitePhase::Done);
}

#[tokio::test]
async fn test_url_dedup_key_collapses_price_changes() {
    let fetcher = MapFetcher::new()
        .page(
            SEED,
            &listing_page(
                &[product_card("mic-stand", "Mic Stand", "4,900.00", false, &["Steel"])],
                Some("page/2/"),
            ),
        )
        .page(
            &page_url(2),
            &listing_page(
                &[product_card("mic-stand", "Mic Stand", "4,500.00", false, &["Steel"])],
                None,
            ),
        );

    let config = CrawlerConfig {
        dedup_key: DedupKey::Url,
        ..CrawlerConfig::default()
    };
    let (records, stats) = crawl_category(
        &config,
        &category(AdapterKind::Celltronics, SEED, 5),
        &fetcher,
    )
    .await
    .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].price, "4,900.00");
    assert_eq!(stats.duplicates, 1);
}

#[tokio::test]
async fn test_two_entries_for_one_site_are_both_crawled() {
    const PHONES: &str = "https://celltronics.lk/product-category/mobile-phones/";

    let mut category = category(AdapterKind::Celltronics, SEED, 5);
    category.sites.push(SiteConfig {
        adapter: AdapterKind::Celltronics,
        seeds: vec![PHONES.to_string()],
        max_pages: 5,
    });

    let fetcher = MapFetcher::new()
        .page(
            SEED,
            &listing_page(
                &[product_card("mic-stand", "Mic Stand", "4,900.00", false, &["Steel"])],
                None,
            ),
        )
        .page(
            PHONES,
            &listing_page(
                &[product_card("galaxy-a15", "Galaxy A15", "52,000.00", false, &["6.5\""])],
                None,
            ),
        );

    let (records, stats) = crawl_category(&CrawlerConfig::default(), &category, &fetcher)
        .await
        .unwrap();

    assert_eq!(stats.unrouted_pages, 0);
    let mut titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    titles.sort();
    assert_eq!(titles, ["Galaxy A15", "Mic Stand"]);
}

#[tokio::test]
async fn test_detail_out_of_stock_is_dropped_and_paging_continues() {
    const OTC_SEED: &str = "https://otc.lk/product-category/microphones/";
    const OTC_PAGE_2: &str = "https://otc.lk/product-category/microphones/page/2/";

    let listing = r#"<html><body><ul>
        <li class="product">
            <a class="woocommerce-LoopProduct-link" href="/product/boya-by-m1/">
                <img src="/img/boya.jpg">
                <h2 class="woocommerce-loop-product__title">Boya BY-M1</h2>
                <span class="woocommerce-Price-amount"><bdi>Rs 2,950.00</bdi></span>
            </a>
        </li></ul>
        <a class="next page-numbers" href="page/2/">Next</a>
    </body></html>"#;
    let detail = r#"<html><body>
        <p class="stock out-of-stock">Out of stock</p>
        <div class="woocommerce-product-details__short-description"><ul><li>Lavalier</li></ul></div>
    </body></html>"#;

    let fetcher = MapFetcher::new()
        .page(OTC_SEED, listing)
        .page("https://otc.lk/product/boya-by-m1/", detail)
        .page(OTC_PAGE_2, &listing_page(&[], None));

    let registry =
        AdapterRegistry::from_category(&category(AdapterKind::Otc, OTC_SEED, 5)).unwrap();
    let mut dispatcher = Dispatcher::new(registry, Collector::new(DedupKey::Record), 4);
    drive(&mut dispatcher, &fetcher).await;

    assert!(fetcher.was_requested("https://otc.lk/product/boya-by-m1/"));
    assert!(fetcher.was_requested(OTC_PAGE_2));

    let stats = dispatcher.stats();
    assert_eq!(stats.detail_pages, 1);
    assert_eq!(stats.dropped_out_of_stock, 1);
    assert_eq!(stats.dropped_invalid, 0);
    assert_eq!(stats.listing_pages, 2);
    assert_eq!(dispatcher.page_count(SiteId(0)), 1);
    assert_eq!(dispatcher.site_phase(SiteId(0)), SitePhase::Done);
    assert!(dispatcher.collector().is_empty());
}
