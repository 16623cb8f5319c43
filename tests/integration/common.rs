//! Shared fixtures for the integration tests

use market_trawler::adapters::AdapterKind;
use market_trawler::config::{CategoryConfig, SiteConfig};
use market_trawler::crawler::{FetchResult, PageFetcher};
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

/// Serves pages from a map and records every URL it was asked for
#[derive(Default)]
pub struct MapFetcher {
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl MapFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Serves `to` whenever `from` is requested, reporting `to` as the final URL
    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    /// URLs fetched so far, in request order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requested().iter().any(|u| u == url)
    }
}

impl PageFetcher for MapFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        self.requested.lock().unwrap().push(url.to_string());

        let final_url = match self.redirects.get(url.as_str()) {
            Some(target) => Url::parse(target).unwrap(),
            None => url.clone(),
        };

        match self.pages.get(final_url.as_str()) {
            Some(body) => FetchResult::Success {
                final_url,
                status_code: 200,
                body: body.clone(),
            },
            None => FetchResult::HttpError { status_code: 404 },
        }
    }
}

/// A one-site category
pub fn category(adapter: AdapterKind, seed: &str, max_pages: u32) -> CategoryConfig {
    CategoryConfig {
        name: "test".to_string(),
        output_file: "test.json".to_string(),
        endpoint: None,
        sites: vec![SiteConfig {
            adapter,
            seeds: vec![seed.to_string()],
            max_pages,
        }],
    }
}

/// A celltronics product card
///
/// `detail` adds the image link to a product page; without it the card's
/// thumbnail is the only image.
pub fn product_card(slug: &str, title: &str, price: &str, detail: bool, bullets: &[&str]) -> String {
    let top = if detail {
        format!(
            r#"<a class="product-image-link" href="/product/{slug}/"><img src="/thumbs/{slug}.jpg"></a>"#
        )
    } else {
        format!(r#"<img src="/thumbs/{slug}.jpg">"#)
    };
    let items: String = bullets.iter().map(|b| format!("<li>{}</li>", b)).collect();

    format!(
        r#"<div class="product-wrapper">
            <div class="product-element-top">{top}</div>
            <h3 class="wd-entities-title"><a href="/product/{slug}/">{title}</a></h3>
            <span class="woocommerce-Price-amount"><bdi><span>Rs</span>{price}</bdi></span>
            <div class="hover-content-inner"><ul>{items}</ul></div>
        </div>"#
    )
}

pub fn sold_out_card(slug: &str, title: &str) -> String {
    format!(
        r#"<div class="product-wrapper">
            <span class="out-of-stock">Sold out</span>
            <div class="product-element-top"><a class="product-image-link" href="/product/{slug}/"><img src="/thumbs/{slug}.jpg"></a></div>
            <h3 class="wd-entities-title"><a href="/product/{slug}/">{title}</a></h3>
            <span class="woocommerce-Price-amount"><bdi>1,000.00</bdi></span>
        </div>"#
    )
}

/// Wraps cards into a listing page, with an optional next-page link
pub fn listing_page(cards: &[String], next: Option<&str>) -> String {
    let next = next
        .map(|href| format!(r#"<a class="next page-numbers" href="{}">Next</a>"#, href))
        .unwrap_or_default();
    format!("<html><body>{}{}</body></html>", cards.concat(), next)
}

/// A single-product page with a two-image gallery
pub fn detail_page(slug: &str) -> String {
    format!(
        r#"<html><body>
            <figure class="woocommerce-product-gallery__image"><a href="/uploads/{slug}-1.jpg"><img></a></figure>
            <figure class="woocommerce-product-gallery__image"><a href="/uploads/{slug}-2.jpg"><img></a></figure>
        </body></html>"#
    )
}
