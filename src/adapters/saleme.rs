//! saleme.lk classified listings

use crate::adapters::{ListingEntry, SiteAdapter};
use crate::crawler::parser::{all_attrs, all_texts, first_text, select_all, Page};
use crate::record::{first_value, Field, PartialRecord, PriceFormat};

const SITE: &str = "saleme";

/// Spec list entries, by position
const SPEC_LIST: [(&str, Field); 4] = [
    ("ul.spec-ul li:nth-child(1) span.spec-des", Field::Manufacturer),
    ("ul.spec-ul li:nth-child(2) span.spec-des", Field::Model),
    ("ul.spec-ul li:nth-child(3) span.spec-des", Field::ModelYear),
    ("ul.spec-ul li:nth-child(4) span.spec-des", Field::EngineCapacity),
];

/// Footer blocks under the ad, by position
const TAIL_VALUES: [(&str, Field); 2] = [
    ("div.vap-details-tail:nth-child(1) div.vap-tail-desc span.vap-tail-values", Field::Condition),
    ("div.vap-details-tail:nth-child(2) div.vap-tail-desc span.vap-tail-values", Field::Mileage),
];

/// Product cards are bare anchors; the card's own `href` is the ad page.
pub struct Saleme;

impl Saleme {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Saleme {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteAdapter for Saleme {
    fn site(&self) -> &'static str {
        SITE
    }

    fn signature(&self) -> &'static str {
        "saleme.lk"
    }

    fn parse_listing_page(&self, page: &Page) -> Vec<ListingEntry> {
        select_all(page.root(), "div.all-ads-cont > a")
            .into_iter()
            .map(|card| {
                let mut partial = PartialRecord::for_site(SITE);
                partial.set_opt(Field::Title, first_text(card, "h3.item-title").as_deref());
                if let Some(price) = first_text(card, "h4.item-price") {
                    partial.set_price(&price, &PriceFormat::RS_UPPER_NO_COMMAS);
                }

                let detail_url = card.value().attr("href").and_then(|href| page.follow(href));
                if let Some(url) = &detail_url {
                    partial.set(Field::Url, url.as_str());
                }

                ListingEntry { partial, detail_url }
            })
            .collect()
    }

    fn parse_detail_page(&self, page: &Page, mut partial: PartialRecord) -> Option<PartialRecord> {
        let root = page.root();
        partial.add_images(page.follow_all(all_attrs(root, "li.gallery-item a", "href")));

        for (selector, field) in SPEC_LIST.into_iter().chain(TAIL_VALUES) {
            partial.set_opt(field, first_text(root, selector).as_deref());
        }

        let description = first_value(all_texts(root, "div.description-div p"));
        partial.set_opt(Field::Description, description.as_deref());

        Some(partial)
    }

    fn pagination_selector(&self) -> &'static str {
        r#"ul.pager li a[rel="next"]"#
    }
}
