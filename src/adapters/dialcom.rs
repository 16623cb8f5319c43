//! dialcom.lk storefront

use crate::adapters::woocommerce::{self, join_lines, StorefrontListing, GALLERY_LINKS, NEXT_PAGE};
use crate::adapters::{ListingEntry, SiteAdapter, StockFilter, StockMatch, StockStage};
use crate::crawler::parser::{all_attrs, all_texts, Page};
use crate::record::{Field, PartialRecord};

const UNAVAILABLE: StockFilter = StockFilter {
    stage: StockStage::Detail,
    selector: "p.stock",
    pattern: "This product is currently out of stock and unavailable.",
    matching: StockMatch::Contains,
};

const LISTING: StorefrontListing = StorefrontListing {
    site: "dialcom",
    container: "div.product-grid-item",
    title: "h3.wd-entities-title a",
    link: "a.product-image-link",
    detail_link: "a.product-image-link",
    description_items: None,
    thumbnail: None,
    skip_unpriced: true,
};

/// Description sources on a product page, tried in order
const DESCRIPTION_SOURCES: [&str; 3] = [
    "div#specs-list table tbody tr",
    "div.wc-tab-inner table tbody tr",
    "div.wc-tab-inner p:nth-child(1)",
];

/// Lists placeholder products at `0.00`; those never leave the listing page.
pub struct Dialcom;

impl SiteAdapter for Dialcom {
    fn site(&self) -> &'static str {
        LISTING.site
    }

    fn signature(&self) -> &'static str {
        "dialcom.lk"
    }

    fn parse_listing_page(&self, page: &Page) -> Vec<ListingEntry> {
        woocommerce::parse_listing(self, page, &LISTING)
    }

    fn parse_detail_page(&self, page: &Page, mut partial: PartialRecord) -> Option<PartialRecord> {
        let root = page.root();
        if self.out_of_stock(StockStage::Detail, root) {
            return None;
        }

        partial.add_images(page.follow_all(all_attrs(root, GALLERY_LINKS, "href")));

        let description = DESCRIPTION_SOURCES
            .iter()
            .find_map(|selector| join_lines(all_texts(root, selector)));
        partial.set_opt(Field::Description, description.as_deref());

        Some(partial)
    }

    fn pagination_selector(&self) -> &'static str {
        NEXT_PAGE
    }

    fn stock_filter(&self) -> Option<StockFilter> {
        Some(UNAVAILABLE)
    }
}
