//! celltronics.lk storefront

use crate::adapters::woocommerce::{self, StorefrontListing, GALLERY_LINKS, NEXT_PAGE};
use crate::adapters::{ListingEntry, SiteAdapter, StockFilter, StockMatch, StockStage};
use crate::crawler::parser::{all_attrs, Page};
use crate::record::PartialRecord;

const SOLD_OUT: StockFilter = StockFilter {
    stage: StockStage::Listing,
    selector: "span.out-of-stock",
    pattern: "Sold out",
    matching: StockMatch::Exact,
};

const LISTING: StorefrontListing = StorefrontListing {
    site: "celltronics",
    container: "div.product-wrapper",
    title: "h3.wd-entities-title a",
    link: "h3.wd-entities-title a",
    detail_link: "a.product-image-link",
    description_items: Some("div.hover-content-inner ul li"),
    thumbnail: Some("div.product-element-top img"),
    skip_unpriced: false,
};

/// Product cards carry the feature bullets; the detail page only adds the gallery.
pub struct Celltronics;

impl SiteAdapter for Celltronics {
    fn site(&self) -> &'static str {
        LISTING.site
    }

    fn signature(&self) -> &'static str {
        "celltronics.lk"
    }

    fn parse_listing_page(&self, page: &Page) -> Vec<ListingEntry> {
        woocommerce::parse_listing(self, page, &LISTING)
    }

    fn parse_detail_page(&self, page: &Page, mut partial: PartialRecord) -> Option<PartialRecord> {
        partial.add_images(page.follow_all(all_attrs(page.root(), GALLERY_LINKS, "href")));
        Some(partial)
    }

    fn pagination_selector(&self) -> &'static str {
        NEXT_PAGE
    }

    fn stock_filter(&self) -> Option<StockFilter> {
        Some(SOLD_OUT)
    }
}
