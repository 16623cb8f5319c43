//! xmobile.lk storefront

use crate::adapters::woocommerce::{
    self, join_lines, StorefrontListing, GALLERY_LINKS, NEXT_PAGE, SHORT_DESCRIPTION_ITEMS,
};
use crate::adapters::{ListingEntry, SiteAdapter, StockFilter, StockMatch, StockStage};
use crate::crawler::parser::{all_attrs, all_texts, Page};
use crate::record::{Field, PartialRecord};

const OUT_OF_STOCK: StockFilter = StockFilter {
    stage: StockStage::Listing,
    selector: "p.wd-product-stock",
    pattern: "Out of stock",
    matching: StockMatch::Exact,
};

const LISTING: StorefrontListing = StorefrontListing {
    site: "xmobile",
    container: "div.product-grid-item",
    title: "h3.wd-entities-title a",
    link: "h3.wd-entities-title a",
    detail_link: "a.product-image-link",
    description_items: None,
    thumbnail: Some("div.product-element-top img"),
    skip_unpriced: false,
};

pub struct Xmobile;

impl SiteAdapter for Xmobile {
    fn site(&self) -> &'static str {
        LISTING.site
    }

    fn signature(&self) -> &'static str {
        "xmobile.lk"
    }

    fn parse_listing_page(&self, page: &Page) -> Vec<ListingEntry> {
        woocommerce::parse_listing(self, page, &LISTING)
    }

    fn parse_detail_page(&self, page: &Page, mut partial: PartialRecord) -> Option<PartialRecord> {
        let root = page.root();

        // Zoom images are injected by the theme script; fall back to the gallery links.
        let mut images = all_attrs(root, "img.zoomImg", "src");
        if images.is_empty() {
            images = all_attrs(root, GALLERY_LINKS, "href");
        }
        partial.add_images(page.follow_all(images));

        let bullets = all_texts(root, SHORT_DESCRIPTION_ITEMS);
        partial.set_opt(Field::Description, join_lines(bullets).as_deref());

        Some(partial)
    }

    fn pagination_selector(&self) -> &'static str {
        NEXT_PAGE
    }

    fn stock_filter(&self) -> Option<StockFilter> {
        Some(OUT_OF_STOCK)
    }
}
