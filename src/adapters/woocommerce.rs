//! Shared listing markup of the WooCommerce storefronts
//!
//! celltronics, lifemobile, otc, xmobile and dialcom all run WooCommerce
//! themes. Their listing pages differ only in a handful of selectors, so each
//! adapter describes itself with a [`StorefrontListing`] and the parsing is done
//! here once.

use crate::adapters::{ListingEntry, SiteAdapter, StockFilter, StockMatch, StockStage};
use crate::crawler::parser::{all_attrs, all_texts, first_attr, first_text, select_all, Page};
use crate::record::{Field, PartialRecord, PriceFormat, SpecSheet};
use scraper::ElementRef;

/// Price amount inside a product card or product page
pub(super) const PRICE: &str = "span.woocommerce-Price-amount bdi";

/// WooCommerce's numbered-pagination "next" arrow
pub(super) const NEXT_PAGE: &str = "a.next.page-numbers";

/// Product gallery links on a single-product page
pub(super) const GALLERY_LINKS: &str = "figure.woocommerce-product-gallery__image a";

/// Bullet list under the short description of a single-product page
pub(super) const SHORT_DESCRIPTION_ITEMS: &str =
    "div.woocommerce-product-details__short-description ul li";

/// Stock line on a single-product page
pub(super) const DETAIL_OUT_OF_STOCK: StockFilter = StockFilter {
    stage: StockStage::Detail,
    selector: "p.stock",
    pattern: "Out of stock",
    matching: StockMatch::Contains,
};

/// Selectors describing one storefront's product cards
pub(super) struct StorefrontListing {
    pub site: &'static str,
    pub container: &'static str,
    pub title: &'static str,
    /// Element whose `href` becomes the record URL
    pub link: &'static str,
    /// Element whose `href` is the detail page to follow
    pub detail_link: &'static str,
    pub description_items: Option<&'static str>,
    /// Card thumbnail, used only when there is no detail page to take images from
    pub thumbnail: Option<&'static str>,
    /// Skip cards without a price or with a zero price
    pub skip_unpriced: bool,
}

impl StorefrontListing {
    /// The classic `li.product` loop shared by lifemobile and otc
    pub const fn classic_loop(site: &'static str) -> Self {
        Self {
            site,
            container: "li.product",
            title: "h2.woocommerce-loop-product__title",
            link: "a.woocommerce-LoopProduct-link",
            detail_link: "a.woocommerce-LoopProduct-link",
            description_items: None,
            thumbnail: Some("img"),
            skip_unpriced: false,
        }
    }
}

/// Reads product cards in source order
///
/// Cards rejected by `adapter`'s listing-stage stock rule are skipped.
pub(super) fn parse_listing<A>(
    adapter: &A,
    page: &Page,
    listing: &StorefrontListing,
) -> Vec<ListingEntry>
where
    A: SiteAdapter + ?Sized,
{
    let mut entries = Vec::new();

    for product in select_all(page.root(), listing.container) {
        if adapter.out_of_stock(StockStage::Listing, product) {
            tracing::debug!("Skipping out-of-stock product on {}", page.url());
            continue;
        }

        let mut partial = PartialRecord::for_site(listing.site);
        partial.set_opt(Field::Title, first_text(product, listing.title).as_deref());

        if let Some(price) = first_text(product, PRICE) {
            partial.set_price(&price, &PriceFormat::STOREFRONT);
        }
        if listing.skip_unpriced && matches!(partial.get(Field::Price), None | Some("0.00")) {
            tracing::debug!("Skipping unpriced product on {}", page.url());
            continue;
        }

        if let Some(url) = follow_attr(page, product, listing.link) {
            partial.set(Field::Url, &url);
        }

        if let Some(selector) = listing.description_items {
            let description = join_lines(all_texts(product, selector));
            partial.set_opt(Field::Description, description.as_deref());
        }

        let detail_url = first_attr(product, listing.detail_link, "href")
            .and_then(|href| page.follow(&href));

        if detail_url.is_none() {
            if let Some(selector) = listing.thumbnail {
                partial.add_images(page.follow_all(all_attrs(product, selector, "src")));
            }
        }

        entries.push(ListingEntry {
            partial,
            detail_url,
        });
    }

    entries
}

/// Resolves the `href` of the first match of `css` under `scope`
pub(super) fn follow_attr(page: &Page, scope: ElementRef<'_>, css: &str) -> Option<String> {
    first_attr(scope, css, "href")
        .and_then(|href| page.follow(&href))
        .map(String::from)
}

/// Joins description fragments (text or markup) with the record separator
pub(super) fn join_lines<I, S>(lines: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sheet = SpecSheet::new();
    for line in lines {
        sheet.add_line(line.as_ref());
    }

    if sheet.is_empty() {
        None
    } else {
        Some(sheet.joined())
    }
}
