//! otc.lk storefront

use crate::adapters::woocommerce::{
    self, join_lines, StorefrontListing, DETAIL_OUT_OF_STOCK, NEXT_PAGE, SHORT_DESCRIPTION_ITEMS,
};
use crate::adapters::{ListingEntry, SiteAdapter, StockFilter, StockStage};
use crate::crawler::parser::{all_texts, first_attr, Page};
use crate::record::{Field, PartialRecord};

const LISTING: StorefrontListing = StorefrontListing::classic_loop("otc");

/// Only the lead gallery image is taken; the description comes from the
/// short-description bullets.
pub struct Otc;

impl SiteAdapter for Otc {
    fn site(&self) -> &'static str {
        LISTING.site
    }

    fn signature(&self) -> &'static str {
        "otc.lk"
    }

    fn parse_listing_page(&self, page: &Page) -> Vec<ListingEntry> {
        woocommerce::parse_listing(self, page, &LISTING)
    }

    fn parse_detail_page(&self, page: &Page, mut partial: PartialRecord) -> Option<PartialRecord> {
        let root = page.root();
        if self.out_of_stock(StockStage::Detail, root) {
            return None;
        }

        if let Some(image) = first_attr(
            root,
            "div.woocommerce-product-gallery__image:nth-child(1) a img",
            "src",
        ) {
            partial.add_images(page.follow(&image).map(String::from));
        }

        let bullets = all_texts(root, SHORT_DESCRIPTION_ITEMS);
        partial.set_opt(Field::Description, join_lines(bullets).as_deref());

        Some(partial)
    }

    fn pagination_selector(&self) -> &'static str {
        NEXT_PAGE
    }

    fn stock_filter(&self) -> Option<StockFilter> {
        Some(DETAIL_OUT_OF_STOCK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_detail_takes_first_image_and_bullets() {
        let mut partial = PartialRecord::for_site("otc");
        partial.set(Field::Title, "Boya BY-M1");
        partial.set(Field::Price, "2,950.00");
        partial.set(Field::Url, "https://otc.lk/product/boya-by-m1/");

        let detail = Page::parse(
            Url::parse("https://otc.lk/product/boya-by-m1/").unwrap(),
            r#"<div class="woocommerce-product-gallery">
                 <div class="woocommerce-product-gallery__image"><a href="/full/1.jpg"><img src="/img/1.jpg"></a></div>
                 <div class="woocommerce-product-gallery__image"><a href="/full/2.jpg"><img src="/img/2.jpg"></a></div>
               </div>
               <div class="woocommerce-product-details__short-description"><ul>
                 <li>Omnidirectional lavalier</li><li>6m cable</li>
               </ul></div>"#,
        );

        let record = Otc.parse_detail_page(&detail, partial).unwrap().finalize().unwrap();
        assert_eq!(record.image, ["https://otc.lk/img/1.jpg"]);
        assert_eq!(record.description, "Omnidirectional lavalier | 6m cable");
    }

    #[test]
    fn test_detail_out_of_stock_is_dropped() {
        let detail = Page::parse(
            Url::parse("https://otc.lk/product/boya-by-m1/").unwrap(),
            r#"<p class="stock">Out of stock</p>"#,
        );
        assert!(Otc.parse_detail_page(&detail, PartialRecord::for_site("otc")).is_none());
    }
}
