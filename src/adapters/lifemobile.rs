//! lifemobile.lk storefront

use crate::adapters::woocommerce::{self, join_lines, StorefrontListing, DETAIL_OUT_OF_STOCK, NEXT_PAGE};
use crate::adapters::{ListingEntry, SiteAdapter, StockFilter, StockStage};
use crate::crawler::parser::{all_attrs, all_texts, Page};
use crate::record::{Field, PartialRecord};

const LISTING: StorefrontListing = StorefrontListing::classic_loop("life_mobile");

/// Stock is only shown on the product page, alongside the specification tab.
pub struct Lifemobile;

impl SiteAdapter for Lifemobile {
    fn site(&self) -> &'static str {
        LISTING.site
    }

    fn signature(&self) -> &'static str {
        "lifemobile.lk"
    }

    fn parse_listing_page(&self, page: &Page) -> Vec<ListingEntry> {
        woocommerce::parse_listing(self, page, &LISTING)
    }

    fn parse_detail_page(&self, page: &Page, mut partial: PartialRecord) -> Option<PartialRecord> {
        let root = page.root();
        if self.out_of_stock(StockStage::Detail, root) {
            return None;
        }

        partial.add_images(page.follow_all(all_attrs(
            root,
            "div.woocommerce-product-gallery__image a",
            "href",
        )));

        let rows = all_texts(root, "div.woocommerce-Tabs-panel--specification table tr");
        partial.set_opt(Field::Description, join_lines(rows).as_deref());

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

    fn partial() -> PartialRecord {
        let listing = Page::parse(
            Url::parse("https://lifemobile.lk/product-category/mobile-phones/").unwrap(),
            r#"<ul><li class="product">
                <a class="woocommerce-LoopProduct-link" href="https://lifemobile.lk/product/galaxy-a15/">
                    <img src="/thumb.jpg">
                    <h2 class="woocommerce-loop-product__title">Galaxy A15</h2>
                    <span class="woocommerce-Price-amount"><bdi><span>Rs.</span>54,999.00</bdi></span>
                </a>
            </li></ul>"#,
        );
        let mut entries = Lifemobile.parse_listing_page(&listing);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].detail_url.is_some());
        entries.remove(0).partial
    }

    #[test]
    fn test_detail_builds_description_from_spec_rows() {
        let detail = Page::parse(
            Url::parse("https://lifemobile.lk/product/galaxy-a15/").unwrap(),
            r#"<p class="stock in-stock">In stock</p>
               <div class="woocommerce-product-gallery__image"><a href="/img/a15.jpg"></a></div>
               <div class="woocommerce-Tabs-panel--specification"><table>
                 <tr><th>Display</th><td>6.5 inch</td></tr>
                 <tr><th>Battery</th><td>5000 mAh</td></tr>
               </table></div>"#,
        );

        let record = Lifemobile
            .parse_detail_page(&detail, partial())
            .unwrap()
            .finalize()
            .unwrap();
        assert_eq!(record.price, "54,999.00");
        assert_eq!(record.description, "Display 6.5 inch | Battery 5000 mAh");
        assert_eq!(record.image, ["https://lifemobile.lk/img/a15.jpg"]);
        assert_eq!(record.site, "life_mobile");
    }

    #[test]
    fn test_detail_out_of_stock_is_dropped() {
        let detail = Page::parse(
            Url::parse("https://lifemobile.lk/product/galaxy-a15/").unwrap(),
            r#"<p class="stock out-of-stock">Out of stock</p>"#,
        );
        assert!(Lifemobile.parse_detail_page(&detail, partial()).is_none());
    }
}
