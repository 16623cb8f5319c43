//! autolanka.com classified listings
//!
//! Detail fields live in `div#df_field_<id>` blocks. The manufacturer is not
//! shown on the page and is taken from the ad URL instead
//! (`/<category>/<manufacturer>/<ad>`).

use crate::adapters::{ListingEntry, SiteAdapter};
use crate::crawler::parser::{all_attrs, first_attr, first_text, select_all, Page};
use crate::record::{Field, LabelMapping, PartialRecord, PriceFormat, SpecSheet};
use url::Url;

const SITE: &str = "autolanka";

/// Field blocks read by id
const FIELD_IDS: [(&str, Field); 6] = [
    ("div#df_field_built div.value", Field::ModelYear),
    ("div#df_field_body_style div.value", Field::Model),
    ("div#df_field_transmission div.value", Field::Transmission),
    ("div#df_field_fuel div.value", Field::FuelType),
    ("div#df_field_milage div.value", Field::Mileage),
    ("div#df_field_condition div.value", Field::Condition),
];

pub struct Autolanka {
    /// Cells only feed the description; fields come from [`FIELD_IDS`]
    mapping: LabelMapping,
}

impl Autolanka {
    pub fn new() -> Self {
        Self {
            mapping: LabelMapping::default(),
        }
    }
}

impl Default for Autolanka {
    fn default() -> Self {
        Self::new()
    }
}

/// Second path segment of an ad URL with at least three segments
fn manufacturer_from_url(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.collect();
    if segments.len() >= 3 {
        segments.get(1).map(|s| s.to_string())
    } else {
        None
    }
}

impl SiteAdapter for Autolanka {
    fn site(&self) -> &'static str {
        SITE
    }

    fn signature(&self) -> &'static str {
        "autolanka.com"
    }

    fn parse_listing_page(&self, page: &Page) -> Vec<ListingEntry> {
        select_all(page.root(), "article.item")
            .into_iter()
            .map(|item| {
                let mut partial = PartialRecord::for_site(SITE);
                partial.set_opt(Field::Title, first_text(item, "a.link-large").as_deref());
                if let Some(price) = first_text(item, "span.price-tag span") {
                    partial.set_price(&price, &PriceFormat::RS);
                }

                let detail_url =
                    first_attr(item, "a.link-large", "href").and_then(|href| page.follow(&href));
                if let Some(url) = &detail_url {
                    partial.set(Field::Url, url.as_str());
                }

                ListingEntry { partial, detail_url }
            })
            .collect()
    }

    fn parse_detail_page(&self, page: &Page, mut partial: PartialRecord) -> Option<PartialRecord> {
        let root = page.root();
        partial.add_images(page.follow_all(all_attrs(root, "ul.swiper-wrapper li img", "src")));

        let mut sheet = SpecSheet::new();
        for cell in select_all(root, "div.table-cell.clearfix") {
            let label = first_text(cell, ".name span").unwrap_or_default();
            let value = first_text(cell, ".value").unwrap_or_default();
            sheet.add(&mut partial, &self.mapping, &label, &value);
        }
        if !sheet.is_empty() {
            partial.set(Field::Description, &sheet.joined());
        }

        for (selector, field) in FIELD_IDS {
            partial.set_opt(field, first_text(root, selector).as_deref());
        }

        if let Some(manufacturer) = manufacturer_from_url(page.url()) {
            partial.set(Field::Manufacturer, &manufacturer);
        }

        Some(partial)
    }

    fn pagination_selector(&self) -> &'static str {
        "a.button"
    }
}
