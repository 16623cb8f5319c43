//! patpat.lk classified listings

use crate::adapters::{ListingEntry, SiteAdapter};
use crate::crawler::parser::{all_attrs, first_attr, first_text, select_all, text_of, Page};
use crate::record::{Field, LabelMapping, PartialRecord, PriceFormat, SpecSheet};

const SITE: &str = "patpat";

/// Reads the two-column `label | value` table on patpat detail pages
pub struct Patpat {
    mapping: LabelMapping,
}

impl Patpat {
    pub fn new() -> Self {
        Self {
            mapping: LabelMapping::new(&[
                ("model year", Field::ModelYear),
                ("year", Field::ModelYear),
                ("condition", Field::Condition),
                ("transmission", Field::Transmission),
                ("manufacturer", Field::Manufacturer),
                ("make", Field::Manufacturer),
                ("model", Field::Model),
                ("fuel type", Field::FuelType),
                ("engine capacity", Field::EngineCapacity),
                ("mileage", Field::Mileage),
                ("color", Field::Color),
                ("colour", Field::Color),
            ]),
        }
    }
}

impl Default for Patpat {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteAdapter for Patpat {
    fn site(&self) -> &'static str {
        SITE
    }

    fn signature(&self) -> &'static str {
        "patpat.lk"
    }

    fn parse_listing_page(&self, page: &Page) -> Vec<ListingEntry> {
        select_all(page.root(), "div.result-item")
            .into_iter()
            .map(|item| {
                let mut partial = PartialRecord::for_site(SITE);
                partial.set_opt(Field::Title, first_text(item, "h4.result-title span").as_deref());
                if let Some(price) = first_text(item, "h3.clearfix label") {
                    partial.set_price(&price, &PriceFormat::RS);
                }

                let detail_url =
                    first_attr(item, "div.result-img a", "href").and_then(|href| page.follow(&href));
                if let Some(url) = &detail_url {
                    partial.set(Field::Url, url.as_str());
                }

                ListingEntry { partial, detail_url }
            })
            .collect()
    }

    fn parse_detail_page(&self, page: &Page, mut partial: PartialRecord) -> Option<PartialRecord> {
        let root = page.root();
        partial.add_images(page.follow_all(all_attrs(root, "div.item-images a img", "data-src")));

        let mut sheet = SpecSheet::new();
        for row in select_all(root, "table tr") {
            let cells = select_all(row, "td");
            if let [label, value, ..] = cells.as_slice() {
                sheet.add(&mut partial, &self.mapping, &text_of(*label), &text_of(*value));
            }
        }
        if !sheet.is_empty() {
            partial.set(Field::Description, &sheet.joined());
        }

        Some(partial)
    }

    fn pagination_selector(&self) -> &'static str {
        r#"ul.pagination a[rel="next"]"#
    }
}
