//! riyasewana.com classified listings
//!
//! Detail pages carry a four-column spec table: two `label | value` pairs per
//! row, labels marked with `p.moreh`. Known labels populate the vehicle
//! fields; every pair goes into the description.

use crate::adapters::{ListingEntry, SiteAdapter};
use crate::crawler::parser::{all_attrs, first_attr, first_text, select_all, text_of, Page};
use crate::record::{normalize_text, Field, LabelMapping, PartialRecord, PriceFormat, SpecSheet};
use url::Url;

const SITE: &str = "riyasewana";

pub struct Riyasewana {
    mapping: LabelMapping,
}

impl Riyasewana {
    pub fn new() -> Self {
        Self {
            mapping: LabelMapping::vehicle_spec_table(),
        }
    }
}

impl Default for Riyasewana {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteAdapter for Riyasewana {
    fn site(&self) -> &'static str {
        SITE
    }

    fn signature(&self) -> &'static str {
        "riyasewana.com"
    }

    fn parse_listing_page(&self, page: &Page) -> Vec<ListingEntry> {
        select_all(page.root(), "li.item")
            .into_iter()
            .map(|item| {
                let mut partial = PartialRecord::for_site(SITE);
                partial.set_opt(Field::Title, first_text(item, "h2.more a").as_deref());
                if let Some(price) = first_text(item, "div.boxintxt.b") {
                    partial.set_price(&price, &PriceFormat::RS_DOT);
                }

                let detail_url = first_attr(item, "h2.more a", "href").and_then(|href| page.follow(&href));
                if let Some(url) = &detail_url {
                    partial.set(Field::Url, url.as_str());
                }

                ListingEntry { partial, detail_url }
            })
            .collect()
    }

    fn parse_detail_page(&self, page: &Page, mut partial: PartialRecord) -> Option<PartialRecord> {
        let root = page.root();
        partial.add_images(page.follow_all(all_attrs(root, "div.thumb a", "href")));

        let mut sheet = SpecSheet::new();
        for row in select_all(root, "table.moret tr") {
            let cells = select_all(row, "td");
            if cells.len() != 4 {
                continue;
            }
            for pair in cells.chunks(2) {
                let label = first_text(pair[0], "p.moreh").unwrap_or_default();
                sheet.add(&mut partial, &self.mapping, &label, &text_of(pair[1]));
            }
        }
        if !sheet.is_empty() {
            partial.set(Field::Description, &sheet.joined());
        }

        Some(partial)
    }

    fn pagination_selector(&self) -> &'static str {
        "div.pagination a"
    }

    /// The pager has no class on its "Next" link, so it is picked by text
    fn next_page_url(&self, page: &Page) -> Option<Url> {
        select_all(page.root(), self.pagination_selector())
            .into_iter()
            .find(|link| normalize_text(Some(text_of(*link).as_str())) == "Next")
            .and_then(|link| link.value().attr("href"))
            .and_then(|href| page.follow(href))
    }
}
