//! Site adapters
//!
//! One adapter per source site. An adapter knows how to read that site's
//! listing pages, its detail pages and its pagination, and which entries to
//! skip as out of stock. Adapters are stateless: the per-run page counters
//! live with the dispatcher.

mod autolanka;
mod celltronics;
mod dialcom;
mod lifemobile;
mod otc;
mod patpat;
mod registry;
mod riyasewana;
mod saleme;
mod woocommerce;
mod xmobile;

pub use registry::{AdapterRegistry, RegisteredSite, SiteId};

use crate::crawler::parser::{first_attr, first_text, Page};
use crate::record::{normalize_text, PartialRecord};
use scraper::ElementRef;
use serde::Deserialize;
use std::fmt;
use url::Url;

/// One surviving entry from a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Fields visible on the listing page
    pub partial: PartialRecord,

    /// Detail page to follow, if any. Without one the partial is finalized
    /// straight from the listing page.
    pub detail_url: Option<Url>,
}

/// How an availability marker is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockMatch {
    /// The normalized marker text equals the pattern
    Exact,
    /// The normalized marker text contains the pattern
    Contains,
}

/// Page stage at which stock availability is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStage {
    Listing,
    Detail,
}

/// Out-of-stock detection rule for a site
#[derive(Debug, Clone, Copy)]
pub struct StockFilter {
    pub stage: StockStage,
    pub selector: &'static str,
    pub pattern: &'static str,
    pub matching: StockMatch,
}

impl StockFilter {
    /// Returns true if the element under `scope` marks the entry unavailable
    pub fn is_out_of_stock(&self, scope: ElementRef<'_>) -> bool {
        let Some(marker) = first_text(scope, self.selector) else {
            return false;
        };
        let marker = normalize_text(Some(marker.as_str()));

        match self.matching {
            StockMatch::Exact => marker == self.pattern,
            StockMatch::Contains => marker.contains(self.pattern),
        }
    }

    /// Applies the filter if it belongs to `stage`
    pub fn rejects(&self, stage: StockStage, scope: ElementRef<'_>) -> bool {
        self.stage == stage && self.is_out_of_stock(scope)
    }
}

/// Site-specific parsing and pagination
pub trait SiteAdapter: Send + Sync {
    /// Identifier written into every record's `site` field
    fn site(&self) -> &'static str;

    /// Host substring that identifies pages served by this site
    fn signature(&self) -> &'static str;

    /// Reads the listing entries of a listing page in source order
    ///
    /// Out-of-stock entries visible at this stage are already filtered out.
    fn parse_listing_page(&self, page: &Page) -> Vec<ListingEntry>;

    /// Merges detail-page fields into the carried partial
    ///
    /// Returns `None` when the detail page marks the listing unavailable.
    fn parse_detail_page(&self, page: &Page, partial: PartialRecord) -> Option<PartialRecord>;

    /// Selector of the "next page" link
    fn pagination_selector(&self) -> &'static str;

    /// Availability rule, if the site exposes one
    fn stock_filter(&self) -> Option<StockFilter> {
        None
    }

    /// Returns true if the site's availability rule marks `scope` unavailable at `stage`
    fn out_of_stock(&self, stage: StockStage, scope: ElementRef<'_>) -> bool {
        self.stock_filter()
            .is_some_and(|filter| filter.rejects(stage, scope))
    }

    /// Extracts the next listing page link, if present
    fn next_page_url(&self, page: &Page) -> Option<Url> {
        let href = first_attr(page.root(), self.pagination_selector(), "href")?;
        page.follow(&href)
    }
}

/// The adapters this crate ships, as named in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    Riyasewana,
    Patpat,
    Autolanka,
    Saleme,
    Celltronics,
    Lifemobile,
    Otc,
    Xmobile,
    Dialcom,
}

impl AdapterKind {
    /// Instantiates the adapter
    pub fn build(self) -> Box<dyn SiteAdapter> {
        match self {
            Self::Riyasewana => Box::new(riyasewana::Riyasewana::new()),
            Self::Patpat => Box::new(patpat::Patpat::new()),
            Self::Autolanka => Box::new(autolanka::Autolanka::new()),
            Self::Saleme => Box::new(saleme::Saleme::new()),
            Self::Celltronics => Box::new(celltronics::Celltronics),
            Self::Lifemobile => Box::new(lifemobile::Lifemobile),
            Self::Otc => Box::new(otc::Otc),
            Self::Xmobile => Box::new(xmobile::Xmobile),
            Self::Dialcom => Box::new(dialcom::Dialcom),
        }
    }

    /// Host substring used to route pages to this adapter
    pub fn signature(self) -> &'static str {
        match self {
            Self::Riyasewana => "riyasewana.com",
            Self::Patpat => "patpat.lk",
            Self::Autolanka => "autolanka.com",
            Self::Saleme => "saleme.lk",
            Self::Celltronics => "celltronics.lk",
            Self::Lifemobile => "lifemobile.lk",
            Self::Otc => "otc.lk",
            Self::Xmobile => "xmobile.lk",
            Self::Dialcom => "dialcom.lk",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Riyasewana => "riyasewana",
            Self::Patpat => "patpat",
            Self::Autolanka => "autolanka",
            Self::Saleme => "saleme",
            Self::Celltronics => "celltronics",
            Self::Lifemobile => "lifemobile",
            Self::Otc => "otc",
            Self::Xmobile => "xmobile",
            Self::Dialcom => "dialcom",
        };
        f.write_str(name)
    }
}
