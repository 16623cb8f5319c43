//! Field normalization
//!
//! Every raw value scraped from a page goes through the same two stages before
//! it lands in a record: markup tags are stripped, then whitespace is trimmed
//! and collapsed. Price values additionally pass through a site-specific
//! [`PriceFormat`].

use crate::crawler::parser::text_of;
use crate::record::Field;
use scraper::Html;
use std::collections::HashMap;

/// Strips markup tags and collapses whitespace
///
/// Embedded newlines, carriage returns and runs of spaces are folded into a
/// single space and the result is trimmed. A `None` input yields an empty
/// string; this function never fails.
///
/// # Example
///
/// ```
/// use market_trawler::record::normalize_text;
///
/// assert_eq!(normalize_text(Some("  <b>Toyota</b>\n Axio ")), "Toyota Axio");
/// assert_eq!(normalize_text(None), "");
/// ```
pub fn normalize_text(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    collapse_whitespace(&strip_tags(raw))
}

/// Removes markup tags, keeping only the text content
fn strip_tags(raw: &str) -> String {
    if !raw.contains('<') {
        return raw.to_string();
    }

    let fragment = Html::parse_fragment(raw);
    text_of(fragment.root_element())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Site-specific price cleanup rules
#[derive(Debug, Clone, Copy)]
pub struct PriceFormat {
    /// Currency tokens removed from the price, tried in order
    pub currency_tokens: &'static [&'static str],

    /// Whether thousands-separator commas are removed as well
    pub strip_thousands: bool,
}

impl PriceFormat {
    /// `Rs.` prefix as shown by riyasewana
    pub const RS_DOT: Self = Self {
        currency_tokens: &["Rs."],
        strip_thousands: false,
    };

    /// Plain `Rs` prefix (patpat, autolanka)
    pub const RS: Self = Self {
        currency_tokens: &["Rs.", "Rs"],
        strip_thousands: false,
    };

    /// WooCommerce storefront amounts, with either the Latin or Sinhala symbol
    pub const STOREFRONT: Self = Self {
        currency_tokens: &["Rs.", "Rs", "රු.", "රු"],
        strip_thousands: false,
    };

    /// Upper-case `RS` prefix with comma separators (saleme)
    pub const RS_UPPER_NO_COMMAS: Self = Self {
        currency_tokens: &["RS"],
        strip_thousands: true,
    };
}

/// Normalizes a raw price string according to a site's [`PriceFormat`]
///
/// # Example
///
/// ```
/// use market_trawler::record::{normalize_price, PriceFormat};
///
/// assert_eq!(normalize_price("Rs. 4,250,000\r\n", &PriceFormat::RS_DOT), "4,250,000");
/// assert_eq!(normalize_price("RS 385,000", &PriceFormat::RS_UPPER_NO_COMMAS), "385000");
/// ```
pub fn normalize_price(raw: &str, format: &PriceFormat) -> String {
    let mut price = normalize_text(Some(raw));

    for token in format.currency_tokens {
        price = price.replace(token, "");
    }

    price.retain(|c| !c.is_whitespace());

    if format.strip_thousands {
        price.retain(|c| c != ',');
    }

    price
}

/// Case-insensitive lookup table from raw spec-table labels to record fields
#[derive(Debug, Clone, Default)]
pub struct LabelMapping {
    entries: HashMap<String, Field>,
}

impl LabelMapping {
    /// Builds a mapping from `(label, field)` pairs
    pub fn new(pairs: &[(&str, Field)]) -> Self {
        let entries = pairs
            .iter()
            .map(|(label, field)| (label.trim().to_lowercase(), *field))
            .collect();
        Self { entries }
    }

    /// The vehicle spec-table labels used by riyasewana-style listings
    pub fn vehicle_spec_table() -> Self {
        Self::new(&[
            ("yom", Field::ModelYear),
            ("make", Field::Manufacturer),
            ("model", Field::Model),
            ("gear", Field::Transmission),
            ("fuel type", Field::FuelType),
            ("engine (cc)", Field::EngineCapacity),
            ("mileage (km)", Field::Mileage),
        ])
    }

    /// Number of labels known to this mapping
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the mapping has no labels
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps a raw label to a canonical field
///
/// The lookup trims the label and ignores case. An unknown label is not an
/// error; it simply has no field and only contributes to the description.
///
/// # Example
///
/// ```
/// use market_trawler::record::{apply_label_mapping, Field, LabelMapping};
///
/// let mapping = LabelMapping::vehicle_spec_table();
/// assert_eq!(apply_label_mapping(" YoM ", &mapping), Some(Field::ModelYear));
/// assert_eq!(apply_label_mapping("unknown-label", &mapping), None);
/// ```
pub fn apply_label_mapping(label: &str, mapping: &LabelMapping) -> Option<Field> {
    let key = normalize_text(Some(label)).to_lowercase();
    mapping.entries.get(&key).copied()
}

/// Reduces a multi-valued extraction to its first non-empty normalized value
pub fn first_value<I, S>(values: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| normalize_text(Some(v.as_ref())))
        .find(|v| !v.is_empty())
}
