//! Canonical listing record model
//!
//! Every site adapter populates the same [`Record`] schema. While a listing is
//! in flight between its listing page and its detail page it is carried as a
//! [`PartialRecord`], which only becomes a `Record` once all required fields
//! pass validation.

mod normalize;

pub use normalize::{
    apply_label_mapping, first_value, normalize_price, normalize_text, LabelMapping, PriceFormat,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Separator used when joining multi-row descriptions
pub const DESCRIPTION_SEPARATOR: &str = " | ";

/// Record validation failures
///
/// These are never fatal: an invalid record is dropped before it reaches the
/// collector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} is not an absolute URL: {value}")]
    NotAbsolute { field: &'static str, value: String },
}

/// Scalar fields of a [`Record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Price,
    Url,
    Description,
    ModelYear,
    Condition,
    Transmission,
    Manufacturer,
    Model,
    FuelType,
    EngineCapacity,
    Mileage,
    Color,
    Site,
}

impl Field {
    /// The canonical (wire) name of this field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Price => "price",
            Self::Url => "url",
            Self::Description => "description",
            Self::ModelYear => "modelYear",
            Self::Condition => "condition",
            Self::Transmission => "transmission",
            Self::Manufacturer => "manufacturer",
            Self::Model => "model",
            Self::FuelType => "fuelType",
            Self::EngineCapacity => "engineCapacity",
            Self::Mileage => "mileage",
            Self::Color => "color",
            Self::Site => "site",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finalized, validated listing
///
/// Field order here is the canonical serialization order. Optional vehicle
/// fields serialize as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub title: String,
    pub price: String,
    pub url: String,
    pub image: Vec<String>,
    pub description: String,
    pub model_year: Option<String>,
    pub condition: Option<String>,
    pub transmission: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub fuel_type: Option<String>,
    pub engine_capacity: Option<String>,
    pub mileage: Option<String>,
    pub color: Option<String>,
    pub site: String,
}

/// A record under construction
///
/// Scalar fields follow a "first value wins" rule: once a field holds a
/// non-empty value, later values for it are ignored. Images accumulate in
/// order, skipping exact duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRecord {
    title: Option<String>,
    price: Option<String>,
    url: Option<String>,
    image: Vec<String>,
    description: Option<String>,
    model_year: Option<String>,
    condition: Option<String>,
    transmission: Option<String>,
    manufacturer: Option<String>,
    model: Option<String>,
    fuel_type: Option<String>,
    engine_capacity: Option<String>,
    mileage: Option<String>,
    color: Option<String>,
    site: Option<String>,
}

impl PartialRecord {
    /// Starts a record for the given site identifier
    pub fn for_site(site: &str) -> Self {
        let mut partial = Self::default();
        partial.set(Field::Site, site);
        partial
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Price => &mut self.price,
            Field::Url => &mut self.url,
            Field::Description => &mut self.description,
            Field::ModelYear => &mut self.model_year,
            Field::Condition => &mut self.condition,
            Field::Transmission => &mut self.transmission,
            Field::Manufacturer => &mut self.manufacturer,
            Field::Model => &mut self.model,
            Field::FuelType => &mut self.fuel_type,
            Field::EngineCapacity => &mut self.engine_capacity,
            Field::Mileage => &mut self.mileage,
            Field::Color => &mut self.color,
            Field::Site => &mut self.site,
        }
    }

    /// Normalizes `raw` and stores it if the field is still empty
    ///
    /// Returns true if the value was stored.
    pub fn set(&mut self, field: Field, raw: &str) -> bool {
        let value = normalize_text(Some(raw));
        if value.is_empty() {
            return false;
        }

        let slot = self.slot(field);
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }

    /// Like [`set`](Self::set), but accepts an optional extraction
    pub fn set_opt(&mut self, field: Field, raw: Option<&str>) -> bool {
        match raw {
            Some(raw) => self.set(field, raw),
            None => false,
        }
    }

    /// Normalizes a raw price with the site's format and stores it
    pub fn set_price(&mut self, raw: &str, format: &PriceFormat) -> bool {
        let price = normalize_price(raw, format);
        self.set(Field::Price, &price)
    }

    /// Appends image URLs, keeping first-seen order
    pub fn add_images<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for url in urls {
            let url = normalize_text(Some(url.as_ref()));
            if !url.is_empty() && !self.image.contains(&url) {
                self.image.push(url);
            }
        }
    }

    /// Returns the current value of a scalar field
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Title => &self.title,
            Field::Price => &self.price,
            Field::Url => &self.url,
            Field::Description => &self.description,
            Field::ModelYear => &self.model_year,
            Field::Condition => &self.condition,
            Field::Transmission => &self.transmission,
            Field::Manufacturer => &self.manufacturer,
            Field::Model => &self.model,
            Field::FuelType => &self.fuel_type,
            Field::EngineCapacity => &self.engine_capacity,
            Field::Mileage => &self.mileage,
            Field::Color => &self.color,
            Field::Site => &self.site,
        };
        value.as_deref()
    }

    /// Images collected so far
    pub fn images(&self) -> &[String] {
        &self.image
    }

    /// Validates required fields and converts into a [`Record`]
    ///
    /// Required: title, price, url (absolute), at least one image (absolute),
    /// description and site.
    pub fn finalize(self) -> Result<Record, ValidationError> {
        fn required(value: Option<String>, field: Field) -> Result<String, ValidationError> {
            value
                .filter(|v| !v.is_empty())
                .ok_or(ValidationError::MissingField(field.as_str()))
        }

        fn absolute(value: &str, field: &'static str) -> Result<(), ValidationError> {
            match Url::parse(value) {
                Ok(url) if !url.cannot_be_a_base() => Ok(()),
                _ => Err(ValidationError::NotAbsolute {
                    field,
                    value: value.to_string(),
                }),
            }
        }

        let title = required(self.title, Field::Title)?;
        let price = required(self.price, Field::Price)?;
        let url = required(self.url, Field::Url)?;
        absolute(&url, "url")?;

        if self.image.is_empty() {
            return Err(ValidationError::MissingField("image"));
        }
        for image in &self.image {
            absolute(image, "image")?;
        }

        let description = required(self.description, Field::Description)?;
        let site = required(self.site, Field::Site)?;

        Ok(Record {
            title,
            price,
            url,
            image: self.image,
            description,
            model_year: self.model_year,
            condition: self.condition,
            transmission: self.transmission,
            manufacturer: self.manufacturer,
            model: self.model,
            fuel_type: self.fuel_type,
            engine_capacity: self.engine_capacity,
            mileage: self.mileage,
            color: self.color,
            site,
        })
    }
}

/// Collects `label: value` rows of a spec table into a description
///
/// Rows whose label maps to a field also populate that field. Every row is
/// appended to the description in source order, mapped or not.
#[derive(Debug, Default)]
pub struct SpecSheet {
    rows: Vec<String>,
}

impl SpecSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row; blank labels or values are skipped
    pub fn add(
        &mut self,
        partial: &mut PartialRecord,
        mapping: &LabelMapping,
        label: &str,
        value: &str,
    ) {
        let label = normalize_text(Some(label));
        let value = normalize_text(Some(value));
        if label.is_empty() || value.is_empty() {
            return;
        }

        if let Some(field) = apply_label_mapping(&label, mapping) {
            partial.set(field, &value);
        }
        self.rows.push(format!("{}: {}", label, value));
    }

    /// Adds a free-text line that has no label
    pub fn add_line(&mut self, line: &str) {
        let line = normalize_text(Some(line));
        if !line.is_empty() {
            self.rows.push(line);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Joins the collected rows with [`DESCRIPTION_SEPARATOR`]
    pub fn joined(&self) -> String {
        self.rows.join(DESCRIPTION_SEPARATOR)
    }
}
