//! Deduplicating record collector
//!
//! Holds finalized records for one run in first-seen order. Inserting a
//! record whose identity is already present is a silent no-op.

use crate::record::Record;
use serde::Deserialize;
use std::collections::HashSet;

/// What makes two records the same listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupKey {
    /// Full structural equality over every field
    #[default]
    Record,

    /// Records with the same `url` are the same listing, even if other fields differ
    Url,
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum Identity {
    Record(Record),
    Url(String),
}

/// Run-scoped set of finalized records
///
/// # Example
///
/// ```
/// use market_trawler::collector::{Collector, DedupKey};
/// use market_trawler::record::{Field, PartialRecord};
///
/// let mut partial = PartialRecord::for_site("otc");
/// partial.set(Field::Title, "Rode NT-USB");
/// partial.set(Field::Price, "62,000.00");
/// partial.set(Field::Url, "https://otc.lk/product/rode-nt-usb/");
/// partial.set(Field::Description, "USB condenser");
/// partial.add_images(["https://otc.lk/img/nt-usb.jpg"]);
/// let record = partial.finalize().unwrap();
///
/// let mut collector = Collector::new(DedupKey::Record);
/// assert!(collector.insert(record.clone()));
/// assert!(!collector.insert(record));
/// assert_eq!(collector.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Collector {
    key: DedupKey,
    records: Vec<Record>,
    seen: HashSet<Identity>,
}

impl Collector {
    pub fn new(key: DedupKey) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    fn identity(&self, record: &Record) -> Identity {
        match self.key {
            DedupKey::Record => Identity::Record(record.clone()),
            DedupKey::Url => Identity::Url(record.url.clone()),
        }
    }

    /// Adds a record unless an equal one is already held
    ///
    /// # Returns
    ///
    /// * `true` - The record was appended
    /// * `false` - It was a duplicate and has been discarded
    pub fn insert(&mut self, record: Record) -> bool {
        if self.seen.insert(self.identity(&record)) {
            self.records.push(record);
            true
        } else {
            tracing::debug!("Duplicate record discarded: {}", record.url);
            false
        }
    }

    /// Removes and returns every record in insertion order
    pub fn drain(&mut self) -> Vec<Record> {
        self.seen.clear();
        std::mem::take(&mut self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
