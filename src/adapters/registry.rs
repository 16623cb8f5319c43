//! Adapter registry
//!
//! Maps site signatures to adapter instances for one crawl category. Pages
//! are routed by matching their host against each registered signature.

use crate::adapters::SiteAdapter;
use crate::config::CategoryConfig;
use crate::url::url_matches_signature;
use crate::ConfigError;
use std::fmt;
use url::Url;

/// Index of a site within its [`AdapterRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(pub usize);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An adapter together with its seeds and page cap
pub struct RegisteredSite {
    pub adapter: Box<dyn SiteAdapter>,
    pub seeds: Vec<Url>,
    pub max_pages: u32,
}

/// The set of sites crawled for one category
#[derive(Default)]
pub struct AdapterRegistry {
    sites: Vec<RegisteredSite>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry for a configured category
    pub fn from_category(category: &CategoryConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::new();

        for site in &category.sites {
            let seeds = site
                .seeds
                .iter()
                .map(|seed| {
                    Url::parse(seed).map_err(|e| {
                        ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            registry.register(site.adapter.build(), seeds, site.max_pages);
        }

        Ok(registry)
    }

    /// Adds a site and returns its id
    pub fn register(
        &mut self,
        adapter: Box<dyn SiteAdapter>,
        seeds: Vec<Url>,
        max_pages: u32,
    ) -> SiteId {
        tracing::debug!(
            "Registering adapter {} ({} seeds, max {} pages)",
            adapter.site(),
            seeds.len(),
            max_pages
        );
        self.sites.push(RegisteredSite {
            adapter,
            seeds,
            max_pages,
        });
        SiteId(self.sites.len() - 1)
    }

    /// Finds the site whose signature matches the URL's host
    pub fn resolve(&self, url: &Url) -> Option<SiteId> {
        self.sites
            .iter()
            .position(|site| url_matches_signature(site.adapter.signature(), url))
            .map(SiteId)
    }

    pub fn get(&self, id: SiteId) -> Option<&RegisteredSite> {
        self.sites.get(id.0)
    }

    /// Iterates over all sites with their ids
    pub fn iter(&self) -> impl Iterator<Item = (SiteId, &RegisteredSite)> {
        self.sites
            .iter()
            .enumerate()
            .map(|(index, site)| (SiteId(index), site))
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
