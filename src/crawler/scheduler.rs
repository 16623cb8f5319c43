//! Work queue and pagination bookkeeping
//!
//! This module handles:
//! - The FIFO queue of listing and detail fetches waiting to be issued
//! - Global concurrency limiting via a semaphore
//! - Per-site page counters and pagination chains

use crate::adapters::SiteId;
use crate::record::PartialRecord;
use crate::state::{SitePhase, SiteState};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// What a fetched page is expected to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// A seed or next-page listing page
    Listing,

    /// A detail page, carrying the fields read from its listing entry
    Detail(PartialRecord),
}

/// A page fetch together with its routing context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// The URL to fetch
    pub url: Url,

    /// The site that scheduled this fetch
    pub site: SiteId,

    pub kind: RequestKind,
}

impl FetchRequest {
    pub fn listing(url: Url, site: SiteId) -> Self {
        Self {
            url,
            site,
            kind: RequestKind::Listing,
        }
    }

    pub fn detail(url: Url, site: SiteId, partial: PartialRecord) -> Self {
        Self {
            url,
            site,
            kind: RequestKind::Detail(partial),
        }
    }
}

/// A fetch cleared to run, holding one slot of the concurrency limit
///
/// The slot is released when this value is dropped.
pub struct ScheduledFetch {
    pub request: FetchRequest,

    _permit: OwnedSemaphorePermit,
}

/// Scheduler manages the work queue and per-site pagination state
///
/// The scheduler coordinates:
/// - Global concurrency limits (max fetches in flight)
/// - Per-site page counters against each site's `max_pages`
/// - Site lifecycle (idle, paging, done)
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    global_semaphore: Arc<Semaphore>,

    /// Per-site pagination state
    site_states: HashMap<SiteId, SiteState>,

    /// Fetches waiting for a free slot, in scheduling order
    queue: VecDeque<FetchRequest>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `max_in_flight` - Maximum number of fetches allowed at once
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            global_semaphore: Arc::new(Semaphore::new(max_in_flight.max(1))),
            site_states: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    /// Registers a site with its page cap
    pub fn register_site(&mut self, site: SiteId, max_pages: u32) {
        self.site_states.insert(site, SiteState::new(max_pages));
    }

    /// Queues a seed listing page and opens a pagination chain for it
    pub fn seed(&mut self, site: SiteId, url: Url) {
        let state = self
            .site_states
            .entry(site)
            .or_insert_with(|| SiteState::new(0));
        state.start_chain();

        tracing::debug!("Seeding site {} with {}", site, url);
        self.queue.push_back(FetchRequest::listing(url, site));
    }

    /// Adds a fetch to the back of the queue
    pub fn schedule(&mut self, request: FetchRequest) {
        self.queue.push_back(request);
    }

    /// Takes the next queued fetch if a concurrency slot is free
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledFetch)` - A fetch that may be issued now
    /// * `None` - The queue is empty or every slot is taken
    pub fn next_request(&mut self) -> Option<ScheduledFetch> {
        if self.queue.is_empty() {
            return None;
        }

        let permit = self.global_semaphore.clone().try_acquire_owned().ok()?;
        let request = self.queue.pop_front()?;

        tracing::trace!("Issuing fetch for {}", request.url);
        Some(ScheduledFetch {
            request,
            _permit: permit,
        })
    }

    /// Tries to follow a next-page link for a site
    ///
    /// Increments the site's page counter and returns true if the cap allows
    /// it; otherwise ends the chain and returns false.
    pub fn advance(&mut self, site: SiteId) -> bool {
        match self.site_states.get_mut(&site) {
            Some(state) => {
                let advanced = state.try_advance();
                if !advanced {
                    tracing::info!(
                        "Site {} reached its page cap ({} pages)",
                        site,
                        state.max_pages()
                    );
                }
                self.log_if_done(site);
                advanced
            }
            None => false,
        }
    }

    /// Ends one pagination chain of a site
    pub fn end_chain(&mut self, site: SiteId) {
        if let Some(state) = self.site_states.get_mut(&site) {
            state.end_chain();
        }
        self.log_if_done(site);
    }

    fn log_if_done(&self, site: SiteId) {
        if let Some(state) = self.site_states.get(&site) {
            if state.is_done() {
                tracing::debug!(
                    "Site {} is done after {} next pages",
                    site,
                    state.page_count()
                );
            }
        }
    }

    /// Returns the number of fetches waiting in the queue
    pub fn queue_size(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Gets the pagination state for a specific site
    pub fn get_site_state(&self, site: SiteId) -> Option<&SiteState> {
        self.site_states.get(&site)
    }

    /// Phase of a site, `Idle` for sites never registered
    pub fn site_phase(&self, site: SiteId) -> SitePhase {
        self.site_states
            .get(&site)
            .map(SiteState::phase)
            .unwrap_or(SitePhase::Idle)
    }
}
