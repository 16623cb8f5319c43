//! Crawl dispatcher - response routing and the event loop
//!
//! Every fetched page is turned into a list of [`Action`]s by a response
//! handler, and the actions are then applied one at a time. Handlers run
//! strictly one after another, so page counters and the collector need no
//! locking; only the network I/O overlaps.

use crate::adapters::{AdapterRegistry, SiteId};
use crate::collector::Collector;
use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::crawler::parser::Page;
use crate::crawler::scheduler::{FetchRequest, RequestKind, ScheduledFetch, Scheduler};
use crate::record::PartialRecord;
use crate::state::SitePhase;
use crate::url::url_matches_signature;
use futures::stream::{FuturesUnordered, StreamExt};
use url::Url;

/// Next step produced by a response handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Queue another page (next listing page or a detail page)
    Fetch(FetchRequest),

    /// Validate a completed partial and hand it to the collector
    Finalize { site: SiteId, partial: PartialRecord },
}

/// Counters for one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub listing_pages: u64,
    pub detail_pages: u64,
    pub fetch_failures: u64,
    /// Listing pages not served from the host of the site that scheduled them
    pub unrouted_pages: u64,
    pub records_collected: u64,
    pub dropped_invalid: u64,
    /// Listings dropped because the detail page marked them unavailable
    pub dropped_out_of_stock: u64,
    pub duplicates: u64,
}

/// Owns all per-run state: registry, work queue, page counters and collector
pub struct Dispatcher {
    registry: AdapterRegistry,
    scheduler: Scheduler,
    collector: Collector,
    stats: CrawlStats,
}

impl Dispatcher {
    /// Creates a dispatcher and queues every site's seeds
    ///
    /// # Arguments
    ///
    /// * `registry` - The sites of the category being crawled
    /// * `collector` - Destination of finalized records
    /// * `max_in_flight` - Maximum number of fetches in flight
    pub fn new(registry: AdapterRegistry, collector: Collector, max_in_flight: usize) -> Self {
        let mut scheduler = Scheduler::new(max_in_flight);

        for (id, site) in registry.iter() {
            scheduler.register_site(id, site.max_pages);
            for seed in &site.seeds {
                scheduler.seed(id, seed.clone());
            }
        }

        Self {
            registry,
            scheduler,
            collector,
            stats: CrawlStats::default(),
        }
    }

    /// Takes the next fetch to issue, if any is queued and a slot is free
    pub fn next_fetch(&mut self) -> Option<ScheduledFetch> {
        self.scheduler.next_request()
    }

    /// Handles a fetch outcome and applies the resulting actions
    pub fn process(&mut self, request: FetchRequest, result: FetchResult) {
        let actions = self.handle_response(request, result);
        self.apply(actions);
    }

    /// Turns a fetch outcome into follow-up actions
    ///
    /// Pagination bookkeeping happens here: a next-page fetch is only emitted
    /// after the site's page counter has been incremented.
    pub fn handle_response(&mut self, request: FetchRequest, result: FetchResult) -> Vec<Action> {
        let FetchRequest { url, site, kind } = request;

        let (final_url, body) = match result {
            FetchResult::Success {
                final_url, body, ..
            } => (final_url, body),
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Fetch of {} failed with HTTP {}", url, status_code);
                self.fetch_failed(site, &kind);
                return Vec::new();
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Fetch of {} failed: {}", url, error);
                self.fetch_failed(site, &kind);
                return Vec::new();
            }
        };

        match kind {
            RequestKind::Listing => self.handle_listing(site, final_url, &body),
            RequestKind::Detail(partial) => self.handle_detail(site, final_url, &body, partial),
        }
    }

    fn fetch_failed(&mut self, site: SiteId, kind: &RequestKind) {
        self.stats.fetch_failures += 1;
        if matches!(kind, RequestKind::Listing) {
            self.scheduler.end_chain(site);
        }
    }

    /// Listing pages must be served from the host of the site that scheduled them
    fn handle_listing(&mut self, site: SiteId, final_url: Url, body: &str) -> Vec<Action> {
        self.stats.listing_pages += 1;

        let registered = match self.registry.get(site) {
            Some(registered) if url_matches_signature(registered.adapter.signature(), &final_url) => {
                registered
            }
            _ => {
                tracing::warn!(
                    "Listing page {} does not belong to site {} (host matches {:?}); ending its chain",
                    final_url,
                    site,
                    self.registry.resolve(&final_url)
                );
                self.stats.unrouted_pages += 1;
                self.scheduler.end_chain(site);
                return Vec::new();
            }
        };
        let adapter = registered.adapter.as_ref();

        let page = Page::parse(final_url, body);
        let entries = adapter.parse_listing_page(&page);
        tracing::debug!(
            "{}: {} entries on {}",
            adapter.site(),
            entries.len(),
            page.url()
        );

        let mut actions: Vec<Action> = entries
            .into_iter()
            .map(|entry| match entry.detail_url {
                Some(detail_url) => {
                    Action::Fetch(FetchRequest::detail(detail_url, site, entry.partial))
                }
                None => Action::Finalize {
                    site,
                    partial: entry.partial,
                },
            })
            .collect();

        match adapter.next_page_url(&page) {
            Some(next) => {
                if self.scheduler.advance(site) {
                    tracing::debug!("{}: following next page {}", adapter.site(), next);
                    actions.push(Action::Fetch(FetchRequest::listing(next, site)));
                }
            }
            None => {
                tracing::debug!("{}: no next page on {}", adapter.site(), page.url());
                self.scheduler.end_chain(site);
            }
        }

        actions
    }

    /// Detail pages are routed by the site carried in the request
    fn handle_detail(
        &mut self,
        site: SiteId,
        final_url: Url,
        body: &str,
        partial: PartialRecord,
    ) -> Vec<Action> {
        self.stats.detail_pages += 1;

        let Some(registered) = self.registry.get(site) else {
            tracing::warn!("Detail page {} carries unknown site {}", final_url, site);
            return Vec::new();
        };

        let page = Page::parse(final_url, body);
        match registered.adapter.parse_detail_page(&page, partial) {
            Some(partial) => vec![Action::Finalize { site, partial }],
            None => {
                tracing::debug!("Dropping unavailable listing {}", page.url());
                self.stats.dropped_out_of_stock += 1;
                Vec::new()
            }
        }
    }

    /// Applies actions in order
    pub fn apply(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Fetch(request) => self.scheduler.schedule(request),
                Action::Finalize { site, partial } => self.finalize(site, partial),
            }
        }
    }

    fn finalize(&mut self, site: SiteId, partial: PartialRecord) {
        match partial.finalize() {
            Ok(record) => {
                if self.collector.insert(record) {
                    self.stats.records_collected += 1;
                } else {
                    self.stats.duplicates += 1;
                }
            }
            Err(e) => {
                tracing::debug!("Dropping invalid record from site {}: {}", site, e);
                self.stats.dropped_invalid += 1;
            }
        }
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    /// Number of fetches queued but not yet issued
    pub fn pending(&self) -> usize {
        self.scheduler.queue_size()
    }

    pub fn site_phase(&self, site: SiteId) -> SitePhase {
        self.scheduler.site_phase(site)
    }

    /// Next-page links followed so far for a site
    pub fn page_count(&self, site: SiteId) -> u32 {
        self.scheduler
            .get_site_state(site)
            .map(|state| state.page_count())
            .unwrap_or(0)
    }

    /// Ends the run, handing back the collector and counters
    pub fn finish(self) -> (Collector, CrawlStats) {
        (self.collector, self.stats)
    }
}

/// Runs the event loop until no fetch is queued or in flight
///
/// Up to the scheduler's concurrency limit of fetches overlap; their
/// responses are handled one at a time as they complete. A failed fetch
/// counts as a response, so it can never stall the loop.
pub async fn drive<F: PageFetcher>(dispatcher: &mut Dispatcher, fetcher: &F) {
    let mut in_flight = FuturesUnordered::new();

    loop {
        while let Some(scheduled) = dispatcher.next_fetch() {
            in_flight.push(async move {
                let result = fetcher.fetch(&scheduled.request.url).await;
                (scheduled, result)
            });
        }

        let Some((scheduled, result)) = in_flight.next().await else {
            break;
        };

        // The concurrency slot is held until the response has been handled
        let ScheduledFetch { request, .. } = scheduled;
        dispatcher.process(request, result);
    }

    tracing::debug!("Event loop finished; {} fetches pending", dispatcher.pending());
}
