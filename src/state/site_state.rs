use std::fmt;

/// Pagination lifecycle of a site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SitePhase {
    /// No seed has been scheduled yet
    Idle,

    /// At least one pagination chain is still walking listing pages
    Paging,

    /// Every chain has ended; no more listing pages will be scheduled
    Done,
}

impl fmt::Display for SitePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Paging => "paging",
            Self::Done => "done",
        };
        write!(f, "{}", s)
    }
}

/// Tracks pagination progress for one site during a run
///
/// Each seed URL starts a pagination chain. A chain advances by one listing
/// page each time a "next" link is followed and ends when the site has no
/// next link, the page cap is reached or a listing fetch fails. The site is
/// [`SitePhase::Done`] once its last chain ends.
///
/// `page_count` is shared by all chains of the site and never decreases.
#[derive(Debug, Clone)]
pub struct SiteState {
    /// Next-page links followed so far
    page_count: u32,

    /// Maximum number of next-page links to follow
    max_pages: u32,

    /// Pagination chains that have not ended yet
    active_chains: u32,

    phase: SitePhase,
}

impl SiteState {
    /// Creates an idle state with the given page cap
    pub fn new(max_pages: u32) -> Self {
        Self {
            page_count: 0,
            max_pages,
            active_chains: 0,
            phase: SitePhase::Idle,
        }
    }

    /// Opens a pagination chain for a seed
    pub fn start_chain(&mut self) {
        self.active_chains += 1;
        self.phase = SitePhase::Paging;
    }

    /// Attempts to follow a next-page link
    ///
    /// # Returns
    ///
    /// * `true` - The page counter was incremented and the next page may be scheduled
    /// * `false` - The cap is reached; the chain has been ended
    pub fn try_advance(&mut self) -> bool {
        if self.phase == SitePhase::Paging && self.page_count < self.max_pages {
            self.page_count += 1;
            true
        } else {
            self.end_chain();
            false
        }
    }

    /// Ends one pagination chain
    ///
    /// Called when a listing page has no next link or its fetch failed.
    pub fn end_chain(&mut self) {
        self.active_chains = self.active_chains.saturating_sub(1);
        if self.active_chains == 0 && self.phase == SitePhase::Paging {
            self.phase = SitePhase::Done;
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn active_chains(&self) -> u32 {
        self.active_chains
    }

    pub fn phase(&self) -> SitePhase {
        self.phase
    }

    /// Returns true once no more listing pages will be scheduled for this site
    pub fn is_done(&self) -> bool {
        self.phase == SitePhase::Done
    }
}
