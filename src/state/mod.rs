//! Per-run crawl state
//!
//! Everything that changes while a category crawl runs lives in values owned
//! by the dispatcher. Nothing here is global.
//!
//! # Components
//!
//! - `SitePhase`: Pagination lifecycle of one site (idle, paging, done)
//! - `SiteState`: Page counter and open pagination chains for one site

mod site_state;

pub use site_state::{SitePhase, SiteState};
