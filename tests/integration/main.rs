//! Integration tests for market-trawler
//!
//! Crawls run against an in-memory page map; the publish API is served by
//! wiremock.

mod common;
mod crawl_tests;
mod publish_tests;
mod run_tests;
