//! Configuration module for market-trawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use market_trawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawler.toml")).unwrap();
//! for category in &config.categories {
//!     println!("{} -> {}", category.name, category.output_file);
//! }
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CategoryConfig, Config, CrawlerConfig, OutputConfig, PublishConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
