use crate::config::types::{CategoryConfig, Config, CrawlerConfig, OutputConfig, PublishConfig};
use crate::url::url_matches_signature;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_publish_config(&config.publish)?;
    validate_output_config(&config.output)?;
    validate_categories(&config.categories)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and 100, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be > 0".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates publish configuration
fn validate_publish_config(config: &PublishConfig) -> Result<(), ConfigError> {
    if config.chunk_size < 1 {
        return Err(ConfigError::Validation(format!(
            "chunk_size must be >= 1, got {}",
            config.chunk_size
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates category entries and their sites
fn validate_categories(categories: &[CategoryConfig]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "At least one [[category]] must be configured".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for category in categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Category name cannot be empty".to_string(),
            ));
        }

        if !names.insert(category.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate category '{}'",
                category.name
            )));
        }

        if category.output_file.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Category '{}' must name an output-file",
                category.name
            )));
        }

        if let Some(endpoint) = &category.endpoint {
            validate_http_url(endpoint, "endpoint")?;
        }

        if category.sites.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Category '{}' must have at least one [[category.site]]",
                category.name
            )));
        }

        let mut adapters = HashSet::new();
        for site in &category.sites {
            if !adapters.insert(site.adapter) {
                return Err(ConfigError::Validation(format!(
                    "Adapter '{}' is listed twice in category '{}'; put all its seeds in one [[category.site]]",
                    site.adapter, category.name
                )));
            }

            if site.seeds.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Site '{}' in category '{}' must have at least one seed URL",
                    site.adapter, category.name
                )));
            }

            for seed in &site.seeds {
                let url = validate_http_url(seed, "seed")?;

                if !url_matches_signature(site.adapter.signature(), &url) {
                    return Err(ConfigError::Validation(format!(
                        "Seed URL '{}' is not served by {} (expected host containing '{}')",
                        seed,
                        site.adapter,
                        site.adapter.signature()
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Parses an absolute http(s) URL
fn validate_http_url(raw: &str, what: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} URL '{}': {}", what, raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "{} URL '{}' must use http or https",
            what, raw
        )));
    }

    Ok(url)
}
