//! URL helpers for routing pages to adapters

use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use market_trawler::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Patpat.lk/vehicle/car").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.patpat.lk".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether a host belongs to a site signature
///
/// A signature matches when it appears as a substring of the host, compared
/// case-insensitively. Only the host is considered, never the path or query.
///
/// # Examples
///
/// ```
/// use market_trawler::url::matches_signature;
///
/// assert!(matches_signature("saleme.lk", "www.saleme.lk"));
/// assert!(matches_signature("riyasewana.com", "RIYASEWANA.COM"));
/// assert!(!matches_signature("otc.lk", "celltronics.lk"));
/// ```
pub fn matches_signature(signature: &str, host: &str) -> bool {
    !signature.is_empty() && host.to_lowercase().contains(&signature.to_lowercase())
}

/// Checks a URL against a site signature
pub fn url_matches_signature(signature: &str, url: &Url) -> bool {
    extract_domain(url)
        .map(|host| matches_signature(signature, &host))
        .unwrap_or(false)
}
