//! Parsed page handle and selector helpers
//!
//! Adapters never touch raw HTML. They receive a [`Page`] and pull values out
//! of it with the helpers here. A selector that fails to parse or matches
//! nothing simply yields `None` or an empty list; whether that matters is
//! decided later by record validation.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A fetched page: its final URL plus the parsed document
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    /// Parses an HTML body fetched from `url`
    ///
    /// # Example
    ///
    /// ```
    /// use market_trawler::crawler::Page;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://example.com/list").unwrap();
    /// let page = Page::parse(url, r#"<html><body><a href="/item/1">Item</a></body></html>"#);
    /// assert_eq!(
    ///     page.follow("/item/1").map(|u| u.to_string()),
    ///     Some("https://example.com/item/1".to_string())
    /// );
    /// ```
    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(body),
        }
    }

    /// The URL the page was served from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The document root, used as the scope for page-wide selections
    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// Resolves a link against this page's URL
    ///
    /// Returns `None` for links that should never be followed.
    pub fn follow(&self, href: &str) -> Option<Url> {
        resolve_link(href, &self.url)
    }

    /// Resolves every link in `hrefs`, dropping the ones that can't be followed
    pub fn follow_all<I, S>(&self, hrefs: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        hrefs
            .into_iter()
            .filter_map(|href| self.follow(href.as_ref()))
            .map(String::from)
            .collect()
    }
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!("Invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}

/// All elements under `scope` matching `css`, in document order
pub fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(selector) => scope.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// The first element under `scope` matching `css`
pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    scope.select(&selector).next()
}

/// Elements whose boundaries separate words
const BREAKING_ELEMENTS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "td", "th", "tr", "table", "tbody", "thead", "dt", "dd",
    "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Text content of an element
///
/// Text inside inline markup is joined as-is (`S2<sup>4</sup>` reads `S24`);
/// block and cell boundaries become a space. Whitespace is not collapsed here.
pub fn text_of(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    collect_text(element, &mut text);
    text
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child) = ElementRef::wrap(child) {
            let breaking = BREAKING_ELEMENTS.contains(&child.value().name());
            if breaking {
                out.push(' ');
            }
            collect_text(child, out);
            if breaking {
                out.push(' ');
            }
        } else if let Some(fragment) = child.value().as_text() {
            out.push_str(fragment);
        }
    }
}

/// Text of the first match of `css`
pub fn first_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    select_first(scope, css).map(text_of)
}

/// Text of every match of `css`
pub fn all_texts(scope: ElementRef<'_>, css: &str) -> Vec<String> {
    select_all(scope, css).into_iter().map(text_of).collect()
}

/// Attribute value of the first match of `css` that carries `attr`
pub fn first_attr(scope: ElementRef<'_>, css: &str, attr: &str) -> Option<String> {
    select_all(scope, css)
        .into_iter()
        .find_map(|e| e.value().attr(attr).map(str::to_string))
}

/// Attribute values of every match of `css` that carries `attr`
pub fn all_attrs(scope: ElementRef<'_>, css: &str, attr: &str) -> Vec<String> {
    select_all(scope, css)
        .into_iter()
        .filter_map(|e| e.value().attr(attr).map(str::to_string))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => Some(absolute_url),
        _ => None,
    }
}
