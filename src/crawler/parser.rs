//! HTML extraction of catalog structure
//!
//! This module turns fetched pages into the pieces the crawler navigates by:
//! - Brand links from the catalog page
//! - Device links from a brand listing page
//! - The "next page" pointer of a listing, with end-of-pagination detection
//! - The display title of a device detail page
//!
//! Which elements to read is driven entirely by the configured selectors.

use crate::config::{parse_selector, SelectorConfig};
use crate::crawler::fetcher::RawDocument;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Title used when a detail page has no title element
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Text of the pagination control that marks the last page
const END_OF_PAGINATION_TEXT: &str = "►";

/// Site-specific rules for reading catalog pages
pub trait Extractor: Send + Sync {
    /// `(brand name, absolute listing URL)` pairs in page order
    fn brand_links(&self, doc: &RawDocument) -> Vec<(String, String)>;

    /// `(model name, absolute detail URL)` pairs in page order
    fn device_links(&self, doc: &RawDocument) -> Vec<(String, String)>;

    /// Absolute URL of the next listing page, or `None` on the last page
    fn next_page_link(&self, doc: &RawDocument) -> Option<String>;

    /// Device display title, or [`UNKNOWN_TITLE`] when absent
    fn device_title(&self, doc: &RawDocument) -> String;
}

/// [`Extractor`] driven by CSS selectors
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    brand_links: Selector,
    device_links: Selector,
    next_page: Selector,
    device_title: Selector,
}

impl HtmlExtractor {
    /// Compiles the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(HtmlExtractor)` - All selectors parsed
    /// * `Err(ConfigError::InvalidSelector)` - A selector failed to parse
    pub fn new(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            brand_links: parse_selector(&config.brand_links)?,
            device_links: parse_selector(&config.device_links)?,
            next_page: parse_selector(&config.next_page)?,
            device_title: parse_selector(&config.device_title)?,
        })
    }

    fn named_links(&self, selector: &Selector, doc: &RawDocument) -> Vec<(String, String)> {
        let base_url = match Url::parse(&doc.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot resolve links on {}: {}", doc.url, e);
                return Vec::new();
            }
        };

        let document = Html::parse_document(&doc.body);
        let mut links = Vec::new();

        for element in document.select(selector) {
            let name = element_text(&element);
            if name.is_empty() {
                continue;
            }

            let Some(href) = element.value().attr("href") else {
                continue;
            };

            match resolve_link(href, &base_url) {
                Some(url) => links.push((name, url)),
                None => tracing::debug!("Skipping link '{}' with href '{}'", name, href),
            }
        }

        links
    }
}

impl Extractor for HtmlExtractor {
    fn brand_links(&self, doc: &RawDocument) -> Vec<(String, String)> {
        self.named_links(&self.brand_links, doc)
    }

    fn device_links(&self, doc: &RawDocument) -> Vec<(String, String)> {
        self.named_links(&self.device_links, doc)
    }

    fn next_page_link(&self, doc: &RawDocument) -> Option<String> {
        let document = Html::parse_document(&doc.body);

        // The forward arrow is the last pagination control on the page
        let pointer = document.select(&self.next_page).last()?;

        if is_end_of_pagination(&pointer) {
            tracing::debug!("Reached end of pagination on {}", doc.url);
            return None;
        }

        let href = pointer.value().attr("href")?;
        let base_url = Url::parse(&doc.url).ok()?;
        resolve_link(href, &base_url)
    }

    fn device_title(&self, doc: &RawDocument) -> String {
        let document = Html::parse_document(&doc.body);

        document
            .select(&self.device_title)
            .next()
            .map(|element| element_text(&element))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }
}

/// Collects an element's text with whitespace runs collapsed
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The last page's forward control links to itself (`#`), has no title,
/// and shows a bare arrow
fn is_end_of_pagination(element: &ElementRef<'_>) -> bool {
    element.value().attr("href") == Some("#")
        && element.value().attr("title").is_none()
        && element_text(element) == END_OF_PAGINATION_TEXT
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
