//! In-memory [`Fetcher`] used by unit tests

use crate::crawler::fetcher::{Fetcher, RawDocument};
use crate::FetchError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// One recorded request
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub url: String,
    pub identity: String,
    pub timeout: Duration,
    pub at: tokio::time::Instant,
}

/// Serves canned pages; unknown URLs answer 404
#[derive(Default)]
pub(crate) struct FakeFetcher {
    pages: HashMap<String, String>,
    always_fail: HashSet<String>,
    fail_budget: Mutex<HashMap<String, u32>>,
    panics: HashSet<String>,
    latency: Option<Duration>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    /// Every request for `url` fails with HTTP 503
    pub fn fail_always(mut self, url: &str) -> Self {
        self.always_fail.insert(url.to_string());
        self
    }

    /// The first `times` requests for `url` time out
    pub fn fail_times(self, url: &str, times: u32) -> Self {
        self.fail_budget
            .lock()
            .unwrap()
            .insert(url.to_string(), times);
        self
    }

    /// Requests for `url` panic inside the fetcher
    pub fn panic_on(mut self, url: &str) -> Self {
        self.panics.insert(url.to_string());
        self
    }

    /// Every request sleeps this long before answering
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, url: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.url == url).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn respond(&self, url: &str) -> Result<RawDocument, FetchError> {
        if self.panics.contains(url) {
            panic!("fetcher panic for {}", url);
        }

        if self.always_fail.contains(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
            });
        }

        {
            let mut budget = self.fail_budget.lock().unwrap();
            if let Some(remaining) = budget.get_mut(url) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(FetchError::Timeout {
                        url: url.to_string(),
                    });
                }
            }
        }

        match self.pages.get(url) {
            Some(body) => Ok(RawDocument::new(url, body.clone())),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn get(
        &self,
        url: &str,
        identity: &str,
        timeout: Duration,
    ) -> Result<RawDocument, FetchError> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            identity: identity.to_string(),
            timeout,
            at: tokio::time::Instant::now(),
        });

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.respond(url)
    }
}

/// Listing page in the default selector layout
pub(crate) fn listing_page(devices: &[(&str, &str)], next: Option<&str>) -> String {
    let links: String = devices
        .iter()
        .map(|(model, href)| format!(r#"<p><a href="{}">{}</a></p>"#, href, model))
        .collect();
    let pager = match next {
        Some(href) => format!(r#"<a href="{}" title="Next page">►</a>"#, href),
        None => r##"<a href="#">►</a>"##.to_string(),
    };
    format!(
        r#"<html><body><div id="vendor-browser-container"><div>{}</div></div><div class="nav-pages">{}</div></body></html>"#,
        links, pager
    )
}

/// Catalog page in the default selector layout
pub(crate) fn catalog_page(brands: &[(&str, &str)]) -> String {
    let links: String = brands
        .iter()
        .map(|(name, href)| format!(r#"<li><a href="{}">{}</a></li>"#, href, name))
        .collect();
    format!(
        r#"<html><body><div class="manufacturer-group"><ul>{}</ul></div></body></html>"#,
        links
    )
}

/// Detail page in the default selector layout
pub(crate) fn detail_page(title: &str) -> String {
    format!(
        r#"<html><body><div id="product-data"><h1 class="device-title">{}</h1></div></body></html>"#,
        title
    )
}
