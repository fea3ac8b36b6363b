//! Pagination traversal of a brand's device listing

use crate::crawler::parser::Extractor;
use crate::crawler::retry::RetryExecutor;
use crate::state::{Brand, DeviceReference};
use crate::SweepError;
use std::collections::HashSet;

/// Walks a brand's listing pages into a flat list of device references
pub struct DeviceEnumerator<'a> {
    executor: &'a RetryExecutor,
    extractor: &'a dyn Extractor,
    max_pages: usize,
}

impl<'a> DeviceEnumerator<'a> {
    /// # Arguments
    ///
    /// * `max_pages` - Ceiling on listing pages fetched per brand
    pub fn new(executor: &'a RetryExecutor, extractor: &'a dyn Extractor, max_pages: usize) -> Self {
        Self {
            executor,
            extractor,
            max_pages: max_pages.max(1),
        }
    }

    /// Collects device references from every page of the brand's listing
    ///
    /// The chain ends when a page has no next pointer, when the pointer is
    /// the end-of-pagination marker, when it points back to a page already
    /// visited, or when `max_pages` pages have been read. A page that fails
    /// after retries ends the chain with what has been gathered so far.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<DeviceReference>)` - References in page order
    /// * `Err(SweepError::Listing)` - The first listing page was unreachable
    pub async fn enumerate(&self, brand: &Brand) -> Result<Vec<DeviceReference>, SweepError> {
        let mut references = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(brand.listing_url.clone());
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            if pages >= self.max_pages {
                tracing::warn!(
                    "Stopping {} at the {}-page ceiling; listing may be incomplete",
                    brand.name,
                    self.max_pages
                );
                break;
            }

            if !visited.insert(url.clone()) {
                tracing::warn!("Pagination for {} loops back to {}", brand.name, url);
                break;
            }

            let doc = match self.executor.execute(&url).await {
                Ok(doc) => doc,
                Err(failure) if pages == 0 => {
                    return Err(SweepError::Listing {
                        brand: brand.name.clone(),
                        source: failure,
                    });
                }
                Err(failure) => {
                    tracing::warn!(
                        "Listing for {} cut short after {} page(s): {}",
                        brand.name,
                        pages,
                        failure
                    );
                    break;
                }
            };
            pages += 1;

            let found = self.extractor.device_links(&doc);
            tracing::debug!("{} page {}: {} device(s)", brand.name, pages, found.len());
            references.extend(
                found
                    .into_iter()
                    .map(|(model, detail_url)| DeviceReference::new(model, detail_url, brand)),
            );

            next = self.extractor.next_page_link(&doc);
        }

        Ok(references)
    }
}
