//! Brand discovery from the catalog page

use crate::crawler::parser::Extractor;
use crate::crawler::retry::RetryExecutor;
use crate::state::{Brand, ProcessedSet};
use crate::SweepError;
use std::collections::HashSet;

/// Reads the brand catalog and filters out committed brands
pub struct BrandDiscoverer<'a> {
    executor: &'a RetryExecutor,
    extractor: &'a dyn Extractor,
    catalog_url: &'a str,
}

impl<'a> BrandDiscoverer<'a> {
    pub fn new(
        executor: &'a RetryExecutor,
        extractor: &'a dyn Extractor,
        catalog_url: &'a str,
    ) -> Self {
        Self {
            executor,
            extractor,
            catalog_url,
        }
    }

    /// Returns every brand not yet in `processed`, in catalog order
    ///
    /// A brand name appearing twice on the catalog page keeps its first link.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Brand>)` - Unprocessed brands
    /// * `Err(SweepError::Discovery)` - The catalog page could not be fetched
    pub async fn discover(&self, processed: &ProcessedSet) -> Result<Vec<Brand>, SweepError> {
        let doc = self
            .executor
            .execute(self.catalog_url)
            .await
            .map_err(SweepError::Discovery)?;

        let mut seen = HashSet::new();
        let mut brands = Vec::new();
        let mut already_done = 0usize;

        for (name, url) in self.extractor.brand_links(&doc) {
            if !seen.insert(name.clone()) {
                tracing::debug!("Ignoring duplicate brand link for {}", name);
                continue;
            }
            if processed.contains(&name) {
                already_done += 1;
                continue;
            }
            brands.push(Brand::new(name, url));
        }

        tracing::info!(
            "Catalog lists {} brand(s): {} already committed, {} remaining",
            seen.len(),
            already_done,
            brands.len()
        );

        Ok(brands)
    }
}
