//! Multi-page product fetch loop for `MedusaClient`.

use crate::error::MedusaError;
use crate::types::StoreProduct;

use super::MedusaClient;
use super::MAX_PAGES;

impl MedusaClient {
    /// Fetches every product by walking `offset` in steps of `limit`.
    ///
    /// Stops when the backend's reported `count` is reached, or when a page
    /// comes back shorter than `limit` (including empty).
    ///
    /// **All-or-nothing semantics**: on any page failure the products from
    /// earlier pages are discarded and the error is returned.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::list_products`].
    /// Returns [`MedusaError::PaginationLimit`] if the number of pages exceeds
    /// [`MAX_PAGES`].
    pub async fn fetch_all_products(
        &self,
        region_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<StoreProduct>, MedusaError> {
        let limit = limit.max(1);
        let mut all_products: Vec<StoreProduct> = Vec::new();
        let mut offset = 0u64;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(MedusaError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            let page = self.list_products(region_id, limit, offset).await?;
            let fetched = page.products.len();
            all_products.extend(page.products);
            offset += fetched as u64;

            let reached_count = page.count.is_some_and(|count| offset >= count);
            if fetched < limit as usize || reached_count {
                break;
            }
        }

        tracing::debug!(
            products = all_products.len(),
            pages = page_count,
            "fetched product catalog"
        );
        Ok(all_products)
    }
}
