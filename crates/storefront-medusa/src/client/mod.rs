//! HTTP client for the commerce backend's store API.

mod fetch_all;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::MedusaError;
use crate::types::{ProductListResponse, RegionListResponse, StoreProduct, StoreRegion};

/// Maximum number of product pages to fetch before returning an error.
/// Prevents infinite loops on backends that ignore `offset`.
pub(super) const MAX_PAGES: usize = 200;

/// Header carrying the storefront's publishable API key.
pub const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

/// Variant fields requested alongside products so pricing and stock arrive
/// in one call.
const PRODUCT_FIELDS: &str = "*variants.calculated_price,+variants.inventory_quantity";

/// HTTP client for the backend's `/store/*` endpoints.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors. Requests are made once; callers decide whether a failure
/// is worth retrying.
#[derive(Debug, Clone)]
pub struct MedusaClient {
    pub(super) client: Client,
    base_url: Url,
    publishable_key: Option<String>,
}

impl MedusaClient {
    /// Creates a `MedusaClient` with configured timeout and `User-Agent`.
    ///
    /// A trailing slash on `base_url` is ignored. A blank `publishable_key`
    /// is treated as absent.
    ///
    /// # Errors
    ///
    /// - [`MedusaError::InvalidBaseUrl`] if `base_url` is not an absolute
    ///   http(s) URL.
    /// - [`MedusaError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed (e.g., invalid TLS config).
    pub fn new(
        base_url: &str,
        publishable_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, MedusaError> {
        let base_url = Self::parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url,
            publishable_key: publishable_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
        })
    }

    /// The normalized backend base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Lists every region the storefront can sell into.
    ///
    /// # Errors
    ///
    /// Any [`MedusaError`] from the request or response body.
    pub async fn list_regions(&self) -> Result<Vec<StoreRegion>, MedusaError> {
        let url = self.endpoint("/store/regions");
        let response: RegionListResponse = self.get_json(url, "region list").await?;
        Ok(response.regions)
    }

    /// Lists only the regions whose ids are in `ids`.
    ///
    /// # Errors
    ///
    /// Any [`MedusaError`] from the request or response body.
    pub async fn list_regions_by_id(&self, ids: &[&str]) -> Result<Vec<StoreRegion>, MedusaError> {
        let mut url = self.endpoint("/store/regions");
        {
            let mut query = url.query_pairs_mut();
            for id in ids {
                query.append_pair("id[]", id);
            }
        }
        let response: RegionListResponse = self.get_json(url, "region list by id").await?;
        Ok(response.regions)
    }

    /// Fetches one page of products, priced for `region_id` when given.
    ///
    /// # Errors
    ///
    /// Any [`MedusaError`] from the request or response body.
    pub async fn list_products(
        &self,
        region_id: Option<&str>,
        limit: u32,
        offset: u64,
    ) -> Result<ProductListResponse, MedusaError> {
        let url = self.products_url(region_id, None, limit, offset);
        self.get_json(url, &format!("products page at offset {offset}"))
            .await
    }

    /// Fetches the product with `handle`, or `None` if no product has it.
    ///
    /// # Errors
    ///
    /// Any [`MedusaError`] from the request or response body.
    pub async fn get_product_by_handle(
        &self,
        handle: &str,
        region_id: Option<&str>,
    ) -> Result<Option<StoreProduct>, MedusaError> {
        let url = self.products_url(region_id, Some(handle), 1, 0);
        let response: ProductListResponse = self
            .get_json(url, &format!("product with handle \"{handle}\""))
            .await?;
        Ok(response.products.into_iter().next())
    }

    /// Returns `true` when `GET /health` answers with a 2xx status.
    ///
    /// # Errors
    ///
    /// Returns [`MedusaError::Http`] if the backend cannot be reached at all.
    pub async fn health(&self) -> Result<bool, MedusaError> {
        let url = self.endpoint("/health");
        let response = self.client.get(url).send().await?;
        Ok(response.status().is_success())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, MedusaError> {
        let mut request = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(key) = &self.publishable_key {
            request = request.header(PUBLISHABLE_KEY_HEADER, key);
        }

        tracing::debug!(url = %url, "store API request");
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(MedusaError::RateLimited { retry_after_secs });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MedusaError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(MedusaError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| MedusaError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{path}", url.path().trim_end_matches('/'));
        url.set_path(&joined);
        url
    }

    fn products_url(
        &self,
        region_id: Option<&str>,
        handle: Option<&str>,
        limit: u32,
        offset: u64,
    ) -> Url {
        let mut url = self.endpoint("/store/products");
        {
            let mut query = url.query_pairs_mut();
            if let Some(handle) = handle {
                query.append_pair("handle", handle);
            }
            if let Some(region_id) = region_id {
                query.append_pair("region_id", region_id);
            }
            query
                .append_pair("fields", PRODUCT_FIELDS)
                .append_pair("limit", &limit.to_string())
                .append_pair("offset", &offset.to_string());
        }
        url
    }

    /// Parses and normalizes the backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`MedusaError::InvalidBaseUrl`] if the URL does not parse, is
    /// not http(s), or carries a query string.
    fn parse_base_url(base_url: &str) -> Result<Url, MedusaError> {
        let invalid = |reason: String| MedusaError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let trimmed = base_url.trim().trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
        }
        if url.query().is_some() {
            return Err(invalid("query strings are not allowed".to_owned()));
        }
        Ok(url)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
