//! Country-to-region resolution with a lazily filled, in-memory cache.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use storefront_core::{DEFAULT_COUNTRY_CODE, DEFAULT_CURRENCY_CODE};
use tokio::sync::RwLock;

use crate::client::MedusaClient;
use crate::error::MedusaError;
use crate::types::StoreRegion;

/// Anything that can list the backend's regions.
pub trait RegionSource: Send + Sync {
    fn fetch_regions(&self) -> impl Future<Output = Result<Vec<StoreRegion>, MedusaError>> + Send;

    /// Regions whose ids are in `ids`.
    fn fetch_regions_by_id(
        &self,
        ids: &[&str],
    ) -> impl Future<Output = Result<Vec<StoreRegion>, MedusaError>> + Send;
}

impl RegionSource for MedusaClient {
    fn fetch_regions(&self) -> impl Future<Output = Result<Vec<StoreRegion>, MedusaError>> + Send {
        self.list_regions()
    }

    fn fetch_regions_by_id(
        &self,
        ids: &[&str],
    ) -> impl Future<Output = Result<Vec<StoreRegion>, MedusaError>> + Send {
        self.list_regions_by_id(ids)
    }
}

impl<T: RegionSource> RegionSource for Arc<T> {
    fn fetch_regions(&self) -> impl Future<Output = Result<Vec<StoreRegion>, MedusaError>> + Send {
        (**self).fetch_regions()
    }

    fn fetch_regions_by_id(
        &self,
        ids: &[&str],
    ) -> impl Future<Output = Result<Vec<StoreRegion>, MedusaError>> + Send {
        (**self).fetch_regions_by_id(ids)
    }
}

#[derive(Debug, Default)]
struct RegionCache {
    regions: Option<Arc<[StoreRegion]>>,
    by_country: HashMap<String, StoreRegion>,
}

/// Maps ISO country codes to regions, fetching the region list at most once
/// per successful load.
///
/// The cache lives as long as the resolver; construct one per process (or
/// per test) and share it by reference.
///
/// Lookups for the default country first try the configured default region
/// id, and when no region lists that country, the first region in the
/// default currency. Every other unknown country gets the first region.
#[derive(Debug)]
pub struct RegionResolver<S> {
    source: S,
    default_country: String,
    default_region_id: Option<String>,
    default_currency: String,
    state: RwLock<RegionCache>,
}

impl<S: RegionSource> RegionResolver<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            default_country: DEFAULT_COUNTRY_CODE.to_owned(),
            default_region_id: None,
            default_currency: DEFAULT_CURRENCY_CODE.to_owned(),
            state: RwLock::new(RegionCache::default()),
        }
    }

    /// Country that the default region id and currency apply to.
    #[must_use]
    pub fn with_default_country(mut self, country_code: &str) -> Self {
        self.default_country = country_code.trim().to_ascii_lowercase();
        self
    }

    /// Region tried first for the default country.
    #[must_use]
    pub fn with_default_region_id(mut self, id: Option<String>) -> Self {
        self.default_region_id = id.filter(|id| !id.trim().is_empty());
        self
    }

    /// Currency whose first region serves the default country when no region
    /// lists it.
    #[must_use]
    pub fn with_default_currency(mut self, currency: &str) -> Self {
        self.default_currency = currency.trim().to_ascii_uppercase();
        self
    }

    /// Resolves `country_code` (any case) to a region.
    ///
    /// Unknown countries get the fallback region. Returns `None` only when
    /// the backend cannot be reached or has no regions at all; a failed load
    /// is not cached, so the next call tries again.
    pub async fn get_region(&self, country_code: &str) -> Option<StoreRegion> {
        let key = country_code.trim().to_ascii_lowercase();
        let is_default_country = key == self.default_country;

        if let Some(region) = self.cached(&key).await {
            tracing::debug!(country = %key, region_id = %region.id, "region cache hit");
            return Some(region);
        }

        if is_default_country {
            if let Some(region) = self.default_region().await {
                self.state
                    .write()
                    .await
                    .by_country
                    .insert(key.clone(), region.clone());
                tracing::debug!(country = %key, region_id = %region.id, "using default region");
                return Some(region);
            }
        }

        let regions = match self.list_regions().await {
            Ok(regions) => regions,
            Err(e) => {
                tracing::error!(country = %key, error = %e, "failed to load regions");
                return None;
            }
        };

        if let Some(region) = self.cached(&key).await {
            return Some(region);
        }

        if is_default_country {
            if let Some(region) = self.first_in_default_currency(&regions) {
                tracing::debug!(
                    country = %key,
                    region_id = %region.id,
                    "using first region in default currency"
                );
                return Some(region.clone());
            }
        }

        let Some(first) = regions.first() else {
            tracing::warn!(country = %key, "backend has no regions");
            return None;
        };
        tracing::warn!(
            country = %key,
            region_id = %first.id,
            "no region for country, using first available region"
        );
        Some(first.clone())
    }

    /// Looks a region up by its backend id.
    pub async fn get_region_by_id(&self, id: &str) -> Option<StoreRegion> {
        match self.list_regions().await {
            Ok(regions) => regions.iter().find(|r| r.id == id).cloned(),
            Err(e) => {
                tracing::error!(region_id = id, error = %e, "failed to load regions");
                None
            }
        }
    }

    /// All regions, fetched on first use and reused afterwards.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the list has not been loaded yet and
    /// the fetch fails.
    pub async fn list_regions(&self) -> Result<Arc<[StoreRegion]>, MedusaError> {
        if let Some(regions) = self.state.read().await.regions.clone() {
            return Ok(regions);
        }

        // No lock is held across the fetch; concurrent loaders write the same data.
        let fetched: Arc<[StoreRegion]> = self.source.fetch_regions().await?.into();

        let mut state = self.state.write().await;
        for region in fetched.iter() {
            for code in region.country_codes() {
                state.by_country.entry(code).or_insert_with(|| region.clone());
            }
        }
        state.regions = Some(Arc::clone(&fetched));
        tracing::debug!(
            regions = fetched.len(),
            countries = state.by_country.len(),
            "region cache populated"
        );
        Ok(fetched)
    }

    async fn cached(&self, key: &str) -> Option<StoreRegion> {
        self.state.read().await.by_country.get(key).cloned()
    }

    /// The configured default region, fetched directly by id.
    async fn default_region(&self) -> Option<StoreRegion> {
        let id = self.default_region_id.as_deref()?;
        match self.source.fetch_regions_by_id(&[id]).await {
            Ok(regions) => {
                let found = regions.into_iter().find(|r| r.id == id);
                if found.is_none() {
                    tracing::warn!(region_id = id, "default region id not found");
                }
                found
            }
            Err(e) => {
                tracing::warn!(region_id = id, error = %e, "failed to fetch default region");
                None
            }
        }
    }

    fn first_in_default_currency<'a>(&self, regions: &'a [StoreRegion]) -> Option<&'a StoreRegion> {
        regions.iter().find(|r| {
            r.currency()
                .is_some_and(|c| c.eq_ignore_ascii_case(&self.default_currency))
        })
    }
}
