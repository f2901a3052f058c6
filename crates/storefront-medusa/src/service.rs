//! End-to-end price lookup: country and handle in, display price out.

use std::sync::Arc;
use std::time::Duration;

use storefront_core::{AppConfig, PriceOverrideTable, SafePrice};
use tokio::time::Instant;

use crate::client::MedusaClient;
use crate::error::{LivePriceError, MedusaError};
use crate::region::RegionResolver;
use crate::resolver::SafePriceResolver;
use crate::types::StoreRegion;

/// Wires the backend client, region cache, and safe resolver together.
#[derive(Debug)]
pub struct PriceService {
    client: Arc<MedusaClient>,
    regions: RegionResolver<Arc<MedusaClient>>,
    resolver: SafePriceResolver,
}

impl PriceService {
    #[must_use]
    pub fn new(
        client: Arc<MedusaClient>,
        regions: RegionResolver<Arc<MedusaClient>>,
        resolver: SafePriceResolver,
    ) -> Self {
        Self {
            client,
            regions,
            resolver,
        }
    }

    /// Builds the client, region cache, and resolver from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MedusaError`] if the backend client cannot be constructed.
    pub fn from_config(
        config: &AppConfig,
        overrides: PriceOverrideTable,
    ) -> Result<Self, MedusaError> {
        let client = Arc::new(MedusaClient::new(
            &config.backend_url,
            config.publishable_key.as_deref(),
            config.request_timeout_secs,
            &config.user_agent,
        )?);
        let regions = RegionResolver::new(Arc::clone(&client))
            .with_default_country(&config.default_country)
            .with_default_region_id(config.default_region_id.clone())
            .with_default_currency(&config.default_currency);
        let resolver = SafePriceResolver::new(overrides)
            .with_timeout(Duration::from_millis(config.price_timeout_ms));
        Ok(Self::new(client, regions, resolver))
    }

    #[must_use]
    pub fn client(&self) -> &MedusaClient {
        &self.client
    }

    #[must_use]
    pub fn regions(&self) -> &RegionResolver<Arc<MedusaClient>> {
        &self.regions
    }

    #[must_use]
    pub fn resolver(&self) -> &SafePriceResolver {
        &self.resolver
    }

    /// The region to price `country_code` in, if it is usable for pricing.
    ///
    /// Regions missing an id or a currency are discarded here so they never
    /// reach a backend query as an empty `region_id`.
    pub async fn pricing_region(&self, country_code: &str) -> Option<StoreRegion> {
        self.regions
            .get_region(country_code)
            .await
            .filter(StoreRegion::is_valid)
    }

    /// Prices the product with `handle` for buyers in `country_code`.
    ///
    /// The product fetch and the normalization share one time budget, the
    /// resolver's timeout. Returns `None` only when the backend answers that
    /// no product has `handle`. When the fetch itself fails or runs out of
    /// time, `title_hint` is used to find a static override.
    pub async fn price_for_handle(
        &self,
        country_code: &str,
        handle: &str,
        variant_id: Option<&str>,
        title_hint: Option<&str>,
    ) -> Option<SafePrice> {
        let region = self.pricing_region(country_code).await;
        let region = region.as_ref();

        let budget = self.resolver.timeout();
        let started = Instant::now();
        let fetch = self
            .client
            .get_product_by_handle(handle, region.map(|r| r.id.as_str()));

        let failure = match tokio::time::timeout(budget, fetch).await {
            Ok(Ok(Some(product))) => {
                let remaining = budget.saturating_sub(started.elapsed());
                return Some(
                    self.resolver
                        .resolve_within(&product, variant_id, region, remaining)
                        .await,
                );
            }
            Ok(Ok(None)) => {
                tracing::info!(handle, "no product with handle");
                return None;
            }
            Ok(Err(e)) => LivePriceError::Backend(e),
            Err(_) => LivePriceError::Timeout,
        };

        tracing::warn!(handle, error = %failure, "product fetch failed, falling back");
        let Some(currency) = region.and_then(StoreRegion::currency) else {
            return Some(self.resolver.region_unavailable(title_hint));
        };
        Some(self.resolver.fallback(title_hint, currency, failure.to_string()))
    }
}
