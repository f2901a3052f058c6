//! Time-bounded price resolution with static and placeholder fallbacks.
//!
//! Resolution order: live backend price within the timeout, then the static
//! override table by exact product title, then the "Contact for price"
//! placeholder. Every path yields a [`SafePrice`]; nothing here returns an
//! error or panics on bad backend data.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use storefront_core::{NormalizedPrice, PriceOverrideTable, SafePrice, DEFAULT_CURRENCY_CODE};
use tokio::task::JoinError;

use crate::error::LivePriceError;
use crate::product::product_price;
use crate::types::{StoreProduct, StoreRegion};

/// Budget for a live price attempt when none is configured.
pub const DEFAULT_PRICE_TIMEOUT: Duration = Duration::from_millis(3000);

const REGION_NOT_AVAILABLE: &str = "Region not available";
const NO_REGION_NO_OVERRIDE: &str = "No region and no hardcoded price";

/// Resolves a displayable price for a product, bounded in time.
#[derive(Debug, Clone)]
pub struct SafePriceResolver {
    overrides: Arc<PriceOverrideTable>,
    timeout: Duration,
}

impl SafePriceResolver {
    #[must_use]
    pub fn new(overrides: PriceOverrideTable) -> Self {
        Self {
            overrides: Arc::new(overrides),
            timeout: DEFAULT_PRICE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn overrides(&self) -> &PriceOverrideTable {
        &self.overrides
    }

    /// Prices the product's cheapest variant for `region`.
    pub async fn resolve(&self, product: &StoreProduct, region: Option<&StoreRegion>) -> SafePrice {
        self.resolve_within(product, None, region, self.timeout)
            .await
    }

    /// Prices `product` within `budget`, preferring the variant whose id or
    /// SKU is `variant_id` and otherwise the cheapest variant.
    ///
    /// Normalization runs on a blocking task, so a normalizer that hangs
    /// cannot hold the caller past `budget` and one that panics becomes a
    /// fallback result.
    pub async fn resolve_within(
        &self,
        product: &StoreProduct,
        variant_id: Option<&str>,
        region: Option<&StoreRegion>,
        budget: Duration,
    ) -> SafePrice {
        let owned = product.clone();
        let variant_id = variant_id.map(str::to_owned);
        let currency = region.and_then(StoreRegion::currency).map(str::to_owned);

        let live = run_blocking(move || {
            product_price(&owned, variant_id.as_deref(), currency.as_deref())?
                .into_display()
                .ok_or(LivePriceError::NoPrice)
        });

        self.resolve_with(product.title.as_deref(), region, budget, live)
            .await
    }

    /// Races `live` against `budget` and falls back when it loses or yields
    /// nothing usable.
    ///
    /// When `region` is missing or invalid, `live` is dropped without being
    /// polled.
    pub async fn resolve_with<F>(
        &self,
        title: Option<&str>,
        region: Option<&StoreRegion>,
        budget: Duration,
        live: F,
    ) -> SafePrice
    where
        F: Future<Output = Result<NormalizedPrice, LivePriceError>>,
    {
        let Some(region) = region.filter(|r| r.is_valid()) else {
            return self.region_unavailable(title);
        };
        let currency = region.currency().unwrap_or(DEFAULT_CURRENCY_CODE);

        let failure = match tokio::time::timeout(budget, live).await {
            Ok(Ok(price)) if price.calculated_amount > 0.0 => {
                let original = price.is_sale().then_some(price.original_amount);
                return SafePrice::live(price.calculated_amount, original, currency);
            }
            Ok(Ok(_)) => LivePriceError::NoPrice,
            Ok(Err(err)) => err,
            Err(_) => LivePriceError::Timeout,
        };

        tracing::warn!(
            product = title.unwrap_or(""),
            region_id = %region.id,
            error = %failure,
            "live price unavailable, falling back"
        );
        self.fallback(title, currency, failure.to_string())
    }

    /// Static override for `title`, else the placeholder in `currency`.
    #[must_use]
    pub fn fallback(&self, title: Option<&str>, currency: &str, error: String) -> SafePrice {
        match title.and_then(|t| self.overrides.get(t)) {
            Some(entry) => SafePrice::from_override(entry, error),
            None => SafePrice::placeholder(currency, error),
        }
    }

    /// Static override for `title`, else the placeholder, for a lookup that
    /// has no usable region.
    #[must_use]
    pub fn region_unavailable(&self, title: Option<&str>) -> SafePrice {
        tracing::warn!(
            product = title.unwrap_or(""),
            "region missing or invalid, skipping live price"
        );
        match title.and_then(|t| self.overrides.get(t)) {
            Some(entry) => SafePrice::from_override(entry, REGION_NOT_AVAILABLE),
            None => SafePrice::placeholder(DEFAULT_CURRENCY_CODE, NO_REGION_NO_OVERRIDE),
        }
    }
}

/// Runs a price computation on tokio's blocking pool.
///
/// A panic inside `compute` is reported as [`LivePriceError::TaskFailed`].
/// If the returned future is dropped the computation still runs to
/// completion and its result is discarded.
pub async fn run_blocking<F>(compute: F) -> Result<NormalizedPrice, LivePriceError>
where
    F: FnOnce() -> Result<NormalizedPrice, LivePriceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(compute).await {
        Ok(result) => result,
        Err(err) => Err(LivePriceError::TaskFailed(join_error_message(err))),
    }
}

fn join_error_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic with non-string payload".to_owned())
}
