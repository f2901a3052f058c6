//! Catalog-wide pricing.
//!
//! Fetches every product once for the resolved region and runs each through
//! the safe resolver concurrently. A product that cannot be priced live still
//! prints, with its fallback source shown.

use futures::stream::{self, StreamExt};
use storefront_medusa::PriceService;

/// Print one line per product: handle, display price, and price source.
///
/// # Errors
///
/// Returns an error if the product catalog cannot be fetched.
pub(crate) async fn run_catalog(
    service: &PriceService,
    country: &str,
    page_size: u32,
    concurrency: usize,
) -> anyhow::Result<()> {
    let region = service.pricing_region(country).await;
    let region_id = region.as_ref().map(|r| r.id.as_str());
    let products = service
        .client()
        .fetch_all_products(region_id, page_size)
        .await?;

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    let resolver = service.resolver();
    let lines: Vec<String> = stream::iter(products)
        .map(|product| {
            let region = region.as_ref();
            async move {
                let price = resolver.resolve(&product, region).await;
                format!(
                    "{:<40}{:<20}{}",
                    product.handle.as_deref().unwrap_or("-"),
                    price.formatted,
                    price.source
                )
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    println!("{:<40}{:<20}SOURCE", "HANDLE", "PRICE");
    for line in &lines {
        println!("{line}");
    }
    tracing::info!(products = lines.len(), country, "catalog priced");
    Ok(())
}
