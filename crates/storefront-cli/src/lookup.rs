//! Single-shot lookup commands: regions, one region, one price, health.

use storefront_medusa::{PriceService, StoreRegion};

/// Print every region with its currency and countries.
///
/// # Errors
///
/// Returns an error if the region list cannot be fetched.
pub(crate) async fn run_regions(service: &PriceService) -> anyhow::Result<()> {
    let regions = service.regions().list_regions().await?;

    if regions.is_empty() {
        println!("backend has no regions");
        return Ok(());
    }

    println!("{:<32}{:<24}{:<10}COUNTRIES", "ID", "NAME", "CURRENCY");
    for region in regions.iter() {
        println!("{}", region_line(region));
    }
    Ok(())
}

/// Print the region a country resolves to.
///
/// # Errors
///
/// Returns an error if no region can be resolved at all.
pub(crate) async fn run_region(service: &PriceService, country: &str) -> anyhow::Result<()> {
    let region = service
        .regions()
        .get_region(country)
        .await
        .ok_or_else(|| anyhow::anyhow!("no region available for country '{country}'"))?;
    println!("{}", region_line(&region));
    Ok(())
}

/// Print the safe price for one product as JSON.
///
/// # Errors
///
/// Returns an error if the backend has no product with `handle`.
pub(crate) async fn run_price(
    service: &PriceService,
    country: &str,
    handle: &str,
    variant: Option<&str>,
    title: Option<&str>,
) -> anyhow::Result<()> {
    let price = service
        .price_for_handle(country, handle, variant, title)
        .await
        .ok_or_else(|| anyhow::anyhow!("product '{handle}' not found"))?;
    println!("{}", serde_json::to_string_pretty(&price)?);
    Ok(())
}

/// Report backend health, region count, and whether any products exist.
///
/// # Errors
///
/// Returns an error if the backend is unhealthy or unreachable.
pub(crate) async fn run_check(service: &PriceService) -> anyhow::Result<()> {
    let client = service.client();
    println!("backend: {}", client.base_url());

    if !client.health().await? {
        anyhow::bail!("backend health check failed");
    }
    println!("health: ok");

    match service.regions().list_regions().await {
        Ok(regions) => println!("regions: {}", regions.len()),
        Err(e) => println!("regions: error ({e})"),
    }

    match client.list_products(None, 1, 0).await {
        Ok(page) => {
            let total = page.count.unwrap_or(page.products.len() as u64);
            println!("products: {}", if total > 0 { "present" } else { "none" });
        }
        Err(e) => println!("products: error ({e})"),
    }
    Ok(())
}

pub(crate) fn region_line(region: &StoreRegion) -> String {
    let countries: Vec<String> = region.country_codes().collect();
    format!(
        "{:<32}{:<24}{:<10}{}",
        region.id,
        region.name.as_deref().unwrap_or("-"),
        region.currency().unwrap_or("-").to_ascii_uppercase(),
        countries.join(",")
    )
}
