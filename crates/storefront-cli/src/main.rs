mod catalog;
mod lookup;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use storefront_core::{load_price_overrides, AppConfig, PriceOverrideTable};
use storefront_medusa::PriceService;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Storefront pricing command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the backend's regions
    Regions,
    /// Resolve a country code to a region
    Region {
        /// ISO 3166-1 alpha-2 code, any case
        country: String,
    },
    /// Resolve the display price of one product
    Price {
        /// Product handle
        handle: String,
        /// Country to price for (defaults to `STOREFRONT_DEFAULT_COUNTRY`)
        #[arg(long)]
        country: Option<String>,
        /// Variant id or SKU to price instead of the cheapest variant
        #[arg(long)]
        variant: Option<String>,
        /// Product title to match against the override table if the backend fails
        #[arg(long)]
        title: Option<String>,
    },
    /// Print display prices for every product in the catalog
    Catalog {
        #[arg(long)]
        country: Option<String>,
        #[arg(long, default_value_t = 50)]
        page_size: u32,
        #[arg(long, default_value_t = 8)]
        concurrency: usize,
    },
    /// Check backend connectivity, regions, and catalog
    Check,
}

/// Arguments are parsed before configuration is loaded, so `--help` and
/// usage errors work without a backend configured.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = storefront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let service = PriceService::from_config(&config, load_overrides(&config)?)
        .map_err(|e| anyhow::anyhow!("failed to build backend client: {e}"))?;

    match cli.command {
        Commands::Regions => lookup::run_regions(&service).await?,
        Commands::Region { country } => lookup::run_region(&service, &country).await?,
        Commands::Price {
            handle,
            country,
            variant,
            title,
        } => {
            let country = country.unwrap_or_else(|| config.default_country.clone());
            lookup::run_price(
                &service,
                &country,
                &handle,
                variant.as_deref(),
                title.as_deref(),
            )
            .await?;
        }
        Commands::Catalog {
            country,
            page_size,
            concurrency,
        } => {
            let country = country.unwrap_or_else(|| config.default_country.clone());
            catalog::run_catalog(&service, &country, page_size, concurrency).await?;
        }
        Commands::Check => lookup::run_check(&service).await?,
    }

    Ok(())
}

/// The configured override file, or the built-in table when none is set.
fn load_overrides(config: &AppConfig) -> anyhow::Result<PriceOverrideTable> {
    match &config.price_overrides_path {
        Some(path) => {
            let table = load_price_overrides(path)?;
            tracing::info!(path = %path.display(), entries = table.len(), "loaded price overrides");
            Ok(table)
        }
        None => Ok(PriceOverrideTable::builtin()),
    }
}
