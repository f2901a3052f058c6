pub mod app_config;
pub mod config;
pub mod money;
pub mod overrides;
pub mod pricing;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use money::{currency_symbol, format_amount};
pub use overrides::{load_price_overrides, PriceOverride, PriceOverrideTable};
pub use pricing::{percentage_diff, NormalizedPrice, PriceSource, SafePrice};

use thiserror::Error;

/// Currency used when neither the payload nor the caller names one.
pub const DEFAULT_CURRENCY_CODE: &str = "NGN";

/// Country whose buyers get the default region and currency preferences.
pub const DEFAULT_COUNTRY_CODE: &str = "ng";

/// Display text for a product whose price could not be resolved from any source.
pub const CONTACT_FOR_PRICE: &str = "Contact for price";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read price overrides file {path}: {source}")]
    OverridesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse price overrides file: {0}")]
    OverridesFileParse(#[source] serde_yaml::Error),

    #[error("price overrides validation failed: {0}")]
    Validation(String),
}
