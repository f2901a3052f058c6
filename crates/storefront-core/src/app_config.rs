use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Base URL of the commerce backend, e.g. `http://localhost:9000`.
    pub backend_url: String,
    pub publishable_key: Option<String>,
    /// Uppercase ISO 4217 code used when a payload carries no currency.
    pub default_currency: String,
    /// Region preferred when a country code matches no region.
    pub default_region_id: Option<String>,
    /// Lowercase ISO 3166-1 alpha-2 code used by the CLI when none is given.
    pub default_country: String,
    pub request_timeout_secs: u64,
    /// Upper bound on a live price attempt before falling back.
    pub price_timeout_ms: u64,
    pub user_agent: String,
    /// YAML file replacing the built-in price override table.
    pub price_overrides_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("backend_url", &self.backend_url)
            .field(
                "publishable_key",
                &self.publishable_key.as_ref().map(|_| "[redacted]"),
            )
            .field("default_currency", &self.default_currency)
            .field("default_region_id", &self.default_region_id)
            .field("default_country", &self.default_country)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("price_timeout_ms", &self.price_timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("price_overrides_path", &self.price_overrides_path)
            .finish()
    }
}
