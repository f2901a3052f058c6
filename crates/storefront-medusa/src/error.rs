use thiserror::Error;

#[derive(Debug, Error)]
pub enum MedusaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by backend (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("invalid backend URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Errors from pricing a whole product.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("no product provided: product has no id")]
    MissingId,
}

/// Why a live price attempt produced nothing usable.
#[derive(Debug, Error)]
pub enum LivePriceError {
    #[error("No valid calculated price from Medusa")]
    NoPrice,

    #[error("Price loading timeout")]
    Timeout,

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Backend(#[from] MedusaError),

    #[error("price computation failed: {0}")]
    TaskFailed(String),
}
