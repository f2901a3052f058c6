//! Store API client and price resolution for the storefront.
//!
//! The pipeline runs raw variant pricing through [`normalize_variant`],
//! picks per-product prices with [`product_price`], and wraps the whole
//! thing in [`SafePriceResolver`] so callers always get something to show.

pub mod client;
pub mod error;
pub mod normalize;
pub mod product;
pub mod region;
pub mod resolver;
pub mod service;
mod shape;
pub mod types;

pub use client::{MedusaClient, PUBLISHABLE_KEY_HEADER};
pub use error::{LivePriceError, MedusaError, ProductError};
pub use normalize::normalize_variant;
pub use product::{product_price, ProductPrice};
pub use region::{RegionResolver, RegionSource};
pub use resolver::{run_blocking, SafePriceResolver, DEFAULT_PRICE_TIMEOUT};
pub use service::PriceService;
pub use types::{
    ProductListResponse, RegionListResponse, StoreCountry, StoreProduct, StoreRegion,
    StoreVariant,
};
