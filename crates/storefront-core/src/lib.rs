//! Domain types and pure logic for the storefront browse engine.
//!
//! Holds the typed filter criteria and the store that mutates them, the
//! product/page projections returned by the catalog backend, the client-side
//! refinement pass, and environment-driven configuration.

pub mod app_config;
pub mod config;
pub mod criteria;
pub mod filter_store;
pub mod page;
pub mod products;
pub mod refine;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use criteria::{BrandRef, CategoryRef, FilterChange, FilterCriteria, FilterKey, SortBy};
pub use filter_store::{FilterEvent, FilterStore, ListenerId};
pub use page::{Brand, Category, FacetMetadata, FacetOption, Pagination, PriceBounds, ResultPage};
pub use products::ProductSummary;
pub use refine::{refine, DisplaySort, Refinement};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
