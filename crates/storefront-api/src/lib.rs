//! HTTP client for the storefront catalog API.
//!
//! Speaks the backend's `{success, message, data}` envelope, normalizes both
//! listing response shapes into [`storefront_core::ResultPage`] at the
//! boundary, and exposes the [`ProductSource`] seam the browse orchestrator
//! is written against.

pub mod client;
pub mod envelope;
pub mod error;
pub mod source;

pub use client::CatalogClient;
pub use error::ApiError;
pub use source::ProductSource;
