use std::future::Future;

use storefront_core::{Brand, Category, FilterCriteria, ResultPage};

use crate::error::ApiError;

/// Remote catalog the browse orchestrator queries.
///
/// [`crate::CatalogClient`] is the production implementation; tests
/// substitute scripted in-memory sources.
pub trait ProductSource: Send + Sync + 'static {
    /// Fetches one listing page for `criteria`.
    fn fetch_products(
        &self,
        criteria: &FilterCriteria,
    ) -> impl Future<Output = Result<ResultPage, ApiError>> + Send;

    fn fetch_categories(&self) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send;

    fn fetch_brands(&self) -> impl Future<Output = Result<Vec<Brand>, ApiError>> + Send;
}

impl<S: ProductSource> ProductSource for std::sync::Arc<S> {
    fn fetch_products(
        &self,
        criteria: &FilterCriteria,
    ) -> impl Future<Output = Result<ResultPage, ApiError>> + Send {
        (**self).fetch_products(criteria)
    }

    fn fetch_categories(&self) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send {
        (**self).fetch_categories()
    }

    fn fetch_brands(&self) -> impl Future<Output = Result<Vec<Brand>, ApiError>> + Send {
        (**self).fetch_brands()
    }
}
