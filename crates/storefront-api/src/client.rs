//! HTTP client for the storefront catalog REST API.
//!
//! Wraps `reqwest` with envelope handling and typed decoding. Every endpoint
//! checks the envelope's `success` flag first and surfaces backend
//! rejections as [`ApiError::Rejected`], whatever the HTTP status.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use storefront_core::{AppConfig, Brand, Category, FilterCriteria, ResultPage};

use crate::envelope::{Envelope, ListingData};
use crate::error::ApiError;
use crate::source::ProductSource;

/// Client for the catalog API.
///
/// Use [`CatalogClient::new`] with the loaded [`AppConfig`], or
/// [`CatalogClient::with_base_url`] to point at a mock server in tests.
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl CatalogClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if the configured URL
    /// does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.api_token.as_deref(),
        )
    }

    /// Creates a client with an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        api_token: Option<&str>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends to the API prefix
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            api_token: api_token.map(str::to_owned),
        })
    }

    /// Fetches one page of the product listing for `criteria`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Rejected`] if the backend answers `"success": false`.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx status without envelope.
    /// - [`ApiError::Deserialize`] if `data` matches neither listing shape.
    pub async fn search_products(&self, criteria: &FilterCriteria) -> Result<ResultPage, ApiError> {
        let url = self.build_url("products", &criteria.query_pairs())?;
        tracing::debug!(%url, page = criteria.page, "fetching product listing");

        let listing: ListingData = self
            .request_data(&url, &format!("products(page={})", criteria.page))
            .await?;
        let page = listing.into_result_page();

        tracing::debug!(
            products = page.products.len(),
            paginated = page.pagination.is_some(),
            "product listing received"
        );
        Ok(page)
    }

    /// Lists the catalog's categories.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::search_products`].
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.build_url("categories", &[])?;
        self.request_data(&url, "categories").await
    }

    /// Lists the catalog's brands.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::search_products`].
    pub async fn list_brands(&self) -> Result<Vec<Brand>, ApiError> {
        let url = self.build_url("brands", &[])?;
        self.request_data(&url, "brands").await
    }

    /// Joins `path` onto the base URL and appends percent-encoded query pairs.
    fn build_url(&self, path: &str, pairs: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })?;
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (k, v) in pairs {
                query.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request, checks the envelope and decodes `data` as `T`.
    async fn request_data<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, ApiError> {
        let data = self.request_envelope(url).await?;
        serde_json::from_value(data).map_err(|e| ApiError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Sends a GET request and returns the envelope's `data` once the
    /// envelope reports success.
    async fn request_envelope(&self, url: &Url) -> Result<Value, ApiError> {
        let mut request = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) if !envelope.success => {
                tracing::warn!(%url, status = status.as_u16(), message = ?envelope.message, "request rejected");
                Err(ApiError::Rejected {
                    message: envelope.message,
                    errors: envelope.errors,
                })
            }
            Ok(envelope) if status.is_success() => Ok(envelope.data.unwrap_or(Value::Null)),
            Ok(envelope) if envelope.message.is_some() || !envelope.errors.is_empty() => {
                tracing::warn!(%url, status = status.as_u16(), message = ?envelope.message, "request failed");
                Err(ApiError::Rejected {
                    message: envelope.message,
                    errors: envelope.errors,
                })
            }
            Ok(_) => Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            Err(source) if status.is_success() => Err(ApiError::Deserialize {
                context: url.to_string(),
                source,
            }),
            Err(_) => {
                tracing::warn!(%url, status = status.as_u16(), "non-envelope error response");
                Err(ApiError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                })
            }
        }
    }
}

impl ProductSource for CatalogClient {
    async fn fetch_products(&self, criteria: &FilterCriteria) -> Result<ResultPage, ApiError> {
        self.search_products(criteria).await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.list_categories().await
    }

    async fn fetch_brands(&self) -> Result<Vec<Brand>, ApiError> {
        self.list_brands().await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
