//! Wire types for the backend's response envelope.
//!
//! Every endpoint answers `{ "success": bool, "message": string?, "data": ?,
//! "errors": ? }`. The listing endpoint's `data` comes in two shapes: a bare
//! product array (older deployments) or an object with `products`,
//! `pagination`, `filters_applied` and `available_filters`. [`ListingData`]
//! decodes either and [`ListingData::into_result_page`] normalizes it so
//! nothing past this module looks at the wire shape again.
//!
//! ## Example
//!
//! ```text
//! {
//!   "success": true,
//!   "message": "Products retrieved",
//!   "data": {
//!     "products": [{ "id": 1, "name": "Linen Shirt", "price": "39.90" }],
//!     "pagination": { "current_page": 1, "total_pages": 4, "total_count": 71, "per_page": 20 },
//!     "filters_applied": { "category_slug": "shirts" },
//!     "available_filters": { "categories": [], "brands": [], "price_range": { "min": 5, "max": 240 } }
//!   }
//! }
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use storefront_core::{FacetMetadata, Pagination, ProductSummary, ResultPage};

/// Generic response envelope. `data` is kept as raw JSON until the status
/// has been checked.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "flatten_errors")]
    pub errors: Vec<String>,
}

/// Envelopes without a `success` flag are treated as successful.
fn default_success() -> bool {
    true
}

/// Flattens `errors` given as a list of strings or as a map of field name to
/// message list.
fn flatten_errors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    fn collect(value: Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => out.push(s),
            Value::Array(items) => items.into_iter().for_each(|v| collect(v, out)),
            Value::Object(fields) => fields.into_iter().for_each(|(_, v)| collect(v, out)),
            _ => {}
        }
    }

    let mut out = Vec::new();
    if let Some(value) = Option::<Value>::deserialize(deserializer)? {
        collect(value, &mut out);
    }
    Ok(out)
}

/// `data` payload of the listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListingData {
    Legacy(Vec<ProductSummary>),
    Paged(PagedListing),
}

#[derive(Debug, Deserialize)]
pub struct PagedListing {
    pub products: Vec<ProductSummary>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub filters_applied: Option<Value>,
    #[serde(default)]
    pub available_filters: Option<FacetMetadata>,
}

impl ListingData {
    /// Normalizes either wire shape into a [`ResultPage`].
    ///
    /// Pagination is clamped so `current_page <= total_pages`, and repeated
    /// product ids within the page are dropped (first occurrence wins).
    #[must_use]
    pub fn into_result_page(self) -> ResultPage {
        let (products, pagination, facets) = match self {
            Self::Legacy(products) => (products, None, None),
            Self::Paged(paged) => {
                if let Some(applied) = &paged.filters_applied {
                    tracing::debug!(filters_applied = %applied, "listing filters applied by server");
                }
                (
                    paged.products,
                    paged.pagination.map(Pagination::normalized),
                    paged.available_filters,
                )
            }
        };

        let mut seen = std::collections::HashSet::with_capacity(products.len());
        let products = products.into_iter().filter(|p| seen.insert(p.id)).collect();

        ResultPage {
            products,
            pagination,
            facets,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn listing(value: Value) -> ResultPage {
        serde_json::from_value::<ListingData>(value)
            .expect("listing should decode")
            .into_result_page()
    }

    #[test]
    fn legacy_array_has_no_pagination() {
        let page = listing(json!([
            { "id": 1, "name": "A", "price": 10 },
            { "id": 2, "name": "B", "price": 12 }
        ]));
        assert_eq!(page.products.len(), 2);
        assert!(page.pagination.is_none());
        assert!(page.facets.is_none());
    }

    #[test]
    fn paged_object_carries_pagination_and_facets() {
        let page = listing(json!({
            "products": [{ "id": 1, "name": "A", "price": "10.00" }],
            "pagination": { "current_page": 1, "total_pages": 3, "total_count": 41, "per_page": 20 },
            "filters_applied": { "query": "a" },
            "available_filters": {
                "brands": [{ "id": 4, "name": "Acme", "slug": "acme", "count": 9 }],
                "price_range": { "min": 5, "max": 99 }
            }
        }));
        let pagination = page.pagination.unwrap();
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.total_count, 41);
        let facets = page.facets.unwrap();
        assert_eq!(facets.brands[0].name, "Acme");
        assert!(facets.categories.is_empty());
        assert!(facets.price_range.is_some());
    }

    #[test]
    fn paged_object_clamps_current_page() {
        let page = listing(json!({
            "products": [],
            "pagination": { "current_page": 6, "total_pages": 2, "total_count": 30, "per_page": 20 }
        }));
        assert_eq!(page.pagination.unwrap().current_page, 2);
    }

    #[test]
    fn duplicate_ids_within_a_page_are_dropped() {
        let page = listing(json!([
            { "id": 1, "name": "A", "price": 10 },
            { "id": 1, "name": "A again", "price": 10 }
        ]));
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].name, "A");
    }

    #[test]
    fn envelope_flattens_field_errors() {
        let env: Envelope = serde_json::from_value(json!({
            "success": false,
            "message": "The given data was invalid.",
            "errors": { "max_price": ["Max price must be positive."], "page": ["Bad page."] }
        }))
        .unwrap();
        assert!(!env.success);
        assert_eq!(
            env.errors,
            vec!["Max price must be positive.", "Bad page."]
        );
    }

    #[test]
    fn envelope_without_success_flag_is_successful() {
        let env: Envelope = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert!(env.success);
        assert!(env.errors.is_empty());
    }
}
