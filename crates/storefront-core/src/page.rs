//! Result pages, pagination metadata and catalog taxonomy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::ProductSummary;

/// Server pagination metadata for one listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    #[serde(alias = "last_page")]
    pub total_pages: u32,
    #[serde(default, alias = "total")]
    pub total_count: u64,
    pub per_page: u32,
}

impl Pagination {
    /// Clamps `current_page` into `1..=total_pages` (or to `total_pages`
    /// when the result is empty).
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            current_page: self.current_page.max(1).min(self.total_pages.max(1)),
            ..self
        }
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// One selectable value in a facet list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, alias = "products_count")]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub min: Decimal,
    pub max: Decimal,
}

/// Server-computed description of the filter values available for the
/// current result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetMetadata {
    #[serde(default)]
    pub categories: Vec<FacetOption>,
    #[serde(default)]
    pub brands: Vec<FacetOption>,
    #[serde(default)]
    pub price_range: Option<PriceBounds>,
}

/// One page of listing results in canonical form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    pub products: Vec<ProductSummary>,
    pub pagination: Option<Pagination>,
    pub facets: Option<FacetMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}
