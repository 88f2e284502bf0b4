//! Server-side filter criteria for the product listing endpoint.
//!
//! [`FilterCriteria`] is the typed form of the listing query string. Mutation
//! goes through [`FilterChange`] values so the pagination-reset rule can be
//! applied in one place ([`FilterCriteria::apply`]).

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Category selector. The backend accepts either the numeric id or the slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryRef {
    Id(u64),
    Slug(String),
}

/// Brand selector. The backend accepts either the numeric id or the slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrandRef {
    Id(u64),
    Slug(String),
}

impl CategoryRef {
    /// Interprets an all-digit string as an id and anything else as a slug.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.parse::<u64>()
            .map_or_else(|_| Self::Slug(raw.to_owned()), Self::Id)
    }
}

impl BrandRef {
    /// Interprets an all-digit string as an id and anything else as a slug.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.parse::<u64>()
            .map_or_else(|_| Self::Slug(raw.to_owned()), Self::Id)
    }
}

/// Sort order understood by the listing endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
    Newest,
    Rating,
    Popularity,
    NameAsc,
    NameDesc,
}

impl SortBy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Newest => "newest",
            Self::Rating => "rating",
            Self::Popularity => "popularity",
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "recommended" => Ok(Self::Recommended),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "newest" => Ok(Self::Newest),
            "rating" => Ok(Self::Rating),
            "popularity" => Ok(Self::Popularity),
            "name_asc" => Ok(Self::NameAsc),
            "name_desc" => Ok(Self::NameDesc),
            other => Err(format!("unknown sort key \"{other}\"")),
        }
    }
}

/// Names of the individual entries in [`FilterCriteria`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    MinPrice,
    MaxPrice,
    Category,
    Brand,
    Featured,
    Bestseller,
    NewArrival,
    Trending,
    InStock,
    MinRating,
    Query,
    AttributeValues,
    SortBy,
    Page,
    PerPage,
}

impl FilterKey {
    pub const ALL: [FilterKey; 15] = [
        Self::MinPrice,
        Self::MaxPrice,
        Self::Category,
        Self::Brand,
        Self::Featured,
        Self::Bestseller,
        Self::NewArrival,
        Self::Trending,
        Self::InStock,
        Self::MinRating,
        Self::Query,
        Self::AttributeValues,
        Self::SortBy,
        Self::Page,
        Self::PerPage,
    ];

    /// `true` for the cursor keys that never reset pagination and never
    /// trigger a debounced refetch.
    #[must_use]
    pub fn is_pagination(self) -> bool {
        matches!(self, Self::Page | Self::PerPage)
    }
}

/// One key together with its new value.
///
/// `None` payloads unset the entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    MinPrice(Option<Decimal>),
    MaxPrice(Option<Decimal>),
    Category(Option<CategoryRef>),
    Brand(Option<BrandRef>),
    Featured(Option<bool>),
    Bestseller(Option<bool>),
    NewArrival(Option<bool>),
    Trending(Option<bool>),
    InStock(Option<bool>),
    MinRating(Option<f64>),
    Query(Option<String>),
    AttributeValues(Vec<u64>),
    SortBy(SortBy),
    Page(u32),
    PerPage(u32),
}

impl FilterChange {
    #[must_use]
    pub fn key(&self) -> FilterKey {
        match self {
            Self::MinPrice(_) => FilterKey::MinPrice,
            Self::MaxPrice(_) => FilterKey::MaxPrice,
            Self::Category(_) => FilterKey::Category,
            Self::Brand(_) => FilterKey::Brand,
            Self::Featured(_) => FilterKey::Featured,
            Self::Bestseller(_) => FilterKey::Bestseller,
            Self::NewArrival(_) => FilterKey::NewArrival,
            Self::Trending(_) => FilterKey::Trending,
            Self::InStock(_) => FilterKey::InStock,
            Self::MinRating(_) => FilterKey::MinRating,
            Self::Query(_) => FilterKey::Query,
            Self::AttributeValues(_) => FilterKey::AttributeValues,
            Self::SortBy(_) => FilterKey::SortBy,
            Self::Page(_) => FilterKey::Page,
            Self::PerPage(_) => FilterKey::PerPage,
        }
    }
}

/// Filter and pagination state sent to the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category: Option<CategoryRef>,
    pub brand: Option<BrandRef>,
    pub featured: Option<bool>,
    pub bestseller: Option<bool>,
    pub new_arrival: Option<bool>,
    pub trending: Option<bool>,
    pub in_stock: Option<bool>,
    pub min_rating: Option<f64>,
    pub query: Option<String>,
    pub attribute_values: Vec<u64>,
    pub sort_by: SortBy,
    pub page: u32,
    pub per_page: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_price: None,
            max_price: None,
            category: None,
            brand: None,
            featured: None,
            bestseller: None,
            new_arrival: None,
            trending: None,
            in_stock: None,
            min_rating: None,
            query: None,
            attribute_values: Vec::new(),
            sort_by: SortBy::Recommended,
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl FilterCriteria {
    /// Default criteria with a custom page size.
    #[must_use]
    pub fn with_per_page(per_page: u32) -> Self {
        Self {
            per_page,
            ..Self::default()
        }
    }

    /// Writes `change` into the criteria and returns `true` if the stored
    /// value differed. No reset rule; see [`FilterCriteria::apply`].
    fn write(&mut self, change: FilterChange) -> bool {
        fn swap<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        }

        match change {
            FilterChange::MinPrice(v) => swap(&mut self.min_price, v),
            FilterChange::MaxPrice(v) => swap(&mut self.max_price, v),
            FilterChange::Category(v) => swap(&mut self.category, v),
            FilterChange::Brand(v) => swap(&mut self.brand, v),
            FilterChange::Featured(v) => swap(&mut self.featured, v),
            FilterChange::Bestseller(v) => swap(&mut self.bestseller, v),
            FilterChange::NewArrival(v) => swap(&mut self.new_arrival, v),
            FilterChange::Trending(v) => swap(&mut self.trending, v),
            FilterChange::InStock(v) => swap(&mut self.in_stock, v),
            FilterChange::MinRating(v) => swap(&mut self.min_rating, v),
            FilterChange::Query(v) => swap(&mut self.query, v),
            FilterChange::AttributeValues(v) => swap(&mut self.attribute_values, v),
            FilterChange::SortBy(v) => swap(&mut self.sort_by, v),
            FilterChange::Page(v) => swap(&mut self.page, v),
            FilterChange::PerPage(v) => swap(&mut self.per_page, v),
        }
    }

    /// Applies `change` and, for any non-pagination key, resets `page` to 1.
    ///
    /// Returns the keys whose stored value actually changed. `Page` appears
    /// in the result when the reset moved it.
    pub fn apply(&mut self, change: FilterChange) -> Vec<FilterKey> {
        let key = change.key();
        let mut changed = Vec::new();
        if self.write(change) {
            changed.push(key);
        }
        if !key.is_pagination() && self.page != DEFAULT_PAGE {
            self.page = DEFAULT_PAGE;
            changed.push(FilterKey::Page);
        }
        changed
    }

    /// Overwrites every entry with its value in `defaults` and returns the
    /// keys that differed.
    pub fn restore(&mut self, defaults: &Self) -> Vec<FilterKey> {
        FilterKey::ALL
            .into_iter()
            .filter(|key| self.write(Self::reset_change(defaults, *key)))
            .collect()
    }

    /// Returns the change that restores `key` to its value in `defaults`.
    #[must_use]
    pub fn reset_change(defaults: &Self, key: FilterKey) -> FilterChange {
        match key {
            FilterKey::MinPrice => FilterChange::MinPrice(defaults.min_price),
            FilterKey::MaxPrice => FilterChange::MaxPrice(defaults.max_price),
            FilterKey::Category => FilterChange::Category(defaults.category.clone()),
            FilterKey::Brand => FilterChange::Brand(defaults.brand.clone()),
            FilterKey::Featured => FilterChange::Featured(defaults.featured),
            FilterKey::Bestseller => FilterChange::Bestseller(defaults.bestseller),
            FilterKey::NewArrival => FilterChange::NewArrival(defaults.new_arrival),
            FilterKey::Trending => FilterChange::Trending(defaults.trending),
            FilterKey::InStock => FilterChange::InStock(defaults.in_stock),
            FilterKey::MinRating => FilterChange::MinRating(defaults.min_rating),
            FilterKey::Query => FilterChange::Query(defaults.query.clone()),
            FilterKey::AttributeValues => {
                FilterChange::AttributeValues(defaults.attribute_values.clone())
            }
            FilterKey::SortBy => FilterChange::SortBy(defaults.sort_by),
            FilterKey::Page => FilterChange::Page(defaults.page),
            FilterKey::PerPage => FilterChange::PerPage(defaults.per_page),
        }
    }

    /// Renders the criteria as listing-endpoint query parameters.
    ///
    /// Unset entries are omitted; a blank `query` is treated as unset. Values
    /// are not range-checked.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];

        if let Some(v) = self.min_price {
            pairs.push(("min_price", v.to_string()));
        }
        if let Some(v) = self.max_price {
            pairs.push(("max_price", v.to_string()));
        }
        match &self.category {
            Some(CategoryRef::Id(id)) => pairs.push(("category_id", id.to_string())),
            Some(CategoryRef::Slug(slug)) => pairs.push(("category_slug", slug.clone())),
            None => {}
        }
        match &self.brand {
            Some(BrandRef::Id(id)) => pairs.push(("brand_id", id.to_string())),
            Some(BrandRef::Slug(slug)) => pairs.push(("brand_slug", slug.clone())),
            None => {}
        }

        let flags = [
            ("featured", self.featured),
            ("bestseller", self.bestseller),
            ("new_arrival", self.new_arrival),
            ("trending", self.trending),
            ("in_stock", self.in_stock),
        ];
        for (name, flag) in flags {
            if let Some(flag) = flag {
                pairs.push((name, flag.to_string()));
            }
        }

        if let Some(v) = self.min_rating {
            pairs.push(("min_rating", v.to_string()));
        }
        if let Some(q) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            pairs.push(("query", q.to_owned()));
        }
        pairs.push(("sort_by", self.sort_by.as_str().to_owned()));
        for id in &self.attribute_values {
            pairs.push(("attribute_values[]", id.to_string()));
        }

        pairs
    }
}
