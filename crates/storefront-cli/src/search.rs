//! `search` command: drives a [`Browser`] session from command-line flags.
//!
//! Server-side flags become filter changes on the session, which triggers the
//! debounced first-page fetch; `--pages` then loads further pages the way an
//! infinite-scroll view would. Client-side flags only shape what is printed.

use clap::Args;
use rust_decimal::Decimal;
use storefront_api::CatalogClient;
use storefront_browse::{BrowseSettings, Browser, FetchOutcome, ResultSnapshot, TracingNotifier};
use storefront_core::{
    AppConfig, BrandRef, CategoryRef, DisplaySort, FilterChange, ProductSummary, Refinement,
    SortBy,
};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text search query
    #[arg(long)]
    pub query: Option<String>,
    /// Category id or slug
    #[arg(long)]
    pub category: Option<String>,
    /// Brand id or slug
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub min_price: Option<Decimal>,
    #[arg(long)]
    pub max_price: Option<Decimal>,
    /// Minimum average rating (0-5)
    #[arg(long)]
    pub min_rating: Option<f64>,
    /// Only products currently in stock
    #[arg(long)]
    pub in_stock: bool,
    /// Only featured products
    #[arg(long)]
    pub featured: bool,
    /// Server-side ordering (e.g. `price_asc`, `newest`, `rating`)
    #[arg(long)]
    pub sort: Option<SortBy>,
    /// Number of pages to load
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,
    /// Keep only products made of this fabric (repeatable)
    #[arg(long = "fabric")]
    pub fabrics: Vec<String>,
    /// Keep only products in this color (repeatable)
    #[arg(long = "color")]
    pub colors: Vec<String>,
    /// Keep only products in this size (repeatable)
    #[arg(long = "size")]
    pub sizes: Vec<String>,
    /// Client-side ordering: price-low, price-high, discount, newest, featured
    #[arg(long, default_value = "none")]
    pub display_sort: DisplaySort,
}

impl SearchArgs {
    /// Server-side filter changes implied by the flags.
    pub fn filter_changes(&self) -> Vec<FilterChange> {
        let mut changes = Vec::new();
        if let Some(query) = &self.query {
            changes.push(FilterChange::Query(Some(query.clone())));
        }
        if let Some(category) = &self.category {
            changes.push(FilterChange::Category(Some(CategoryRef::parse(category))));
        }
        if let Some(brand) = &self.brand {
            changes.push(FilterChange::Brand(Some(BrandRef::parse(brand))));
        }
        if let Some(min) = self.min_price {
            changes.push(FilterChange::MinPrice(Some(min)));
        }
        if let Some(max) = self.max_price {
            changes.push(FilterChange::MaxPrice(Some(max)));
        }
        if let Some(rating) = self.min_rating {
            changes.push(FilterChange::MinRating(Some(rating)));
        }
        if self.in_stock {
            changes.push(FilterChange::InStock(Some(true)));
        }
        if self.featured {
            changes.push(FilterChange::Featured(Some(true)));
        }
        if let Some(sort) = self.sort {
            changes.push(FilterChange::SortBy(sort));
        }
        changes
    }

    pub fn refinement(&self) -> Refinement {
        Refinement {
            fabrics: self.fabrics.clone(),
            colors: self.colors.clone(),
            sizes: self.sizes.clone(),
            sort: self.display_sort,
        }
    }
}

/// Run a search and print the refined result list.
///
/// # Errors
///
/// Returns an error if the first page cannot be loaded or a follow-up page
/// fails. The failure itself is also reported through the notifier.
pub(crate) async fn run_search(
    client: CatalogClient,
    config: &AppConfig,
    args: &SearchArgs,
) -> anyhow::Result<()> {
    let browser = Browser::new(client, TracingNotifier, BrowseSettings::from_config(config));

    let changes = args.filter_changes();
    tracing::debug!(filters = changes.len(), pages = args.pages, "starting search");
    browser.set_filters(changes);
    // Flags matching the defaults change nothing and schedule no fetch.
    let first = match browser.settle().await {
        Some(outcome) => outcome,
        None => browser.load_results(None).await,
    };
    if first == FetchOutcome::Failed {
        anyhow::bail!("product search failed");
    }

    for _ in 1..args.pages {
        match browser.load_more().await {
            Some(FetchOutcome::Failed) => anyhow::bail!("failed to load the next page"),
            Some(_) => {}
            None => break,
        }
    }

    let display = browser.display_list(&args.refinement());
    let shown = display.len();
    tracing::debug!(shown, "refinement applied");
    if display.is_empty() {
        println!("no products matched");
    } else {
        println!(
            "{:<8}{:<40}{:>10}{:>7}  STOCK",
            "ID", "NAME", "PRICE", "OFF"
        );
        for product in &display {
            println!("{}", format_row(product));
        }
    }
    println!("{}", footer(&browser.snapshot(), display.len()));

    Ok(())
}

fn format_row(product: &ProductSummary) -> String {
    let name: String = if product.name.chars().count() > 38 {
        product.name.chars().take(37).chain(['\u{2026}']).collect()
    } else {
        product.name.clone()
    };
    let discount = product.discount_percent().round();
    let off = if discount.is_zero() {
        String::new()
    } else {
        format!("-{discount}%")
    };
    let stock = if product.in_stock { "yes" } else { "no" };
    format!(
        "{:<8}{:<40}{:>10}{:>7}  {stock}",
        product.id,
        name,
        product.effective_price().round_dp(2).to_string(),
        off
    )
}

fn footer(snapshot: &ResultSnapshot, shown: usize) -> String {
    let loaded = snapshot.products.len();
    match snapshot.pagination {
        Some(pagination) => format!(
            "page {} of {} | {} total | {loaded} loaded, {shown} shown",
            pagination.current_page, pagination.total_pages, pagination.total_count
        ),
        None => format!(
            "{loaded} loaded, {shown} shown{}",
            if snapshot.has_more { " | more available" } else { "" }
        ),
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::Pagination;

    use super::*;

    fn product(name: &str, price: i64, discounted: Option<i64>) -> ProductSummary {
        ProductSummary {
            id: 42,
            name: name.to_owned(),
            slug: None,
            price: Decimal::from(price),
            discounted_price: discounted.map(Decimal::from),
            image: None,
            in_stock: true,
            rating: None,
            featured: false,
            fabrics: Vec::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
        }
    }

    fn snapshot(pagination: Option<Pagination>, has_more: bool) -> ResultSnapshot {
        ResultSnapshot {
            products: vec![product("a", 1, None), product("b", 1, None)],
            pagination,
            facets: None,
            has_more,
            loading: false,
        }
    }

    #[test]
    fn row_shows_effective_price_and_discount() {
        let row = format_row(&product("Linen shirt", 40, Some(30)));
        assert!(row.starts_with("42      Linen shirt"), "row: {row}");
        assert!(row.contains("30"), "row: {row}");
        assert!(row.contains("-25%"), "row: {row}");
        assert!(row.ends_with("yes"), "row: {row}");
    }

    #[test]
    fn long_names_are_truncated() {
        let row = format_row(&product(&"x".repeat(60), 10, None));
        assert!(row.contains('\u{2026}'));
        assert!(!row.contains(&"x".repeat(38)));
    }

    #[test]
    fn footer_reports_pagination_when_present() {
        let pagination = Pagination {
            current_page: 2,
            total_pages: 5,
            total_count: 97,
            per_page: 20,
        };
        assert_eq!(
            footer(&snapshot(Some(pagination), true), 1),
            "page 2 of 5 | 97 total | 2 loaded, 1 shown"
        );
    }

    #[test]
    fn footer_without_pagination_mentions_more() {
        assert_eq!(
            footer(&snapshot(None, true), 2),
            "2 loaded, 2 shown | more available"
        );
        assert_eq!(footer(&snapshot(None, false), 2), "2 loaded, 2 shown");
    }
}
