//! Client-side refinement of an already-fetched product list.
//!
//! The listing endpoint cannot filter on garment attributes (fabric, color,
//! size), so those are applied here together with a final display sort.
//! [`refine`] is pure: it never mutates its input and applying it to its own
//! output yields the same list.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use crate::products::ProductSummary;

/// Display order applied after the attribute filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplaySort {
    PriceLow,
    PriceHigh,
    /// Discount percentage, largest first.
    Discount,
    /// Highest id first.
    Newest,
    Featured,
    #[default]
    None,
}

impl DisplaySort {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Discount => "discount",
            Self::Newest => "newest",
            Self::Featured => "featured",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DisplaySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplaySort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "discount" => Ok(Self::Discount),
            "newest" => Ok(Self::Newest),
            "featured" => Ok(Self::Featured),
            "none" | "" => Ok(Self::None),
            other => Err(format!("unknown display sort \"{other}\"")),
        }
    }
}

/// Attribute selections and display sort. Empty selections do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Refinement {
    pub fabrics: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub sort: DisplaySort,
}

impl Refinement {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.fabrics.is_empty()
            && self.colors.is_empty()
            && self.sizes.is_empty()
            && self.sort == DisplaySort::None
    }

    fn matches(&self, product: &ProductSummary) -> bool {
        any_selected(&self.fabrics, &product.fabrics)
            && any_selected(&self.colors, &product.colors)
            && any_selected(&self.sizes, &product.sizes)
    }
}

fn any_selected(selected: &[String], values: &[String]) -> bool {
    selected.is_empty()
        || selected
            .iter()
            .any(|s| values.iter().any(|v| v.trim().eq_ignore_ascii_case(s.trim())))
}

/// Filters `products` by the attribute selections, then sorts the survivors.
///
/// Sorting is stable, so products that compare equal keep their fetch order.
#[must_use]
pub fn refine(products: &[ProductSummary], refinement: &Refinement) -> Vec<ProductSummary> {
    let mut out: Vec<ProductSummary> = products
        .iter()
        .filter(|p| refinement.matches(p))
        .cloned()
        .collect();

    match refinement.sort {
        DisplaySort::PriceLow => out.sort_by_key(ProductSummary::effective_price),
        DisplaySort::PriceHigh => out.sort_by_key(|p| Reverse(p.effective_price())),
        DisplaySort::Discount => out.sort_by_key(|p| Reverse(p.discount_percent())),
        DisplaySort::Newest => out.sort_by_key(|p| Reverse(p.id)),
        DisplaySort::Featured => out.sort_by_key(|p| !p.featured),
        DisplaySort::None => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: u64, price: i64, fabric: &str) -> ProductSummary {
        ProductSummary {
            id,
            name: format!("product {id}"),
            slug: None,
            price: Decimal::from(price),
            discounted_price: None,
            image: None,
            in_stock: true,
            rating: None,
            featured: false,
            fabrics: vec![fabric.to_owned()],
            colors: Vec::new(),
            sizes: Vec::new(),
        }
    }

    fn ids(products: &[ProductSummary]) -> Vec<u64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn fabric_filter_with_price_sort_keeps_only_matches() {
        let products = vec![product(1, 10, "cotton"), product(2, 5, "silk")];
        let refinement = Refinement {
            fabrics: vec!["cotton".to_owned()],
            sort: DisplaySort::PriceLow,
            ..Refinement::default()
        };

        let out = refine(&products, &refinement);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].fabrics, vec!["cotton"]);
        assert_eq!(out[0].price, Decimal::from(10));
    }

    #[test]
    fn refine_is_idempotent() {
        let mut products = vec![
            product(1, 30, "cotton"),
            product(2, 5, "silk"),
            product(3, 12, "Cotton"),
            product(4, 8, "linen"),
        ];
        products[0].colors = vec!["red".to_owned()];
        products[2].colors = vec!["red".to_owned(), "navy".to_owned()];
        let refinement = Refinement {
            fabrics: vec!["cotton".to_owned()],
            colors: vec!["red".to_owned()],
            sort: DisplaySort::PriceHigh,
            ..Refinement::default()
        };

        let once = refine(&products, &refinement);
        let twice = refine(&once, &refinement);

        assert_eq!(ids(&once), vec![1, 3]);
        assert_eq!(once, twice);
    }

    #[test]
    fn selections_combine_as_conjunction() {
        let mut shirt = product(1, 10, "cotton");
        shirt.sizes = vec!["M".to_owned()];
        let mut other = product(2, 10, "cotton");
        other.sizes = vec!["L".to_owned()];
        let refinement = Refinement {
            fabrics: vec!["cotton".to_owned()],
            sizes: vec!["m".to_owned()],
            ..Refinement::default()
        };

        assert_eq!(ids(&refine(&[shirt, other], &refinement)), vec![1]);
    }

    #[test]
    fn input_is_not_mutated() {
        let products = vec![product(2, 5, "silk"), product(1, 10, "cotton")];
        let before = products.clone();
        let _ = refine(
            &products,
            &Refinement {
                sort: DisplaySort::Newest,
                ..Refinement::default()
            },
        );
        assert_eq!(products, before);
    }

    #[test]
    fn price_sorts_use_effective_price() {
        let mut discounted = product(1, 100, "wool");
        discounted.discounted_price = Some(Decimal::from(4));
        let products = vec![product(2, 10, "wool"), discounted, product(3, 6, "wool")];

        let low = refine(
            &products,
            &Refinement {
                sort: DisplaySort::PriceLow,
                ..Refinement::default()
            },
        );
        let high = refine(
            &products,
            &Refinement {
                sort: DisplaySort::PriceHigh,
                ..Refinement::default()
            },
        );

        assert_eq!(ids(&low), vec![1, 3, 2]);
        assert_eq!(ids(&high), vec![2, 3, 1]);
    }

    #[test]
    fn discount_sort_puts_largest_discount_first() {
        let mut half = product(1, 100, "wool");
        half.discounted_price = Some(Decimal::from(50));
        let mut tenth = product(2, 100, "wool");
        tenth.discounted_price = Some(Decimal::from(90));
        let full = product(3, 100, "wool");

        let out = refine(
            &[full, tenth, half],
            &Refinement {
                sort: DisplaySort::Discount,
                ..Refinement::default()
            },
        );

        assert_eq!(ids(&out), vec![1, 2, 3]);
    }

    #[test]
    fn featured_sort_is_stable() {
        let mut a = product(1, 1, "x");
        let b = product(2, 1, "x");
        let mut c = product(3, 1, "x");
        a.featured = false;
        c.featured = true;

        let out = refine(
            &[a, b, c],
            &Refinement {
                sort: DisplaySort::Featured,
                ..Refinement::default()
            },
        );

        assert_eq!(ids(&out), vec![3, 1, 2]);
    }

    #[test]
    fn display_sort_parses_known_keys() {
        assert_eq!("price-low".parse::<DisplaySort>(), Ok(DisplaySort::PriceLow));
        assert_eq!("discount".parse::<DisplaySort>(), Ok(DisplaySort::Discount));
        assert_eq!("".parse::<DisplaySort>(), Ok(DisplaySort::None));
        assert!("cheapest".parse::<DisplaySort>().is_err());
    }
}
