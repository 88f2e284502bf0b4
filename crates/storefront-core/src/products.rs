use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Read-only projection of a catalog item as returned by the listing
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// List price. Accepted as a JSON number or a decimal string.
    pub price: Decimal,
    /// Sale price, if the product is discounted.
    #[serde(default, alias = "sale_price", alias = "discount_price")]
    pub discounted_price: Option<Decimal>,
    #[serde(default, alias = "image_url", alias = "thumbnail")]
    pub image: Option<String>,
    /// Missing on some legacy payloads; treated as in stock.
    #[serde(default = "default_in_stock", alias = "is_in_stock")]
    pub in_stock: bool,
    #[serde(default, alias = "average_rating")]
    pub rating: Option<f64>,
    #[serde(default, alias = "is_featured")]
    pub featured: bool,
    #[serde(default, alias = "fabric", deserialize_with = "one_or_many")]
    pub fabrics: Vec<String>,
    #[serde(default, alias = "color", deserialize_with = "one_or_many")]
    pub colors: Vec<String>,
    #[serde(default, alias = "size", deserialize_with = "one_or_many")]
    pub sizes: Vec<String>,
}

fn default_in_stock() -> bool {
    true
}

/// Accepts `null`, a single string, or an array of strings.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) if value.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

impl ProductSummary {
    /// Price the customer pays: the discounted price when it undercuts the
    /// list price, otherwise the list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.discounted_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }

    /// Discount as a percentage of the list price, `0` when not discounted.
    #[must_use]
    pub fn discount_percent(&self) -> Decimal {
        let sale = self.effective_price();
        if self.price <= Decimal::ZERO || sale >= self.price {
            return Decimal::ZERO;
        }
        (self.price - sale) / self.price * Decimal::ONE_HUNDRED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ProductSummary {
        serde_json::from_str(json).expect("product fixture should parse")
    }

    #[test]
    fn decodes_minimal_payload_with_defaults() {
        let p = parse(r#"{"id": 9, "name": "Plain Tee", "price": 12}"#);
        assert_eq!(p.id, 9);
        assert_eq!(p.price, Decimal::from(12));
        assert!(p.in_stock);
        assert!(!p.featured);
        assert!(p.fabrics.is_empty());
        assert!(p.discounted_price.is_none());
    }

    #[test]
    fn decodes_string_prices_and_aliases() {
        let p = parse(
            r#"{
                "id": 4,
                "name": "Silk Scarf",
                "price": "80.00",
                "sale_price": "60.00",
                "image_url": "https://cdn.example.com/scarf.jpg",
                "is_in_stock": false,
                "average_rating": 4.5,
                "is_featured": true
            }"#,
        );
        assert_eq!(p.price, "80.00".parse::<Decimal>().unwrap());
        assert_eq!(p.discounted_price, Some("60.00".parse().unwrap()));
        assert_eq!(p.image.as_deref(), Some("https://cdn.example.com/scarf.jpg"));
        assert!(!p.in_stock);
        assert_eq!(p.rating, Some(4.5));
        assert!(p.featured);
    }

    #[test]
    fn decodes_refinement_fields_from_scalar_or_list() {
        let p = parse(
            r#"{
                "id": 1, "name": "Shirt", "price": 10,
                "fabric": "cotton",
                "colors": ["red", "blue"],
                "size": null
            }"#,
        );
        assert_eq!(p.fabrics, vec!["cotton"]);
        assert_eq!(p.colors, vec!["red", "blue"]);
        assert!(p.sizes.is_empty());
    }

    #[test]
    fn blank_scalar_refinement_field_is_empty() {
        let p = parse(r#"{"id": 1, "name": "Shirt", "price": 10, "fabric": ""}"#);
        assert!(p.fabrics.is_empty());
    }

    #[test]
    fn effective_price_ignores_higher_sale_price() {
        let p = parse(r#"{"id": 1, "name": "X", "price": 10, "discounted_price": 15}"#);
        assert_eq!(p.effective_price(), Decimal::from(10));
        assert_eq!(p.discount_percent(), Decimal::ZERO);
    }

    #[test]
    fn discount_percent_is_relative_to_list_price() {
        let p = parse(r#"{"id": 1, "name": "X", "price": 80, "discounted_price": 60}"#);
        assert_eq!(p.discount_percent(), Decimal::from(25));
    }

    #[test]
    fn zero_price_has_no_discount() {
        let p = parse(r#"{"id": 1, "name": "Freebie", "price": 0}"#);
        assert_eq!(p.discount_percent(), Decimal::ZERO);
    }
}
