//! `catalog` command: lists the category tree and brands.

use storefront_api::CatalogClient;
use storefront_core::{Brand, Category};

/// Fetch categories and brands concurrently and print them.
///
/// # Errors
///
/// Returns an error if either listing cannot be fetched.
pub(crate) async fn run_catalog(client: &CatalogClient) -> anyhow::Result<()> {
    let (categories, brands) = tokio::join!(client.list_categories(), client.list_brands());
    let categories = categories
        .map_err(|e| anyhow::anyhow!("failed to load categories: {}", e.display_message()))?;
    let brands =
        brands.map_err(|e| anyhow::anyhow!("failed to load brands: {}", e.display_message()))?;

    println!("CATEGORIES ({})", categories.len());
    for line in category_lines(&categories) {
        println!("{line}");
    }
    println!();
    println!("BRANDS ({})", brands.len());
    for brand in &brands {
        println!("{}", brand_line(brand));
    }

    Ok(())
}

/// Categories in tree order, children indented under their parent.
///
/// Categories whose parent is not in the list are printed as roots.
fn category_lines(categories: &[Category]) -> Vec<String> {
    let known = |id: u64| categories.iter().any(|c| c.id == id);
    let mut lines = Vec::with_capacity(categories.len());
    let roots = categories
        .iter()
        .filter(|c| c.parent_id.is_none_or(|parent| !known(parent)));
    for root in roots {
        push_subtree(categories, root, 0, &mut lines);
    }
    lines
}

fn push_subtree(categories: &[Category], node: &Category, depth: usize, lines: &mut Vec<String>) {
    // Guard against parent cycles in malformed data.
    if depth > categories.len() {
        return;
    }
    lines.push(format!(
        "{:indent$}{} [{}]",
        "",
        node.name,
        node.slug.as_deref().map_or_else(|| node.id.to_string(), str::to_owned),
        indent = depth * 2
    ));
    for child in categories.iter().filter(|c| c.parent_id == Some(node.id)) {
        push_subtree(categories, child, depth + 1, lines);
    }
}

fn brand_line(brand: &Brand) -> String {
    match &brand.slug {
        Some(slug) => format!("{} [{slug}]", brand.name),
        None => format!("{} [{}]", brand.name, brand.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: u64, name: &str, parent_id: Option<u64>) -> Category {
        Category {
            id,
            name: name.to_owned(),
            slug: Some(name.to_lowercase()),
            parent_id,
        }
    }

    #[test]
    fn children_are_indented_under_parents() {
        let categories = vec![
            category(2, "Shirts", Some(1)),
            category(1, "Clothing", None),
            category(3, "Shoes", None),
        ];

        let lines = category_lines(&categories);

        assert_eq!(
            lines,
            vec!["Clothing [clothing]", "  Shirts [shirts]", "Shoes [shoes]"]
        );
    }

    #[test]
    fn orphaned_category_is_printed_as_root() {
        let categories = vec![category(5, "Sale", Some(99))];
        assert_eq!(category_lines(&categories), vec!["Sale [sale]"]);
    }

    #[test]
    fn brand_without_slug_shows_id() {
        let brand = Brand {
            id: 4,
            name: "Acme".to_owned(),
            slug: None,
        };
        assert_eq!(brand_line(&brand), "Acme [4]");
    }
}
