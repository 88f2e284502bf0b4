//! Growing product list for infinite-scroll style browsing.
//!
//! A fresh query replaces the list; each further page is appended. When the
//! server sends pagination metadata it decides whether more pages exist;
//! otherwise a full-sized last page is taken to mean "maybe more".

use std::collections::HashSet;

use storefront_core::{FacetMetadata, Pagination, ProductSummary, ResultPage};

#[derive(Debug, Clone, Default)]
pub struct ResultAccumulator {
    products: Vec<ProductSummary>,
    ids: HashSet<u64>,
    pagination: Option<Pagination>,
    facets: Option<FacetMetadata>,
    /// Page number of the most recent page merged in; `0` before any.
    current_page: u32,
    last_page_full: bool,
}

impl ResultAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards everything and starts over from `page` (page 1).
    pub fn replace(&mut self, page: ResultPage, per_page: u32) {
        self.products.clear();
        self.ids.clear();
        self.facets = None;
        self.merge(page, 1, per_page);
    }

    /// Appends `page` (page number `page_number`) to the accumulated list.
    ///
    /// Products whose id is already present are skipped. Returns the number
    /// of products actually added.
    pub fn append(&mut self, page: ResultPage, page_number: u32, per_page: u32) -> usize {
        let before = self.products.len();
        self.merge(page, page_number, per_page);
        self.products.len() - before
    }

    fn merge(&mut self, page: ResultPage, page_number: u32, per_page: u32) {
        let received = page.products.len();
        for product in page.products {
            if self.ids.insert(product.id) {
                self.products.push(product);
            }
        }

        self.pagination = page.pagination;
        self.current_page = page
            .pagination
            .map_or(page_number, |p| p.current_page);
        self.last_page_full = per_page > 0 && received >= per_page as usize;
        if page.facets.is_some() {
            self.facets = page.facets;
        }
    }

    #[must_use]
    pub fn products(&self) -> &[ProductSummary] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    #[must_use]
    pub fn facets(&self) -> Option<&FacetMetadata> {
        self.facets.as_ref()
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        match self.pagination {
            Some(pagination) => pagination.has_more(),
            None => self.current_page > 0 && self.last_page_full,
        }
    }

    /// Page to request for "load more", if any.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        self.has_more().then(|| self.current_page + 1)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: u64) -> ProductSummary {
        ProductSummary {
            id,
            name: format!("product {id}"),
            slug: None,
            price: Decimal::from(10),
            discounted_price: None,
            image: None,
            in_stock: true,
            rating: None,
            featured: false,
            fabrics: Vec::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
        }
    }

    fn page(ids: &[u64], pagination: Option<(u32, u32)>) -> ResultPage {
        ResultPage {
            products: ids.iter().copied().map(product).collect(),
            pagination: pagination.map(|(current_page, total_pages)| Pagination {
                current_page,
                total_pages,
                total_count: 0,
                per_page: 2,
            }),
            facets: None,
        }
    }

    #[test]
    fn empty_accumulator_has_nothing_more() {
        let acc = ResultAccumulator::new();
        assert!(acc.is_empty());
        assert!(!acc.has_more());
        assert_eq!(acc.next_page(), None);
    }

    #[test]
    fn replace_discards_previous_results() {
        let mut acc = ResultAccumulator::new();
        acc.replace(page(&[1, 2], Some((1, 3))), 2);
        acc.append(page(&[3, 4], Some((2, 3))), 2, 2);

        acc.replace(page(&[9], Some((1, 1))), 2);

        assert_eq!(acc.len(), 1);
        assert_eq!(acc.products()[0].id, 9);
        assert_eq!(acc.current_page(), 1);
    }

    #[test]
    fn append_adds_new_page_after_existing() {
        let mut acc = ResultAccumulator::new();
        acc.replace(page(&[1, 2], Some((1, 2))), 2);

        let added = acc.append(page(&[3, 4], Some((2, 2))), 2, 2);

        assert_eq!(added, 2);
        let ids: Vec<u64> = acc.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(!acc.has_more());
    }

    #[test]
    fn append_skips_ids_already_present() {
        let mut acc = ResultAccumulator::new();
        acc.replace(page(&[1, 2], Some((1, 3))), 2);

        let added = acc.append(page(&[2, 3], Some((2, 3))), 2, 2);

        assert_eq!(added, 1);
        assert_eq!(acc.len(), 3);
    }

    #[test]
    fn pagination_metadata_drives_has_more() {
        let mut acc = ResultAccumulator::new();
        acc.replace(page(&[1, 2], Some((1, 2))), 2);
        assert!(acc.has_more());
        assert_eq!(acc.next_page(), Some(2));

        acc.append(page(&[3], Some((2, 2))), 2, 2);
        assert!(!acc.has_more());
        assert_eq!(acc.next_page(), None);
    }

    #[test]
    fn full_page_heuristic_without_pagination() {
        let mut acc = ResultAccumulator::new();
        acc.replace(page(&[1, 2], None), 2);
        assert!(acc.has_more());
        assert_eq!(acc.next_page(), Some(2));

        acc.append(page(&[3], None), 2, 2);
        assert!(!acc.has_more());
        assert_eq!(acc.current_page(), 2);
    }

    #[test]
    fn facets_survive_pages_without_facets() {
        let mut acc = ResultAccumulator::new();
        let mut first = page(&[1], Some((1, 2)));
        first.facets = Some(FacetMetadata::default());
        acc.replace(first, 1);
        acc.append(page(&[2], Some((2, 2))), 2, 1);
        assert!(acc.facets().is_some());
    }
}
