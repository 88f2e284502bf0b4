use storefront_core::{CategoryRef, FilterCriteria};

use super::*;

fn test_client(base_url: &str) -> CatalogClient {
    CatalogClient::with_base_url(base_url, 5, "storefront-test/0.1", None)
        .expect("client construction should not fail")
}

#[test]
fn build_url_appends_path_to_api_prefix() {
    let client = test_client("https://shop.example.com/api/v1");
    let url = client.build_url("categories", &[]).unwrap();
    assert_eq!(url.as_str(), "https://shop.example.com/api/v1/categories");
}

#[test]
fn build_url_strips_trailing_slashes() {
    let client = test_client("https://shop.example.com/api/v1//");
    let url = client.build_url("brands", &[]).unwrap();
    assert_eq!(url.as_str(), "https://shop.example.com/api/v1/brands");
}

#[test]
fn build_url_renders_criteria_query() {
    let client = test_client("https://shop.example.com/api");
    let criteria = FilterCriteria {
        category: Some(CategoryRef::Slug("shirts".to_owned())),
        query: Some("red & blue".to_owned()),
        ..FilterCriteria::default()
    };
    let url = client
        .build_url("products", &criteria.query_pairs())
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://shop.example.com/api/products?page=1&per_page=20&category_slug=shirts&query=red+%26+blue&sort_by=recommended"
    );
}

#[test]
fn build_url_encodes_array_parameter_names() {
    let client = test_client("https://shop.example.com");
    let url = client
        .build_url("products", &[("attribute_values[]", "4".to_owned())])
        .unwrap();
    assert!(
        url.as_str().ends_with("attribute_values%5B%5D=4"),
        "brackets should be percent-encoded: {url}"
    );
}

#[test]
fn with_base_url_rejects_garbage() {
    let result = CatalogClient::with_base_url("not a url", 5, "ua", None);
    assert!(
        matches!(result, Err(ApiError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl"
    );
}
