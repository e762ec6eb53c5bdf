use super::*;

fn test_client(base_url: &str) -> ShopsClient {
    ShopsClient::new(base_url, 30, "shopfinder-test/0.1")
        .expect("client construction should not fail")
}

#[test]
fn build_url_for_all_shops() {
    let client = test_client("https://market.example.com");
    let url = client.build_url(ALL_SHOPS_PATH, &[]).unwrap();
    assert_eq!(url.as_str(), "https://market.example.com/api/shops");
}

#[test]
fn build_url_strips_trailing_slash() {
    let client = test_client("https://market.example.com/");
    let url = client.build_url(ALL_SHOPS_PATH, &[]).unwrap();
    assert_eq!(url.as_str(), "https://market.example.com/api/shops");
}

#[test]
fn build_url_keeps_path_prefix() {
    let client = test_client("https://example.com/market");
    let url = client.build_url(ALL_SHOPS_PATH, &[]).unwrap();
    assert_eq!(url.as_str(), "https://example.com/market/api/shops");
}

#[test]
fn build_url_for_nearby_shops() {
    let client = test_client("https://market.example.com");
    let url = client
        .build_url(SHOPS_NEAR_PATH, &[("lat", "40.5"), ("lng", "-73.25")])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://market.example.com/api/shops/coordinates?lat=40.5&lng=-73.25"
    );
}

#[test]
fn new_rejects_invalid_base_url() {
    let result = ShopsClient::new("not a url", 30, "shopfinder-test/0.1");
    assert!(
        matches!(result, Err(ClientError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl"
    );
}

#[test]
fn shop_query_display() {
    assert_eq!(ShopQuery::All.to_string(), "all shops");
    assert_eq!(
        ShopQuery::Near(Coordinate::new(1.5, -2.0)).to_string(),
        "shops near 1.500000,-2.000000"
    );
}
