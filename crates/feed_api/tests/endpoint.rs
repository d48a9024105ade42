use feed_api::{FailureKind, OrderBy, PhotosEndpoint};

#[test]
fn order_by_maps_to_query_values() {
    let values: Vec<_> = OrderBy::ALL.iter().map(|o| o.as_query_value()).collect();
    assert_eq!(values, vec!["latest", "oldest", "popular"]);
    assert_eq!(OrderBy::default(), OrderBy::Latest);
}

#[test]
fn order_by_parses_case_insensitively() {
    assert_eq!("Popular".parse::<OrderBy>(), Ok(OrderBy::Popular));
    assert_eq!(" oldest ".parse::<OrderBy>(), Ok(OrderBy::Oldest));
    let err = "favorites".parse::<OrderBy>().unwrap_err();
    assert!(err.to_string().contains("favorites"));
}

#[test]
fn photos_endpoint_builds_url_with_order() {
    let endpoint = PhotosEndpoint::photos(OrderBy::Oldest);
    assert_eq!(endpoint.order_by(), OrderBy::Oldest);

    let url = endpoint.url("https://api.unsplash.com").unwrap();
    assert_eq!(url.as_str(), "https://api.unsplash.com/photos?order_by=oldest");
}

#[test]
fn photos_endpoint_keeps_base_path_prefix() {
    let url = PhotosEndpoint::photos(OrderBy::Latest)
        .url("http://localhost:8080/v1")
        .unwrap();
    assert_eq!(url.as_str(), "http://localhost:8080/v1/photos?order_by=latest");
}

#[test]
fn photos_endpoint_rejects_unusable_base() {
    let err = PhotosEndpoint::photos(OrderBy::Latest)
        .url("mailto:someone@example.com")
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
