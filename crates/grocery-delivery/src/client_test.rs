use super::*;

fn config(base_url: &str) -> DeliveryConfig {
    DeliveryConfig {
        base_url: base_url.to_owned(),
        ..DeliveryConfig::default()
    }
}

#[test]
fn api_base_url_appends_api_segment() {
    let url = api_base_url("http://localhost:3002").unwrap();
    assert_eq!(url.as_str(), "http://localhost:3002/api/");
}

#[test]
fn api_base_url_strips_trailing_slash_and_api() {
    for base in [
        "http://localhost:3002/",
        "http://localhost:3002/api",
        "http://localhost:3002/api/",
        "  http://localhost:3002//  ",
    ] {
        let url = api_base_url(base).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3002/api/", "base: {base}");
    }
}

#[test]
fn api_base_url_keeps_path_prefix() {
    let url = api_base_url("https://feeds.example.com/receiver/api").unwrap();
    assert_eq!(url.as_str(), "https://feeds.example.com/receiver/api/");
}

#[test]
fn api_base_url_rejects_garbage() {
    assert!(matches!(
        api_base_url("not a url"),
        Err(DeliveryError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        api_base_url("ftp://localhost"),
        Err(DeliveryError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn endpoint_urls_follow_record_kind() {
    let client = DeliveryClient::new(&config("http://localhost:3002/api")).unwrap();
    assert_eq!(
        client.endpoint_url(RecordKind::Product).as_str(),
        "http://localhost:3002/api/product"
    );
    assert_eq!(
        client.endpoint_url(RecordKind::Store).as_str(),
        "http://localhost:3002/api/store"
    );
    assert_eq!(client.health_url.as_str(), "http://localhost:3002/api/health");
}

#[test]
fn api_path_percent_encodes_segments() {
    let client = DeliveryClient::new(&config("http://localhost:3002")).unwrap();
    let url = client.api_path(&["store", "Oasi Tigre", "Roma/Nord"]).unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:3002/api/store/Oasi%20Tigre/Roma%2FNord"
    );
}

#[test]
fn zero_concurrency_is_raised_to_one() {
    let mut cfg = config("http://localhost:3002");
    cfg.max_concurrent_requests = 0;
    let client = DeliveryClient::new(&cfg).unwrap();
    assert_eq!(client.max_concurrent_requests(), 1);
}

#[test]
fn classify_status_splits_client_and_server_errors() {
    let url = "http://localhost:3002/api/product";
    assert!(matches!(
        classify_status(StatusCode::BAD_REQUEST, url, "bad".to_owned()),
        DeliveryError::Rejected { status: 400, .. }
    ));
    assert!(matches!(
        classify_status(StatusCode::SERVICE_UNAVAILABLE, url, String::new()),
        DeliveryError::ServerError { status: 503, .. }
    ));
    assert!(matches!(
        classify_status(StatusCode::MOVED_PERMANENTLY, url, String::new()),
        DeliveryError::UnexpectedStatus { status: 301, .. }
    ));
}

#[test]
fn truncate_body_caps_long_bodies() {
    let long = "x".repeat(MAX_ERROR_BODY_CHARS + 10);
    let truncated = truncate_body(&long);
    assert_eq!(truncated.chars().count(), MAX_ERROR_BODY_CHARS + 1);
    assert!(truncated.ends_with('…'));
    assert_eq!(truncate_body("  short  "), "short");
}
