//! Integration tests for `PriceService::price_for_handle`.
//!
//! Each test runs the full pipeline (region lookup, product fetch,
//! normalization, safe resolution) against a `wiremock` backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_core::{PriceOverrideTable, PriceSource};
use storefront_medusa::{MedusaClient, PriceService, RegionResolver, SafePriceResolver};

fn service(server: &MockServer, timeout: Duration) -> PriceService {
    let client = Arc::new(
        MedusaClient::new(&server.uri(), Some("pk_test"), 5, "storefront-test/0.1")
            .expect("failed to build test MedusaClient"),
    );
    let regions = RegionResolver::new(Arc::clone(&client));
    let resolver = SafePriceResolver::new(PriceOverrideTable::builtin()).with_timeout(timeout);
    PriceService::new(client, regions, resolver)
}

async fn mount_regions(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "regions": [
                {"id": "reg_ng", "currency_code": "ngn", "countries": [{"iso_2": "ng"}]},
                {"id": "reg_us", "currency_code": "usd", "countries": [{"iso_2": "us"}]}
            ]
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn product_body(title: &str, calculated_price: serde_json::Value) -> serde_json::Value {
    json!({
        "products": [{
            "id": "prod_1",
            "title": title,
            "handle": "matte-lipstick-collection",
            "variants": [{"id": "variant_1", "calculated_price": calculated_price}]
        }],
        "count": 1
    })
}

#[tokio::test]
async fn live_price_for_region_and_single_region_fetch() {
    let server = MockServer::start().await;
    mount_regions(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .and(query_param("handle", "matte-lipstick-collection"))
        .and(query_param("region_id", "reg_ng"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&product_body(
            "Matte Lipstick Collection",
            json!({"calculated_amount": 9200, "currency_code": "ngn"}),
        )))
        .expect(2)
        .mount(&server)
        .await;

    let svc = service(&server, Duration::from_secs(3));
    for _ in 0..2 {
        let price = svc
            .price_for_handle("NG", "matte-lipstick-collection", None, None)
            .await
            .expect("product exists");
        assert_eq!(price.source, PriceSource::Medusa);
        assert_eq!(price.formatted, "₦9,200.00");
        assert_eq!(price.currency, "NGN");
    }
}

#[tokio::test]
async fn unknown_handle_is_none() {
    let server = MockServer::start().await;
    mount_regions(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"products": []})))
        .mount(&server)
        .await;

    let svc = service(&server, Duration::from_secs(3));
    assert!(svc
        .price_for_handle("ng", "nope", None, Some("BANANA POWDER"))
        .await
        .is_none());
}

#[tokio::test]
async fn unpriced_product_uses_override_by_title() {
    let server = MockServer::start().await;
    mount_regions(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&product_body("Matte Lipstick Collection", json!(null))),
        )
        .mount(&server)
        .await;

    let svc = service(&server, Duration::from_secs(3));
    let price = svc
        .price_for_handle("ng", "matte-lipstick-collection", None, None)
        .await
        .unwrap();
    assert_eq!(price.source, PriceSource::Hardcoded);
    assert_eq!(price.formatted, "₦8,500");
    assert_eq!(
        price.error.as_deref(),
        Some("No valid calculated price from Medusa")
    );
}

#[tokio::test]
async fn backend_error_falls_back_through_title_hint() {
    let server = MockServer::start().await;
    mount_regions(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let svc = service(&server, Duration::from_secs(3));
    let price = svc
        .price_for_handle("ng", "banana-powder", None, Some("BANANA POWDER"))
        .await
        .unwrap();
    assert_eq!(price.source, PriceSource::Hardcoded);
    assert!((price.amount - 12_000.0).abs() < f64::EPSILON);
    assert!(price.error.unwrap().contains("500"));
}

#[tokio::test]
async fn slow_backend_times_out_into_placeholder() {
    let server = MockServer::start().await;
    mount_regions(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&product_body("Unlisted Gloss", json!(5000)))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let svc = service(&server, Duration::from_millis(150));
    // Warm the region cache so only the product fetch is timed.
    svc.regions().list_regions().await.unwrap();

    let started = Instant::now();
    let price = svc
        .price_for_handle("us", "unlisted-gloss", None, None)
        .await
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(price.source, PriceSource::Fallback);
    assert_eq!(price.formatted, "Contact for price");
    assert_eq!(price.currency, "USD");
    assert_eq!(price.error.as_deref(), Some("Price loading timeout"));
}

#[tokio::test]
async fn unreachable_regions_take_region_unavailable_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&product_body("Matte Lipstick Collection", json!(9200))),
        )
        .mount(&server)
        .await;

    let svc = service(&server, Duration::from_secs(3));
    let price = svc
        .price_for_handle("ng", "matte-lipstick-collection", None, None)
        .await
        .unwrap();
    assert_eq!(price.source, PriceSource::Hardcoded);
    assert_eq!(price.error.as_deref(), Some("Region not available"));
}

#[tokio::test]
async fn region_outage_and_fetch_failure_use_override_as_region_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let svc = service(&server, Duration::from_secs(3));
    let price = svc
        .price_for_handle("ng", "banana-powder", None, Some("BANANA POWDER"))
        .await
        .unwrap();
    assert_eq!(price.source, PriceSource::Hardcoded);
    assert_eq!(price.error.as_deref(), Some("Region not available"));

    let price = svc
        .price_for_handle("ng", "unlisted-gloss", None, None)
        .await
        .unwrap();
    assert_eq!(price.source, PriceSource::Fallback);
    assert_eq!(price.currency, "NGN");
    assert_eq!(
        price.error.as_deref(),
        Some("No region and no hardcoded price")
    );
}

#[tokio::test]
async fn region_without_id_is_not_used_for_pricing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "regions": [{"id": "", "currency_code": "ngn", "countries": [{"iso_2": "ng"}]}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .and(query_param_is_missing("region_id"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&product_body("Matte Lipstick Collection", json!(9200))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let svc = service(&server, Duration::from_secs(3));
    assert!(svc.regions().get_region("ng").await.is_some());
    assert!(svc.pricing_region("ng").await.is_none());

    let price = svc
        .price_for_handle("ng", "matte-lipstick-collection", None, None)
        .await
        .unwrap();
    assert_eq!(price.source, PriceSource::Hardcoded);
    assert_eq!(price.error.as_deref(), Some("Region not available"));
}

#[tokio::test]
async fn default_country_uses_configured_region_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .and(query_param("id[]", "reg_lagos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "regions": [{"id": "reg_lagos", "currency_code": "ngn", "countries": []}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .and(query_param("region_id", "reg_lagos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&product_body(
            "Matte Lipstick Collection",
            json!({"calculated_amount": 9200, "currency_code": "ngn"}),
        )))
        .mount(&server)
        .await;

    let client = Arc::new(
        MedusaClient::new(&server.uri(), None, 5, "storefront-test/0.1")
            .expect("failed to build test MedusaClient"),
    );
    let regions = RegionResolver::new(Arc::clone(&client))
        .with_default_country("ng")
        .with_default_region_id(Some("reg_lagos".to_owned()));
    let svc = PriceService::new(
        client,
        regions,
        SafePriceResolver::new(PriceOverrideTable::builtin()),
    );

    let price = svc
        .price_for_handle("NG", "matte-lipstick-collection", None, None)
        .await
        .unwrap();
    assert_eq!(price.source, PriceSource::Medusa);
    assert_eq!(price.formatted, "₦9,200.00");
}
