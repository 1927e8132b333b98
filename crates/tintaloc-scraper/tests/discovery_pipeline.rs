//! End-to-end tests for `StoreDiscovery::discover_stores`.
//!
//! A single wiremock server plays three roles: the search engine (`/search`),
//! the candidate store pages, and the CEP lookup service. No real network
//! traffic is made.

use std::sync::{Arc, Mutex};

use serde_json::json;
use wiremock::matchers::{method, path, query_param_contains};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tintaloc_geo::{CepClient, GeoResolver, Location, PositionEstimate};
use tintaloc_scraper::{DiscoveryOptions, DiscoveryRequest, SearchClient, StoreDiscovery, StoreKind};

/// Deterministic stand-in for the jitter estimator: hands out pre-seeded
/// offsets in call order, cycling when exhausted.
struct SeededOffsets {
    offsets: Vec<(f64, f64)>,
    next: Mutex<usize>,
}

impl SeededOffsets {
    fn new(offsets: Vec<(f64, f64)>) -> Self {
        Self {
            offsets,
            next: Mutex::new(0),
        }
    }
}

impl PositionEstimate for SeededOffsets {
    fn estimate(&self, user: &Location) -> (f64, f64) {
        let mut next = self.next.lock().expect("offsets lock");
        let (dlat, dlng) = self.offsets[*next % self.offsets.len()];
        *next += 1;
        (user.lat + dlat, user.lng + dlng)
    }
}

fn request_with_coords() -> DiscoveryRequest {
    DiscoveryRequest {
        color_name: "Azul Berlina".to_string(),
        color_code: "K12".to_string(),
        car_brand: "Ford".to_string(),
        car_model: "Ka".to_string(),
        car_year: "2015".to_string(),
        user_cep: None,
        user_lat: Some(-23.5505),
        user_lng: Some(-46.6333),
    }
}

fn test_options() -> DiscoveryOptions {
    DiscoveryOptions {
        inter_query_delay_ms: 0,
        ..DiscoveryOptions::default()
    }
}

fn build_pipeline(
    server_uri: &str,
    position: Box<dyn PositionEstimate>,
    opts: DiscoveryOptions,
) -> StoreDiscovery {
    let search =
        SearchClient::with_base_url(5, "tintaloc-test/0.1", server_uri).expect("search client");
    let cep =
        CepClient::with_base_url(5, "tintaloc-test/0.1", server_uri).expect("cep client");
    let resolver = Arc::new(GeoResolver::new(cep));
    StoreDiscovery::new(search, resolver, position, 5, "tintaloc-test/0.1", opts)
        .expect("build pipeline")
}

/// Mounts the search results and candidate pages used by most tests:
/// two physical stores and two online candidates (one of which has neither
/// a product nor a shipping signal and must be discarded).
async fn mount_catalogued_web(server: &MockServer) {
    let base = server.uri();

    // Physical phrases 1 and 2 contain "loja"; phrase 3 does not and will
    // fall through to wiremock's 404, exercising per-phrase failure handling.
    let physical_results = format!(
        r#"<a href="{base}/store1">Loja 1</a> <a href="{base}/store2">Loja 2</a>"#
    );
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_contains("q", "loja"))
        .respond_with(ResponseTemplate::new(200).set_body_string(physical_results))
        .mount(server)
        .await;

    let online_results = format!(
        r#"<a href="{base}/shop1">Shop 1</a> <a href="{base}/shop2">Shop 2</a>"#
    );
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_contains("q", "online"))
        .respond_with(ResponseTemplate::new(200).set_body_string(online_results))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/store1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Auto Tintas Silva - Home</title></head>
               <body><p>Tinta automotiva Azul Berlina em estoque.</p>
               <p>Rua das Flores, 123, Centro - São Paulo, CEP 01310-100</p>
               <p>Fone: (11) 3456-7890</p></body></html>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/store2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Tintas e Cia - Loja</title></head>
               <body><p>Pintura completa para Ka.</p></body></html>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/shop1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>MegaTintas - Loja Online</title></head>
               <body><p>Tinta K12 original. Frete para todo Brasil.</p></body></html>"#,
        ))
        .mount(server)
        .await;

    // No product term, no shipping keyword: must be excluded from online results.
    Mock::given(method("GET"))
        .and(path("/shop2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Blog do Carro - Notícias</title></head>
               <body><p>Notícias do mundo automotivo.</p></body></html>"#,
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn discovers_ranks_and_merges_physical_and_online_stores() {
    let server = MockServer::start().await;
    mount_catalogued_web(&server).await;

    // First two estimates land on the first-seen candidates (store1, store2);
    // later calls are duplicates removed by URL dedup.
    let position = Box::new(SeededOffsets::new(vec![(0.10, 0.0), (0.01, 0.0)]));
    let pipeline = build_pipeline(&server.uri(), position, test_options());

    let results = pipeline
        .discover_stores(&request_with_coords())
        .await
        .expect("discovery succeeds");

    assert!(results.len() <= 10);
    let physical: Vec<_> = results
        .iter()
        .filter(|r| r.kind == StoreKind::Physical)
        .collect();
    let online: Vec<_> = results
        .iter()
        .filter(|r| r.kind == StoreKind::Online)
        .collect();

    assert_eq!(physical.len(), 2, "store1 and store2, deduplicated");
    assert_eq!(online.len(), 1, "shop2 has no product/shipping signal");

    // Physical first, ascending by distance: store2 (~1.1 km) before store1 (~11.1 km).
    assert!(results[0].url.ends_with("/store2"));
    assert!(results[1].url.ends_with("/store1"));
    assert!(
        results[0].distance_km.unwrap() < results[1].distance_km.unwrap(),
        "physical results must be ascending by distance"
    );
    // time_min tracks distance_km numerically (60 km/h assumption).
    assert_eq!(results[0].distance_km, results[0].time_min);

    for r in &physical {
        assert_eq!(r.product_match, "Azul Berlina - Ka");
        assert!(!r.ships_to_cep);
    }
    assert_eq!(online[0].product_match, "K12 - Ka");
    assert!(online[0].ships_to_cep, "shop1 advertises nationwide shipping");
    assert_eq!(online[0].name, "MegaTintas");

    // Physical extraction details survive projection.
    let silva = physical
        .iter()
        .find(|r| r.url.ends_with("/store1"))
        .expect("store1 present");
    assert_eq!(silva.name, "Auto Tintas Silva");
    assert_eq!(silva.phone.as_deref(), Some("(11) 3456-7890"));
    assert!(silva.address.as_deref().unwrap_or("").starts_with("Rua das Flores"));

    // URL uniqueness across the whole response.
    let mut urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    urls.sort_unstable();
    urls.dedup();
    assert_eq!(urls.len(), results.len());
}

#[tokio::test]
async fn merged_cap_truncates_online_tail() {
    let server = MockServer::start().await;
    mount_catalogued_web(&server).await;

    let position = Box::new(SeededOffsets::new(vec![(0.01, 0.0)]));
    let opts = DiscoveryOptions {
        merged_cap: 2,
        ..test_options()
    };
    let pipeline = build_pipeline(&server.uri(), position, opts);

    let results = pipeline
        .discover_stores(&request_with_coords())
        .await
        .expect("discovery succeeds");

    assert_eq!(results.len(), 2);
    assert!(
        results.iter().all(|r| r.kind == StoreKind::Physical),
        "physical results fill the capped list before online ones"
    );
}

#[tokio::test]
async fn failed_cep_lookup_still_produces_results_without_distances() {
    let server = MockServer::start().await;
    mount_catalogued_web(&server).await;

    // The CEP service reports the code as unknown; location resolves to None.
    Mock::given(method("GET"))
        .and(path("/ws/00000000/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"erro": true})))
        .mount(&server)
        .await;

    let position = Box::new(SeededOffsets::new(vec![(0.01, 0.0)]));
    let pipeline = build_pipeline(&server.uri(), position, test_options());

    let request = DiscoveryRequest {
        user_cep: Some("00000-000".to_string()),
        user_lat: None,
        user_lng: None,
        ..request_with_coords()
    };

    let results = pipeline
        .discover_stores(&request)
        .await
        .expect("pipeline degrades, does not fail");

    assert!(!results.is_empty());
    assert!(
        results.iter().all(|r| r.distance_km.is_none()),
        "no user location means no distances"
    );
    // Ordering contract still holds: physical block precedes online block.
    let first_online = results
        .iter()
        .position(|r| r.kind == StoreKind::Online)
        .unwrap_or(results.len());
    assert!(results[first_online..]
        .iter()
        .all(|r| r.kind == StoreKind::Online));
}

#[tokio::test]
async fn store_found_by_both_stages_is_reported_once_as_physical() {
    let server = MockServer::start().await;
    let base = server.uri();

    // The same store URL comes back from the physical and the online search;
    // its page satisfies both inclusion rules, so without cross-bucket
    // de-duplication it would appear twice.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_contains("q", "loja"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(r#"<a href="{base}/store1">Loja</a>"#)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_contains("q", "online"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<a href="{base}/store1">Loja</a> <a href="{base}/shop1">Shop</a>"#
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/store1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Auto Tintas Silva - Home</title></head>
               <body><p>Tinta automotiva Azul Berlina K12 para Ka.</p></body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/shop1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>MegaTintas - Loja Online</title></head>
               <body><p>Tinta K12. Frete para todo Brasil.</p></body></html>"#,
        ))
        .mount(&server)
        .await;

    let position = Box::new(SeededOffsets::new(vec![(0.01, 0.0)]));
    let pipeline = build_pipeline(&server.uri(), position, test_options());

    let results = pipeline
        .discover_stores(&request_with_coords())
        .await
        .expect("discovery succeeds");

    let store1_entries: Vec<_> = results
        .iter()
        .filter(|r| r.url.ends_with("/store1"))
        .collect();
    assert_eq!(
        store1_entries.len(),
        1,
        "a URL surfacing in both stages must be returned exactly once"
    );
    assert_eq!(store1_entries[0].kind, StoreKind::Physical);

    let mut urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    urls.sort_unstable();
    urls.dedup();
    assert_eq!(urls.len(), results.len());
    assert!(
        results.iter().any(|r| r.url.ends_with("/shop1")),
        "distinct online stores still make it through"
    );
}

#[tokio::test]
async fn resolved_cep_city_feeds_phrases_and_distances() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/ws/01310100/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "localidade": "São Paulo",
            "uf": "SP"
        })))
        .mount(&server)
        .await;

    // The physical search only answers phrases carrying the resolved city;
    // the online phrases never include it and fall through to 404.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_contains("q", "São Paulo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(r#"<a href="{base}/store1">Loja</a>"#)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/store1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Auto Tintas Silva - Home</title></head>\
             <body>Tinta Azul Berlina</body></html>",
        ))
        .mount(&server)
        .await;

    let position = Box::new(SeededOffsets::new(vec![(0.02, 0.0)]));
    let pipeline = build_pipeline(&server.uri(), position, test_options());

    let request = DiscoveryRequest {
        user_cep: Some("01310-100".to_string()),
        user_lat: None,
        user_lng: None,
        ..request_with_coords()
    };

    let results = pipeline
        .discover_stores(&request)
        .await
        .expect("discovery succeeds");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, StoreKind::Physical);
    // Coordinates come from the fixed fallback attached to the resolved CEP,
    // so a 0.02° latitude offset is ~2.2 km.
    let distance = results[0].distance_km.expect("distance attached");
    assert!((distance - 2.2).abs() < 1e-9, "unexpected distance: {distance}");
    assert_eq!(results[0].distance_km, results[0].time_min);
}

#[tokio::test]
async fn default_location_appends_city_to_search_phrases() {
    let server = MockServer::start().await;

    // Only a phrase carrying the default city matches this mock; everything
    // else 404s. Discovery must still return the one extractable store.
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_contains("q", "São Paulo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(r#"<a href="{base}/store1">Loja</a>"#)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/store1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Auto Tintas Silva - Home</title></head>\
             <body>Tinta Azul Berlina</body></html>",
        ))
        .mount(&server)
        .await;

    let position = Box::new(SeededOffsets::new(vec![(0.01, 0.0)]));
    let pipeline = build_pipeline(&server.uri(), position, test_options());

    let request = DiscoveryRequest {
        user_cep: None,
        user_lat: None,
        user_lng: None,
        ..request_with_coords()
    };

    let results = pipeline
        .discover_stores(&request)
        .await
        .expect("discovery succeeds");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Auto Tintas Silva");
    assert!(
        results[0].distance_km.is_some(),
        "default location still yields estimated distances"
    );
}
