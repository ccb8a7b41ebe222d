//! End-to-end catalog load through the HTTP client.

use serde_json::json;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use pokedex::config::ApiConfig;
use pokedex::core::api::PokeApiClient;
use pokedex::core::loader::{load_catalog, LoadError, LoaderOptions};
use pokedex::core::pipeline::{derive_page, ViewChange, ViewState};

/// Serves `/pokemon/{id}`, failing the listed identifiers with a 500.
struct PokemonResponder {
    failing: Vec<u32>,
}

impl Respond for PokemonResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id: u32 = request
            .url
            .path()
            .rsplit('/')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        if self.failing.contains(&id) {
            return ResponseTemplate::new(500);
        }

        let kind = if id % 2 == 0 { "fire" } else { "water" };
        ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "name": format!("mon{id}"),
            "height": 10,
            "weight": 100,
            "types": [{ "slot": 1, "type": { "name": kind } }],
            "sprites": { "front_default": format!("{id}.png") },
            "stats": [],
            "abilities": []
        }))
    }
}

async fn mount_catalog(server: &MockServer, size: u32, failing: Vec<u32>) {
    let results: Vec<_> = (1..=size)
        .map(|id| json!({ "name": format!("mon{id}"), "url": format!("{}/pokemon/{id}", server.uri()) }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .and(query_param("limit", size.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/pokemon/\d+$"))
        .respond_with(PokemonResponder { failing })
        .mount(server)
        .await;
}

fn config(server: &MockServer, size: u32, batch_size: usize) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        universe_size: size,
        batch_size,
        ..ApiConfig::default()
    }
}

#[tokio::test]
async fn test_load_skips_failed_items_and_keeps_going() {
    let server = MockServer::start().await;
    mount_catalog(&server, 12, vec![3, 10]).await;

    let api = config(&server, 12, 5);
    let client = PokeApiClient::new(&api).unwrap();
    let mut updates = Vec::new();

    let report = load_catalog(&client, &LoaderOptions::from(&api), |p| updates.push(p))
        .await
        .unwrap();

    assert_eq!(report.requested, 12);
    assert_eq!(report.skipped, 2);
    let ids: Vec<u32> = report.entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5, 6, 7, 8, 9, 11, 12]);
    assert_eq!(report.entries[0].sprite.as_deref(), Some("1.png"));

    // 12 items in batches of 5: three updates, the last at 100%.
    assert_eq!(updates.len(), 3);
    assert_eq!(updates.last().map(|p| p.percent), Some(100));
    assert_eq!(updates.last().map(|p| p.loaded), Some(10));
    assert!(updates.windows(2).all(|w| w[0].percent <= w[1].percent));
}

#[tokio::test]
async fn test_index_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let api = config(&server, 12, 5);
    let client = PokeApiClient::new(&api).unwrap();
    let mut updates = 0;

    let result = load_catalog(&client, &LoaderOptions::from(&api), |_| updates += 1).await;

    assert!(matches!(result, Err(LoadError::Index(_))));
    assert_eq!(updates, 0);
}

#[tokio::test]
async fn test_loaded_catalog_feeds_the_pipeline() {
    let server = MockServer::start().await;
    mount_catalog(&server, 30, vec![]).await;

    let api = config(&server, 30, 8);
    let client = PokeApiClient::new(&api).unwrap();
    let report = load_catalog(&client, &LoaderOptions::from(&api), |_| {})
        .await
        .unwrap();

    let state = ViewState::default().apply(ViewChange::Search("mon2".into()), 1);
    let page = derive_page(&report.entries, &state, 24);

    // mon2, mon20..mon29
    assert_eq!(page.total_matches, 11);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.items[0].id, 2);
}
