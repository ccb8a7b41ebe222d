//! PokeApiClient against a mocked PokéAPI.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pokedex::config::ApiConfig;
use pokedex::core::api::{ApiError, CatalogSource, IndexRef, PokeApiClient};
use pokedex::core::catalog::NO_DESCRIPTION;

fn client_for(server: &MockServer, language: &str) -> PokeApiClient {
    let config = ApiConfig {
        base_url: format!("{}/", server.uri()),
        language: language.to_string(),
        timeout_secs: Some(5),
        ..ApiConfig::default()
    };
    PokeApiClient::new(&config).unwrap()
}

fn bulbasaur() -> serde_json::Value {
    json!({
        "id": 1,
        "name": "bulbasaur",
        "height": 7,
        "weight": 69,
        "types": [
            { "slot": 1, "type": { "name": "grass", "url": "https://pokeapi.co/api/v2/type/12/" } },
            { "slot": 2, "type": { "name": "poison", "url": "https://pokeapi.co/api/v2/type/4/" } }
        ],
        "sprites": {
            "front_default": "front.png",
            "other": {
                "dream_world": { "front_default": "dream.svg" },
                "official-artwork": { "front_default": null }
            }
        },
        "stats": [
            { "base_stat": 45, "effort": 0, "stat": { "name": "hp" } },
            { "base_stat": 49, "effort": 0, "stat": { "name": "attack" } }
        ],
        "abilities": [
            { "ability": { "name": "overgrow" }, "is_hidden": false, "slot": 1 },
            { "ability": { "name": "chlorophyll" }, "is_hidden": true, "slot": 3 }
        ]
    })
}

fn bulbasaur_species() -> serde_json::Value {
    json!({
        "flavor_text_entries": [
            { "flavor_text": "Une graine étrange.", "language": { "name": "fr" } },
            { "flavor_text": "A strange seed was\nplanted on its\u{c}back at birth.", "language": { "name": "en" } },
            { "flavor_text": "Second english entry.", "language": { "name": "en" } }
        ]
    })
}

async fn mount_bulbasaur(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bulbasaur()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pokemon-species/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bulbasaur_species()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_index_sends_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1302,
            "next": null,
            "previous": null,
            "results": [
                { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" },
                { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let index = client_for(&server, "en").fetch_index(2).await.unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index[1].name, "ivysaur");
    assert_eq!(index[1].url, "https://pokeapi.co/api/v2/pokemon/2/");
}

#[tokio::test]
async fn test_fetch_entry_follows_reference_url() {
    let server = MockServer::start().await;
    mount_bulbasaur(&server).await;

    let reference = IndexRef {
        name: "bulbasaur".into(),
        url: format!("{}/pokemon/1", server.uri()),
    };
    let entry = client_for(&server, "en").fetch_entry(&reference).await.unwrap();

    assert_eq!(entry.id, 1);
    assert_eq!(entry.name, "bulbasaur");
    assert_eq!(entry.types, vec!["grass", "poison"]);
    // official artwork is null, so the dream-world art wins
    assert_eq!(entry.sprite.as_deref(), Some("dream.svg"));
    assert_eq!(entry.height, 7);
    assert_eq!(entry.weight, 69);
}

#[tokio::test]
async fn test_fetch_detail_merges_species() {
    let server = MockServer::start().await;
    mount_bulbasaur(&server).await;

    let detail = client_for(&server, "en").fetch_detail(1).await.unwrap();

    assert_eq!(detail.entry.display_name(), "Bulbasaur");
    assert_eq!(detail.abilities, vec!["overgrow", "chlorophyll"]);
    assert_eq!(detail.stats.len(), 2);
    assert_eq!(detail.stats[0].name, "hp");
    assert_eq!(detail.stats[0].value, 45);
    assert_eq!(detail.stat_total(), 94);
    assert_eq!(
        detail.description,
        "A strange seed was planted on its back at birth."
    );
}

#[tokio::test]
async fn test_fetch_detail_uses_configured_language() {
    let server = MockServer::start().await;
    mount_bulbasaur(&server).await;

    let detail = client_for(&server, "fr").fetch_detail(1).await.unwrap();
    assert_eq!(detail.description, "Une graine étrange.");

    let detail = client_for(&server, "ja").fetch_detail(1).await.unwrap();
    assert_eq!(detail.description, NO_DESCRIPTION);
}

#[tokio::test]
async fn test_missing_record_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let err = client_for(&server, "en").fetch_detail(9999).await.unwrap_err();
    match err {
        ApiError::Status { status, url } => {
            assert_eq!(status, 404);
            assert!(url.contains("9999"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server, "en").fetch_index(10).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}
