//! PokéAPI client.
//!
//! Wire payloads mirror the parts of the v2 JSON the catalog uses; every
//! nested sprite key is optional upstream, so they are all `Option` here.
//! [`CatalogSource`] is the seam the loader and the TUI depend on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;
use crate::core::catalog::{normalize_flavor_text, Entry, EntryDetail, Stat, NO_DESCRIPTION};

/// Shown in place of a missing image reference.
pub const PLACEHOLDER_SPRITE: &str = "/placeholder.svg?height=96&width=96";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// ── Wire payloads ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct IndexPage {
    pub results: Vec<IndexRef>,
}

/// Lightweight index reference: name plus absolute detail URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<RawTypeSlot>,
    #[serde(default)]
    pub sprites: RawSprites,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub stats: Vec<RawStat>,
    #[serde(default)]
    pub abilities: Vec<RawAbility>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<RawOtherSprites>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Option<RawArtwork>,
    pub dream_world: Option<RawArtwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArtwork {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAbility {
    pub ability: NamedResource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSpecies {
    #[serde(default)]
    pub flavor_text_entries: Vec<RawFlavorText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFlavorText {
    pub flavor_text: String,
    pub language: NamedResource,
}

// ── Image fallback chain ────────────────────────────────────────────────────

pub type SpriteAccessor = fn(&RawSprites) -> Option<&str>;

fn official_artwork(sprites: &RawSprites) -> Option<&str> {
    sprites
        .other
        .as_ref()?
        .official_artwork
        .as_ref()?
        .front_default
        .as_deref()
}

fn dream_world_art(sprites: &RawSprites) -> Option<&str> {
    sprites
        .other
        .as_ref()?
        .dream_world
        .as_ref()?
        .front_default
        .as_deref()
}

fn default_sprite(sprites: &RawSprites) -> Option<&str> {
    sprites.front_default.as_deref()
}

/// Accessors tried in order; the first non-empty reference wins.
pub const IMAGE_FALLBACK_CHAIN: [SpriteAccessor; 3] =
    [official_artwork, dream_world_art, default_sprite];

pub fn resolve_sprite(sprites: &RawSprites) -> Option<String> {
    IMAGE_FALLBACK_CHAIN
        .iter()
        .find_map(|accessor| accessor(sprites).filter(|s| !s.is_empty()))
        .map(str::to_string)
}

/// Image reference for display, the placeholder when none resolved.
pub fn sprite_or_placeholder(entry: &Entry) -> &str {
    entry.sprite.as_deref().unwrap_or(PLACEHOLDER_SPRITE)
}

// ── Mapping ─────────────────────────────────────────────────────────────────

impl RawPokemon {
    pub fn to_entry(&self) -> Entry {
        Entry {
            id: self.id,
            name: self.name.clone(),
            types: self.types.iter().map(|t| t.kind.name.clone()).collect(),
            sprite: resolve_sprite(&self.sprites),
            height: self.height,
            weight: self.weight,
        }
    }

    pub fn into_detail(self, species: &RawSpecies, language: &str) -> EntryDetail {
        let entry = self.to_entry();
        let stats = self
            .stats
            .into_iter()
            .map(|s| Stat {
                name: s.stat.name,
                value: s.base_stat.min(u8::MAX as u32) as u8,
            })
            .collect();
        let abilities = self.abilities.into_iter().map(|a| a.ability.name).collect();

        EntryDetail {
            entry,
            stats,
            abilities,
            description: species.description(language),
        }
    }
}

impl RawSpecies {
    /// First flavor text in `language`, control characters replaced by spaces.
    pub fn description(&self, language: &str) -> String {
        self.flavor_text_entries
            .iter()
            .find(|f| f.language.name == language)
            .map(|f| normalize_flavor_text(&f.flavor_text))
            .unwrap_or_else(|| NO_DESCRIPTION.to_string())
    }
}

// ── Source trait ────────────────────────────────────────────────────────────

/// Where catalog data comes from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the first `limit` index references in one call.
    async fn fetch_index(&self, limit: u32) -> ApiResult<Vec<IndexRef>>;

    /// Fetch one catalog entry through its index reference.
    async fn fetch_entry(&self, reference: &IndexRef) -> ApiResult<Entry>;

    /// Fetch the full detail record for an identifier.
    async fn fetch_detail(&self, id: u32) -> ApiResult<EntryDetail>;
}

// ── HTTP client ─────────────────────────────────────────────────────────────

pub struct PokeApiClient {
    client: Client,
    base_url: String,
    language: String,
}

impl PokeApiClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn fetch_index(&self, limit: u32) -> ApiResult<Vec<IndexRef>> {
        let url = format!("{}/pokemon?limit={limit}", self.base_url);
        let page: IndexPage = self.get_json(&url).await?;
        Ok(page.results)
    }

    async fn fetch_entry(&self, reference: &IndexRef) -> ApiResult<Entry> {
        let raw: RawPokemon = self.get_json(&reference.url).await?;
        Ok(raw.to_entry())
    }

    async fn fetch_detail(&self, id: u32) -> ApiResult<EntryDetail> {
        let pokemon_url = format!("{}/pokemon/{id}", self.base_url);
        let species_url = format!("{}/pokemon-species/{id}", self.base_url);

        let (raw, species) = tokio::try_join!(
            self.get_json::<RawPokemon>(&pokemon_url),
            self.get_json::<RawSpecies>(&species_url),
        )?;

        Ok(raw.into_detail(&species, &self.language))
    }
}
