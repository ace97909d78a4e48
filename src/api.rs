//! PokeAPI client
//!
//! [`Fetcher`] turns listing and detail documents into [`PokemonRecord`]s.
//! The HTTP layer sits behind [`HttpGet`] so page assembly can run against
//! canned responses.

use std::sync::OnceLock;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::state::PokemonRecord;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_SPRITE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{id}.png";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{url} answered with status {status}")]
    NotFound { url: String, status: u16 },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

// ============================================================================
// Transport
// ============================================================================

#[async_trait]
pub trait HttpGet: Send + Sync {
    /// GET `url` and return the body of a successful response.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[async_trait]
impl HttpGet for reqwest::Client {
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NotFound {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}

// ============================================================================
// Endpoints
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    /// Sprite URL with an `{id}` placeholder.
    pub sprite_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            sprite_url: DEFAULT_SPRITE_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn new(api_base: impl Into<String>, sprite_url: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            sprite_url: sprite_url.into(),
        }
    }

    pub fn page_url(&self, limit: usize, offset: usize) -> String {
        format!("{}/pokemon?limit={limit}&offset={offset}", self.api_base)
    }

    pub fn detail_url(&self, identifier: &str) -> String {
        format!("{}/pokemon/{identifier}", self.api_base)
    }

    pub fn sprite_url(&self, id: u32) -> String {
        self.sprite_url.replace("{id}", &id.to_string())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
struct ListEntry {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<ListEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    types: Vec<PokemonTypeSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: TypeName,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeName {
    name: String,
}

impl From<PokemonResponse> for PokemonRecord {
    fn from(response: PokemonResponse) -> Self {
        PokemonRecord {
            id: response.id,
            name: response.name,
            types: response
                .types
                .into_iter()
                .map(|slot| slot.type_info.name)
                .collect(),
        }
    }
}

// ============================================================================
// Fetcher
// ============================================================================

pub struct Fetcher<C = reqwest::Client> {
    client: C,
    endpoints: Endpoints,
}

impl<C: HttpGet> Fetcher<C> {
    pub fn new(client: C, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetch a listing page and every listed detail document.
    ///
    /// Details are requested concurrently and returned in listing order. The
    /// page fails as a unit: if any request fails, no records are returned.
    pub async fn fetch_page(&self, url: &str) -> Result<Vec<PokemonRecord>, FetchError> {
        let listing: ListResponse = self.get_json(url).await.inspect_err(|error| {
            tracing::warn!(%url, %error, "listing fetch failed");
        })?;
        let details = listing
            .results
            .iter()
            .map(|entry| self.fetch_detail(&entry.url));
        let records = try_join_all(details).await.inspect_err(|error| {
            tracing::warn!(%url, %error, "page detail fetch failed");
        })?;
        tracing::debug!(%url, count = records.len(), "page fetched");
        Ok(records)
    }

    /// Fetch one record by name or number, ignoring case and surrounding blanks.
    pub async fn fetch_by_id(&self, identifier: &str) -> Result<PokemonRecord, FetchError> {
        let identifier = identifier.trim().to_lowercase();
        let url = self.endpoints.detail_url(&identifier);
        if identifier.is_empty() {
            return Err(FetchError::NotFound { url, status: 404 });
        }
        self.fetch_detail(&url).await.inspect_err(|error| {
            tracing::warn!(%identifier, %error, "lookup failed");
        })
    }

    pub async fn fetch_sprite(&self, id: u32) -> Result<Vec<u8>, FetchError> {
        let url = self.endpoints.sprite_url(id);
        self.client.get_bytes(&url).await
    }

    async fn fetch_detail(&self, url: &str) -> Result<PokemonRecord, FetchError> {
        let detail: PokemonResponse = self.get_json(url).await?;
        Ok(detail.into())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let bytes = self.client.get_bytes(url).await?;
        serde_json::from_slice(&bytes).map_err(|err| FetchError::Decode(err.to_string()))
    }
}

static FETCHER: OnceLock<Fetcher> = OnceLock::new();

/// Install the process-wide fetcher. Returns `false` if one was already set.
pub fn install(endpoints: Endpoints) -> bool {
    FETCHER
        .set(Fetcher::new(reqwest::Client::new(), endpoints))
        .is_ok()
}

pub fn fetcher() -> &'static Fetcher {
    FETCHER.get_or_init(|| Fetcher::new(reqwest::Client::new(), Endpoints::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_keeps_first_fetcher() {
        let first = Endpoints::new("http://first.test/api", DEFAULT_SPRITE_URL);
        let second = Endpoints::new("http://second.test/api", DEFAULT_SPRITE_URL);

        install(first);

        assert!(!install(second.clone()));
        assert_ne!(fetcher().endpoints(), &second);
    }

    #[test]
    fn test_endpoint_urls() {
        let endpoints = Endpoints::new("http://localhost:9000/api/", "http://img/{id}.png");
        assert_eq!(
            endpoints.page_url(50, 100),
            "http://localhost:9000/api/pokemon?limit=50&offset=100"
        );
        assert_eq!(
            endpoints.detail_url("pikachu"),
            "http://localhost:9000/api/pokemon/pikachu"
        );
        assert_eq!(endpoints.sprite_url(25), "http://img/25.png");
    }

    #[test]
    fn test_detail_normalization() {
        let body = r#"{
            "id": 1,
            "name": "bulbasaur",
            "height": 7,
            "types": [
                {"slot": 1, "type": {"name": "grass", "url": "https://pokeapi.co/api/v2/type/12/"}},
                {"slot": 2, "type": {"name": "poison", "url": "https://pokeapi.co/api/v2/type/4/"}}
            ]
        }"#;
        let response: PokemonResponse = serde_json::from_str(body).unwrap();
        let record = PokemonRecord::from(response);
        assert_eq!(record.id, 1);
        assert_eq!(record.name, "bulbasaur");
        assert_eq!(record.types, vec!["grass", "poison"]);
    }
}
