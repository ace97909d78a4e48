//! Page assembly and lookup against canned HTTP responses.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pokedex::api::{Endpoints, FetchError, Fetcher, HttpGet};
use pretty_assertions::assert_eq;

const BASE: &str = "http://dex.test/api/v2";

/// Serves bodies from a URL map; unknown URLs answer 404.
#[derive(Default)]
struct CannedHttp {
    bodies: HashMap<String, Result<String, FetchError>>,
    requested: Mutex<Vec<String>>,
}

impl CannedHttp {
    fn body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    fn failure(mut self, url: &str, error: FetchError) -> Self {
        self.bodies.insert(url.to_string(), Err(error));
        self
    }

    fn with_pokemon(self, id: u32, name: &str, types: &[&str]) -> Self {
        let slots: Vec<String> = types
            .iter()
            .enumerate()
            .map(|(slot, name)| {
                format!(r#"{{"slot":{},"type":{{"name":"{name}","url":"x"}}}}"#, slot + 1)
            })
            .collect();
        let body = format!(
            r#"{{"id":{id},"name":"{name}","height":4,"types":[{}]}}"#,
            slots.join(",")
        );
        self.body(&format!("{BASE}/pokemon/{id}"), &body)
            .body(&format!("{BASE}/pokemon/{name}"), &body)
    }

    fn with_listing(self, limit: usize, offset: usize, ids: &[u32]) -> Self {
        let results: Vec<String> = ids
            .iter()
            .map(|id| format!(r#"{{"name":"mon-{id}","url":"{BASE}/pokemon/{id}"}}"#))
            .collect();
        let body = format!(
            r#"{{"count":1302,"next":null,"previous":null,"results":[{}]}}"#,
            results.join(",")
        );
        self.body(&format!("{BASE}/pokemon?limit={limit}&offset={offset}"), &body)
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().map(|urls| urls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HttpGet for CannedHttp {
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Ok(mut urls) = self.requested.lock() {
            urls.push(url.to_string());
        }
        match self.bodies.get(url) {
            Some(Ok(body)) => Ok(body.clone().into_bytes()),
            Some(Err(error)) => Err(error.clone()),
            None => Err(FetchError::NotFound {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

fn fetcher(http: CannedHttp) -> Fetcher<CannedHttp> {
    Fetcher::new(http, Endpoints::new(BASE, "http://dex.test/sprites/{id}.png"))
}

fn starters() -> CannedHttp {
    CannedHttp::default()
        .with_listing(3, 0, &[1, 4, 7])
        .with_pokemon(1, "bulbasaur", &["grass", "poison"])
        .with_pokemon(4, "charmander", &["fire"])
        .with_pokemon(7, "squirtle", &["water"])
}

#[tokio::test]
async fn test_page_keeps_listing_order() {
    let fetcher = fetcher(starters());
    let url = fetcher.endpoints().page_url(3, 0);

    let records = fetcher.fetch_page(&url).await.unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["bulbasaur", "charmander", "squirtle"]);
    assert_eq!(records[0].types, vec!["grass", "poison"]);
}

#[tokio::test]
async fn test_page_fails_as_a_unit() {
    let http = starters().failure(
        &format!("{BASE}/pokemon/4"),
        FetchError::Transport("connection reset".into()),
    );
    let fetcher = fetcher(http);
    let url = fetcher.endpoints().page_url(3, 0);

    let result = fetcher.fetch_page(&url).await;

    assert_eq!(
        result,
        Err(FetchError::Transport("connection reset".into()))
    );
}

#[tokio::test]
async fn test_listing_decode_error() {
    let http = CannedHttp::default().body(&format!("{BASE}/pokemon?limit=3&offset=0"), "<html>");
    let fetcher = fetcher(http);

    let result = fetcher.fetch_page(&fetcher.endpoints().page_url(3, 0)).await;

    assert!(matches!(result, Err(FetchError::Decode(_))));
}

#[tokio::test]
async fn test_lookup_by_number() {
    let fetcher = fetcher(starters().with_pokemon(25, "pikachu", &["electric"]));

    let record = fetcher.fetch_by_id("25").await.unwrap();

    assert_eq!(record.id, 25);
    assert_eq!(record.name, "pikachu");
    assert_eq!(record.types, vec!["electric"]);
}

#[tokio::test]
async fn test_lookup_ignores_case_and_blanks() {
    let fetcher = fetcher(starters().with_pokemon(25, "pikachu", &["electric"]));

    let record = fetcher.fetch_by_id("  PiKaChU ").await.unwrap();

    assert_eq!(record.id, 25);
    assert!(fetcher
        .client()
        .requested()
        .contains(&format!("{BASE}/pokemon/pikachu")));
}

#[tokio::test]
async fn test_lookup_unknown_is_not_found() {
    let fetcher = fetcher(starters());

    let error = fetcher.fetch_by_id("99999").await.unwrap_err();

    assert!(error.is_not_found());
}

#[tokio::test]
async fn test_blank_lookup_makes_no_request() {
    let fetcher = fetcher(starters());

    let error = fetcher.fetch_by_id("   ").await.unwrap_err();

    assert!(error.is_not_found());
    assert!(fetcher.client().requested().is_empty());
}

#[tokio::test]
async fn test_sprite_uses_template() {
    let http = CannedHttp::default().body("http://dex.test/sprites/25.png", "png-bytes");
    let fetcher = fetcher(http);

    let bytes = fetcher.fetch_sprite(25).await.unwrap();

    assert_eq!(bytes, b"png-bytes".to_vec());
}
