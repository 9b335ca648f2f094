//! Spotify Web API catalog.
//!
//! Client-credentials authentication and track search. Exact lookups are
//! verified against the request and cached.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lru::LruCache;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::traits::CatalogSearch;
use crate::config::AppConfig;
use crate::error::{AppError, CatalogError};
use crate::models::ConfirmedTrack;

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/api/token";

/// Tokens are refreshed this long before the server-side expiry
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Ids used in a shareable playlist link
const PLAYLIST_URL_TRACKS: usize = 5;

/// Client id and secret for the client-credentials flow
#[derive(Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl SpotifyCredentials {
    fn basic_auth(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl std::fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistItem>,
    uri: String,
    #[serde(default)]
    external_urls: ExternalUrls,
    preview_url: Option<String>,
    #[serde(default)]
    popularity: u32,
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

impl TrackItem {
    /// Tracks without any artist cannot be shown and are skipped
    fn into_confirmed(self) -> Option<ConfirmedTrack> {
        let artist = self.artists.into_iter().next()?.name;
        let external_url = self
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/track/{}", self.id));

        Some(ConfirmedTrack {
            id: self.id,
            name: self.name,
            artist,
            uri: self.uri,
            external_url,
            preview_url: self.preview_url,
            popularity: self.popularity,
        })
    }
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

type ExactKey = (String, String);

/// [`CatalogSearch`] backed by the Spotify Web API
pub struct SpotifyCatalog {
    http: reqwest::Client,
    api_url: Url,
    auth_url: Url,
    credentials: Option<SpotifyCredentials>,
    token: AsyncMutex<Option<CachedToken>>,
    exact_cache: Mutex<LruCache<ExactKey, Option<ConfirmedTrack>>>,
}

impl SpotifyCatalog {
    const CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(512) {
        Some(size) => size,
        None => panic!("Cache size must be non-zero"),
    };

    pub fn new(
        api_url: Url,
        auth_url: Url,
        credentials: Option<SpotifyCredentials>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("vibecurator/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        if credentials.is_none() {
            warn!("Spotify credentials not configured; catalog lookups will be unavailable");
        }

        Ok(Self {
            http,
            api_url,
            auth_url,
            credentials,
            token: AsyncMutex::new(None),
            exact_cache: Mutex::new(LruCache::new(Self::CACHE_SIZE)),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.spotify_api_url.clone(),
            config.spotify_auth_url.clone(),
            config.spotify_credentials(),
            config.catalog_timeout(),
        )
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Obtain a token now instead of on the first lookup
    pub async fn authenticate(&self) -> Result<(), CatalogError> {
        self.access_token().await.map(|_| ())
    }

    /// Shareable link listing up to five tracks, given as URIs or web links
    pub fn playlist_url(tracks: &[String]) -> Option<String> {
        let ids: Vec<&str> = tracks
            .iter()
            .take(PLAYLIST_URL_TRACKS)
            .filter_map(|t| t.rsplit([':', '/']).next())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            return None;
        }
        Some(format!("https://open.spotify.com/search/{}", ids.join(" ")))
    }

    async fn access_token(&self) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| CatalogError::Unavailable("Spotify credentials not configured".to_string()))?;

        debug!(url = %self.auth_url, "Requesting Spotify access token");
        let response = self
            .http
            .post(self.auth_url.clone())
            .header(reqwest::header::AUTHORIZATION, credentials.basic_auth())
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Unavailable(format!(
                "authentication failed with status {}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("invalid token response: {}", e)))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        info!("Spotify access token obtained (valid {}s)", token.expires_in);

        Ok(token.access_token)
    }

    async fn drop_token(&self) {
        *self.token.lock().await = None;
    }

    /// Run a track search and map the response to confirmed tracks
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ConfirmedTrack>, CatalogError> {
        let token = self.access_token().await?;
        let url = format!("{}/search", self.api_url.as_str().trim_end_matches('/'));
        let limit = limit.to_string();

        debug!(query = %query, limit = %limit, "Searching Spotify");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("q", query),
                ("type", "track"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            self.drop_token().await;
            return Err(CatalogError::Unavailable(format!(
                "search rejected with status {}",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(CatalogError::Transient(format!(
                "search failed with status {}",
                status.as_u16()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Transient(format!("invalid search response: {}", e)))?;

        Ok(body
            .tracks
            .map(|page| page.items)
            .unwrap_or_default()
            .into_iter()
            .filter_map(TrackItem::into_confirmed)
            .collect())
    }

    fn cached_exact(&self, key: &ExactKey) -> Option<Option<ConfirmedTrack>> {
        let mut cache = self.exact_cache.lock().ok()?;
        cache.get(key).cloned()
    }

    fn remember_exact(&self, key: ExactKey, value: Option<ConfirmedTrack>) {
        if let Ok(mut cache) = self.exact_cache.lock() {
            cache.put(key, value);
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> CatalogError {
    if err.is_connect() {
        CatalogError::Unavailable(format!("cannot reach Spotify: {}", err))
    } else {
        CatalogError::Transient(format!("request failed: {}", err))
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', ""))
}

#[async_trait]
impl CatalogSearch for SpotifyCatalog {
    #[instrument(skip(self))]
    async fn find_exact(&self, artist: &str, title: &str) -> Result<Option<ConfirmedTrack>, CatalogError> {
        let key = (artist.to_lowercase(), title.to_lowercase());
        if let Some(hit) = self.cached_exact(&key) {
            debug!("Exact lookup served from cache");
            return Ok(hit);
        }

        let query = format!("artist:{} track:{}", quoted(artist), quoted(title));
        let found = self
            .search(&query, 1)
            .await?
            .into_iter()
            .next()
            .filter(|track| track.artist.to_lowercase() == key.0 && track.name.to_lowercase() == key.1);

        self.remember_exact(key, found.clone());
        Ok(found)
    }

    #[instrument(skip(self))]
    async fn find_by_artist(&self, artist: &str, limit: usize) -> Result<Vec<ConfirmedTrack>, CatalogError> {
        self.search(&format!("artist:{}", quoted(artist)), limit).await
    }

    #[instrument(skip(self))]
    async fn find_by_genre(&self, genre: &str, limit: usize) -> Result<Vec<ConfirmedTrack>, CatalogError> {
        self.search(&format!("genre:{}", quoted(genre)), limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn track_json(id: &str, artist: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "artists": [{ "name": artist }],
            "uri": format!("spotify:track:{}", id),
            "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", id) },
            "preview_url": null,
            "popularity": 64
        })
    }

    fn search_body(tracks: Vec<serde_json::Value>) -> serde_json::Value {
        json!({ "tracks": { "items": tracks } })
    }

    fn catalog_for(server: &MockServer, credentials: bool) -> SpotifyCatalog {
        let api = Url::parse(&format!("{}/v1", server.uri())).unwrap();
        let auth = Url::parse(&format!("{}/api/token", server.uri())).unwrap();
        let credentials = credentials.then(|| SpotifyCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        });
        SpotifyCatalog::new(api, auth, credentials, Duration::from_secs(2)).unwrap()
    }

    async fn mount_token(server: &MockServer) {
        // base64("id:secret")
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(header("authorization", "Basic aWQ6c2VjcmV0"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_exact_match_found() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(header("authorization", "Bearer tok"))
            .and(query_param("q", "artist:\"Daft Punk\" track:\"Aerodynamic\""))
            .and(query_param("type", "track"))
            .and(query_param("limit", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(search_body(vec![track_json("t1", "Daft Punk", "Aerodynamic")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let catalog = catalog_for(&server, true);
        let found = catalog.find_exact("Daft Punk", "Aerodynamic").await.unwrap();
        let track = found.expect("track should be confirmed");
        assert_eq!(track.id, "t1");
        assert_eq!(track.uri, "spotify:track:t1");

        // Second lookup is served from the cache (expect(1) above)
        let again = catalog.find_exact("daft punk", "AERODYNAMIC").await.unwrap();
        assert_eq!(again.map(|t| t.id), Some("t1".to_string()));
    }

    #[tokio::test]
    async fn test_exact_match_rejects_different_title() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(search_body(vec![track_json("t2", "Miles Davis", "So What")])),
            )
            .mount(&server)
            .await;

        let catalog = catalog_for(&server, true);
        let found = catalog.find_exact("Miles Davis", "Moderate Bright Jazz").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_artist_and_genre_queries() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "artist:\"Bonobo\""))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![
                track_json("b1", "Bonobo", "Kiara"),
                track_json("b2", "Bonobo", "Kong"),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "genre:\"lo-fi\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let catalog = catalog_for(&server, true);
        let tracks = catalog.find_by_artist("Bonobo", 3).await.unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].name, "Kong");

        let tracks = catalog.find_by_genre("lo-fi", 3).await.unwrap();
        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(query_param("q", "artist:\"limited\""))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "artist:\"broken\""))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "artist:\"denied\""))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let catalog = catalog_for(&server, true);
        assert!(matches!(
            catalog.find_by_artist("limited", 3).await,
            Err(CatalogError::Transient(_))
        ));
        assert!(matches!(
            catalog.find_by_artist("broken", 3).await,
            Err(CatalogError::Transient(_))
        ));
        assert!(matches!(
            catalog.find_by_artist("denied", 3).await,
            Err(CatalogError::Unavailable(_))
        ));
        // The rejected token was dropped
        assert!(catalog.token.lock().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_credentials_is_unavailable() {
        let server = MockServer::start().await;
        let catalog = catalog_for(&server, false);

        assert!(!catalog.has_credentials());
        assert!(matches!(
            catalog.find_exact("a", "b").await,
            Err(CatalogError::Unavailable(_))
        ));
        assert!(catalog.authenticate().await.is_err());
    }

    #[tokio::test]
    async fn test_token_failure_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})))
            .mount(&server)
            .await;

        let catalog = catalog_for(&server, true);
        assert!(matches!(
            catalog.authenticate().await,
            Err(CatalogError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        let api = Url::parse("http://127.0.0.1:9/v1").unwrap();
        let auth = Url::parse("http://127.0.0.1:9/api/token").unwrap();
        let catalog = SpotifyCatalog::new(
            api,
            auth,
            Some(SpotifyCredentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
            }),
            Duration::from_secs(2),
        )
        .unwrap();

        assert!(matches!(
            catalog.find_by_genre("jazz", 3).await,
            Err(CatalogError::Unavailable(_))
        ));
    }

    #[test]
    fn test_playlist_url() {
        let uris: Vec<String> = (1..=7).map(|i| format!("spotify:track:id{}", i)).collect();
        assert_eq!(
            SpotifyCatalog::playlist_url(&uris).as_deref(),
            Some("https://open.spotify.com/search/id1 id2 id3 id4 id5")
        );
        let links = vec!["https://open.spotify.com/track/abc".to_string()];
        assert_eq!(
            SpotifyCatalog::playlist_url(&links).as_deref(),
            Some("https://open.spotify.com/search/abc")
        );
        assert_eq!(SpotifyCatalog::playlist_url(&[]), None);
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = SpotifyCredentials {
            client_id: "id".into(),
            client_secret: "hunter2".into(),
        };
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
