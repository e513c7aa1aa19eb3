//! Music catalog API client
//!
//! Fetches an artist's most recent release and backs the artist search
//! endpoint. Requests are rate limited to stay under the catalog's
//! per-client quota.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::{ArtistRecord, Release, ReleaseKind};
use crate::types::{AccessToken, ReleaseSource};
use async_trait::async_trait;
use encore_common::config::CatalogConfig;

const RATE_LIMIT_MS: u64 = 250;

/// Catalog client errors
#[derive(Debug, Error)]
pub enum FetchError {
    /// Artist id no longer resolvable upstream
    #[error("artist not found upstream: {0}")]
    NotFound(String),

    /// Network failure, rate limiting, or upstream 5xx
    #[error("transient upstream error: {0}")]
    Transient(String),

    #[error("catalog API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed catalog response: {0}")]
    Parse(String),
}

/// Artist search hit (backs POST /artist/id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistMatch {
    pub artist_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumsPage {
    items: Vec<AlbumItem>,
}

#[derive(Debug, Deserialize)]
struct AlbumItem {
    id: String,
    name: String,
    release_date: Option<String>,
    album_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    artists: SearchArtists,
}

#[derive(Debug, Deserialize)]
struct SearchArtists {
    items: Vec<SearchArtistItem>,
}

#[derive(Debug, Deserialize)]
struct SearchArtistItem {
    id: String,
    name: String,
}

/// Minimum-interval rate limiter shared across requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Catalog API client
pub struct CatalogClient {
    http: reqwest::Client,
    api_base_url: String,
    market: String,
    rate_limiter: RateLimiter,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            market: config.market.clone(),
            rate_limiter: RateLimiter::new(RATE_LIMIT_MS),
        })
    }

    /// Search the catalog for artists by name (backs POST /artist/id)
    pub async fn search_artist(
        &self,
        token: &AccessToken,
        name: &str,
    ) -> Result<Vec<ArtistMatch>, FetchError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/search", self.api_base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", name),
                ("type", "artist"),
                ("limit", "5"),
                ("offset", "0"),
                ("market", &self.market),
            ])
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        let page: SearchPage = check_status(response, name)
            .await?
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(page
            .artists
            .items
            .into_iter()
            .map(|item| ArtistMatch {
                artist_id: item.id,
                name: item.name,
            })
            .collect())
    }
}

#[async_trait]
impl ReleaseSource for CatalogClient {
    /// Fetch the artist's most recent release (album or single, newest wins)
    async fn latest_release(
        &self,
        token: &AccessToken,
        artist: &ArtistRecord,
    ) -> Result<Option<Release>, FetchError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/artists/{}/albums", self.api_base_url, artist.artist_id);
        tracing::debug!(artist_id = %artist.artist_id, "Fetching latest release");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("limit", "1"),
                ("offset", "0"),
                ("include_groups", "album,single"),
                ("market", &self.market),
            ])
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        let page: AlbumsPage = check_status(response, &artist.artist_id)
            .await?
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        let Some(item) = page.items.into_iter().next() else {
            tracing::warn!(artist_id = %artist.artist_id, "No releases found for {}", artist.name);
            return Ok(None);
        };

        let kind = match item.album_type.as_deref() {
            Some("single") => ReleaseKind::Single,
            _ => ReleaseKind::Album,
        };

        Ok(Some(Release {
            artist_id: artist.artist_id.clone(),
            artist_name: artist.name.clone(),
            release_id: item.id,
            release_title: item.name,
            released_on: item.release_date.unwrap_or_default(),
            kind,
        }))
    }
}

/// Map HTTP status to the fetch error taxonomy
async fn check_status(
    response: reqwest::Response,
    subject: &str,
) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    if status.as_u16() == 404 {
        Err(FetchError::NotFound(subject.to_string()))
    } else if status.as_u16() == 429 || status.is_server_error() {
        Err(FetchError::Transient(format!("{status}: {message}")))
    } else {
        Err(FetchError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
