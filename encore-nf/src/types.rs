//! Collaborator traits for the workflow seams
//!
//! The orchestrator is written against these traits so tests can drive it
//! with fakes that record call order. Production wiring uses the SQLite
//! store, the catalog client, and the webhook channel.

use async_trait::async_trait;

use crate::models::{ArtistRecord, Release, ReleaseUpdate};
use crate::services::catalog::FetchError;
use crate::services::notifier::{ChannelError, Message};
use crate::services::token_provider::TokenError;

/// Short-lived credential for the catalog API
#[derive(Debug, Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

/// Supplies a short-lived access credential for the catalog API.
/// Acquisition failure is fatal to a workflow run.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn get_access_token(&self) -> Result<AccessToken, TokenError>;
}

/// Durable key-value store of monitored artists.
///
/// `scan` returns records in stable insertion order; `apply_update` is an
/// independent, idempotent per-artist upsert.
#[async_trait]
pub trait ArtistStore: Send + Sync {
    async fn scan(&self) -> encore_common::Result<Vec<ArtistRecord>>;
    async fn apply_update(&self, update: &ReleaseUpdate) -> encore_common::Result<()>;
}

/// Queries the external catalog for an artist's most recent release.
///
/// `Ok(None)` means the artist has no releases; errors are isolated per
/// artist by the caller and never abort a run.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn latest_release(
        &self,
        token: &AccessToken,
        artist: &ArtistRecord,
    ) -> Result<Option<Release>, FetchError>;
}

/// Outbound messaging channel. Fan-out to subscribers is the channel's
/// concern; delivery failure is reported, not retried here.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    async fn publish(&self, message: &Message) -> Result<(), ChannelError>;
}
