//! Artist store operations
//!
//! Free functions over the shared pool, plus [`SqliteArtistStore`], the
//! production [`ArtistStore`] used by the workflow orchestrator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use encore_common::{Error, Result};
use sqlx::{Row, SqlitePool};

use crate::models::{ArtistRecord, ReleaseUpdate};
use crate::types::ArtistStore;

/// List all monitored artists in insertion order.
///
/// Order is stable (rowid) so notification content is deterministic.
pub async fn scan_artists(pool: &SqlitePool) -> Result<Vec<ArtistRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT artist_id, name, last_known_release_id, last_known_release_title,
               last_known_release_date, last_checked_at
        FROM artists
        ORDER BY rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(record_from_row).collect()
}

/// Load one artist by id
pub async fn get_artist(pool: &SqlitePool, artist_id: &str) -> Result<Option<ArtistRecord>> {
    let row = sqlx::query(
        r#"
        SELECT artist_id, name, last_known_release_id, last_known_release_title,
               last_known_release_date, last_checked_at
        FROM artists
        WHERE artist_id = ?
        "#,
    )
    .bind(artist_id)
    .fetch_optional(pool)
    .await?;

    row.map(record_from_row).transpose()
}

/// Add an artist to the monitored set (idempotent on artist_id)
pub async fn add_artist(pool: &SqlitePool, artist_id: &str, name: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO artists (artist_id, name)
        VALUES (?, ?)
        ON CONFLICT(artist_id) DO UPDATE SET
            name = excluded.name,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(artist_id)
    .bind(name)
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove an artist from the monitored set
pub async fn remove_artist(pool: &SqlitePool, artist_id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM artists WHERE artist_id = ?")
        .bind(artist_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("artist {artist_id}")));
    }

    Ok(())
}

/// Apply one staged release update.
///
/// Independent per-artist write; replaying the same update is a no-op
/// beyond refreshing timestamps.
pub async fn apply_release_update(pool: &SqlitePool, update: &ReleaseUpdate) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE artists SET
            last_known_release_id = ?,
            last_known_release_title = ?,
            last_known_release_date = ?,
            last_checked_at = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE artist_id = ?
        "#,
    )
    .bind(&update.release_id)
    .bind(&update.release_title)
    .bind(&update.released_on)
    .bind(update.checked_at.to_rfc3339())
    .bind(&update.artist_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        // Artist was removed between scan and update; nothing to persist
        tracing::warn!(artist_id = %update.artist_id, "Update skipped, artist no longer in store");
    }

    Ok(())
}

fn record_from_row(row: sqlx::sqlite::SqliteRow) -> Result<ArtistRecord> {
    let last_checked_at: Option<String> = row.get("last_checked_at");
    let last_checked_at = last_checked_at
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::Internal(format!("bad last_checked_at: {e}")))
        })
        .transpose()?;

    Ok(ArtistRecord {
        artist_id: row.get("artist_id"),
        name: row.get("name"),
        last_known_release_id: row.get("last_known_release_id"),
        last_known_release_title: row.get("last_known_release_title"),
        last_known_release_date: row.get("last_known_release_date"),
        last_checked_at,
    })
}

/// SQLite-backed [`ArtistStore`]
#[derive(Clone)]
pub struct SqliteArtistStore {
    pool: SqlitePool,
}

impl SqliteArtistStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtistStore for SqliteArtistStore {
    async fn scan(&self) -> Result<Vec<ArtistRecord>> {
        scan_artists(&self.pool).await
    }

    async fn apply_update(&self, update: &ReleaseUpdate) -> Result<()> {
        apply_release_update(&self.pool, update).await
    }
}
