//! Artist store integration tests against in-memory SQLite

use chrono::Utc;
use sqlx::SqlitePool;

use encore_nf::db::artists as store;
use encore_nf::models::ReleaseUpdate;

async fn test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    encore_common::db::create_schema(&pool).await.unwrap();
    pool
}

#[tokio::test]
async fn scan_of_empty_store_is_empty() {
    let pool = test_pool().await;
    let artists = store::scan_artists(&pool).await.unwrap();
    assert!(artists.is_empty());
}

#[tokio::test]
async fn add_and_scan_preserves_insertion_order() {
    let pool = test_pool().await;
    store::add_artist(&pool, "A3", "Third").await.unwrap();
    store::add_artist(&pool, "A1", "First").await.unwrap();
    store::add_artist(&pool, "A2", "Second").await.unwrap();

    let artists = store::scan_artists(&pool).await.unwrap();
    let ids: Vec<_> = artists.iter().map(|a| a.artist_id.as_str()).collect();
    assert_eq!(ids, vec!["A3", "A1", "A2"]);

    // New records carry no release state yet
    assert!(artists[0].last_known_release_id.is_none());
    assert!(artists[0].last_checked_at.is_none());
}

#[tokio::test]
async fn add_is_idempotent_on_artist_id() {
    let pool = test_pool().await;
    store::add_artist(&pool, "A1", "Old Name").await.unwrap();
    store::add_artist(&pool, "A1", "New Name").await.unwrap();

    let artists = store::scan_artists(&pool).await.unwrap();
    assert_eq!(artists.len(), 1);
    assert_eq!(artists[0].name, "New Name");
}

#[tokio::test]
async fn remove_deletes_the_record() {
    let pool = test_pool().await;
    store::add_artist(&pool, "A1", "One").await.unwrap();
    store::remove_artist(&pool, "A1").await.unwrap();

    assert!(store::get_artist(&pool, "A1").await.unwrap().is_none());
}

#[tokio::test]
async fn remove_of_unknown_artist_is_not_found() {
    let pool = test_pool().await;
    let err = store::remove_artist(&pool, "missing").await.unwrap_err();
    assert!(matches!(err, encore_common::Error::NotFound(_)));
}

#[tokio::test]
async fn apply_release_update_round_trips() {
    let pool = test_pool().await;
    store::add_artist(&pool, "A1", "One").await.unwrap();

    let checked_at = Utc::now();
    let update = ReleaseUpdate {
        artist_id: "A1".to_string(),
        release_id: "R9".to_string(),
        release_title: "Nine".to_string(),
        released_on: "2026-08-21".to_string(),
        checked_at,
    };
    store::apply_release_update(&pool, &update).await.unwrap();

    let record = store::get_artist(&pool, "A1").await.unwrap().unwrap();
    assert_eq!(record.last_known_release_id, Some("R9".to_string()));
    assert_eq!(record.last_known_release_title, Some("Nine".to_string()));
    assert_eq!(record.last_known_release_date, Some("2026-08-21".to_string()));
    // RFC 3339 round-trip keeps the instant
    assert_eq!(record.last_checked_at.unwrap(), checked_at);
}

#[tokio::test]
async fn apply_update_for_removed_artist_is_a_no_op() {
    let pool = test_pool().await;

    let update = ReleaseUpdate {
        artist_id: "gone".to_string(),
        release_id: "R1".to_string(),
        release_title: "One".to_string(),
        released_on: "2026-01-01".to_string(),
        checked_at: Utc::now(),
    };
    // Artist removed between scan and update: no error, nothing persisted
    store::apply_release_update(&pool, &update).await.unwrap();
    assert!(store::get_artist(&pool, "gone").await.unwrap().is_none());
}
