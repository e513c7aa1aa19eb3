//! Diff engine
//!
//! Compares freshly fetched releases against the stored
//! `last_known_release_id` per artist and produces the delta. Pure logic;
//! store writes happen in the orchestrator's update step.

use chrono::{DateTime, Utc};

use crate::models::{ArtistRecord, Release, ReleaseUpdate};

/// Delta computed for one workflow run.
///
/// `updates` and `new_releases` are parallel: one staged store update per
/// newly discovered release. Both preserve scan order.
#[derive(Debug, Clone, Default)]
pub struct ReleaseDelta {
    pub updates: Vec<ReleaseUpdate>,
    pub new_releases: Vec<Release>,
}

impl ReleaseDelta {
    pub fn is_empty(&self) -> bool {
        self.new_releases.is_empty()
    }
}

/// Compute the delta for a run.
///
/// `checked` pairs each scanned artist with its fetched release, in scan
/// order. Artists with no fetched release this run (isolated fetch failure
/// or an empty discography) are left unmodified and excluded. A release
/// counts as new when its id differs from the stored one, or when no
/// release was ever recorded for the artist.
pub fn diff_releases(
    checked: &[(ArtistRecord, Option<Release>)],
    now: DateTime<Utc>,
) -> ReleaseDelta {
    let mut delta = ReleaseDelta::default();

    for (artist, fetched) in checked {
        let Some(release) = fetched else {
            continue;
        };

        if artist.last_known_release_id.as_deref() == Some(release.release_id.as_str()) {
            tracing::debug!(artist_id = %artist.artist_id, "No change for {}", artist.name);
            continue;
        }

        tracing::debug!(
            artist_id = %artist.artist_id,
            release_id = %release.release_id,
            "New release for {}",
            artist.name
        );
        delta.updates.push(ReleaseUpdate {
            artist_id: artist.artist_id.clone(),
            release_id: release.release_id.clone(),
            release_title: release.release_title.clone(),
            released_on: release.released_on.clone(),
            checked_at: now,
        });
        delta.new_releases.push(release.clone());
    }

    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReleaseKind;

    fn artist(id: &str, last_known: Option<&str>) -> ArtistRecord {
        ArtistRecord {
            artist_id: id.to_string(),
            name: format!("Artist {id}"),
            last_known_release_id: last_known.map(str::to_string),
            last_known_release_title: None,
            last_known_release_date: None,
            last_checked_at: None,
        }
    }

    fn release(artist_id: &str, release_id: &str) -> Release {
        Release {
            artist_id: artist_id.to_string(),
            artist_name: format!("Artist {artist_id}"),
            release_id: release_id.to_string(),
            release_title: format!("Title {release_id}"),
            released_on: "2026-08-21".to_string(),
            kind: ReleaseKind::Album,
        }
    }

    #[test]
    fn unchanged_release_produces_no_delta() {
        let checked = vec![(artist("A1", Some("R1")), Some(release("A1", "R1")))];
        let delta = diff_releases(&checked, Utc::now());
        assert!(delta.is_empty());
        assert!(delta.updates.is_empty());
    }

    #[test]
    fn changed_release_is_emitted_with_update() {
        let now = Utc::now();
        let checked = vec![
            (artist("A1", Some("R1")), Some(release("A1", "R1"))),
            (artist("A2", Some("R5")), Some(release("A2", "R9"))),
        ];
        let delta = diff_releases(&checked, now);

        assert_eq!(delta.new_releases.len(), 1);
        assert_eq!(delta.new_releases[0].artist_id, "A2");
        assert_eq!(delta.new_releases[0].release_id, "R9");

        assert_eq!(delta.updates.len(), 1);
        assert_eq!(delta.updates[0].artist_id, "A2");
        assert_eq!(delta.updates[0].release_id, "R9");
        assert_eq!(delta.updates[0].checked_at, now);
    }

    #[test]
    fn unset_last_known_counts_as_new() {
        let checked = vec![(artist("A1", None), Some(release("A1", "R1")))];
        let delta = diff_releases(&checked, Utc::now());
        assert_eq!(delta.new_releases.len(), 1);
    }

    #[test]
    fn missing_fetch_result_is_skipped() {
        let checked = vec![
            (artist("A1", Some("R1")), None),
            (artist("A2", None), Some(release("A2", "R2"))),
        ];
        let delta = diff_releases(&checked, Utc::now());
        assert_eq!(delta.new_releases.len(), 1);
        assert_eq!(delta.new_releases[0].artist_id, "A2");
    }

    #[test]
    fn delta_preserves_scan_order() {
        let checked = vec![
            (artist("A3", None), Some(release("A3", "R3"))),
            (artist("A1", None), Some(release("A1", "R1"))),
            (artist("A2", None), Some(release("A2", "R2"))),
        ];
        let delta = diff_releases(&checked, Utc::now());
        let order: Vec<_> = delta
            .new_releases
            .iter()
            .map(|r| r.artist_id.as_str())
            .collect();
        assert_eq!(order, vec!["A3", "A1", "A2"]);
    }
}
