//! Data model for the notifier service
//!
//! Durable state is the artist table; everything else here lives only for
//! the duration of one workflow run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A monitored artist as persisted in the artist store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRecord {
    /// Catalog id, immutable once created
    pub artist_id: String,
    pub name: String,
    /// Unset until the first successful check
    pub last_known_release_id: Option<String>,
    pub last_known_release_title: Option<String>,
    pub last_known_release_date: Option<String>,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl ArtistRecord {
    /// Create a record for a newly monitored artist
    pub fn new(artist_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            artist_id: artist_id.into(),
            name: name.into(),
            last_known_release_id: None,
            last_known_release_title: None,
            last_known_release_date: None,
            last_checked_at: None,
        }
    }
}

/// Release group kind reported by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    Album,
    Single,
}

impl std::fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseKind::Album => write!(f, "album"),
            ReleaseKind::Single => write!(f, "single"),
        }
    }
}

/// A release fetched from the catalog; not persisted beyond the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub artist_id: String,
    pub artist_name: String,
    pub release_id: String,
    pub release_title: String,
    /// Catalog release date, carried verbatim (precision varies:
    /// "2023", "2023-05", "2023-05-01")
    pub released_on: String,
    pub kind: ReleaseKind,
}

/// Staged per-artist store update produced by the diff engine
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseUpdate {
    pub artist_id: String,
    pub release_id: String,
    pub release_title: String,
    pub released_on: String,
    pub checked_at: DateTime<Utc>,
}

/// Result of scanning the artist store.
///
/// Explicit sum type; the workflow branches on this rather than on a
/// sentinel status code.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanResult {
    Empty,
    Artists(Vec<ArtistRecord>),
}

impl ScanResult {
    pub fn from_records(records: Vec<ArtistRecord>) -> Self {
        if records.is_empty() {
            ScanResult::Empty
        } else {
            ScanResult::Artists(records)
        }
    }
}

/// Workflow step names, used when reporting a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    FetchToken,
    ScanArtists,
    FetchReleases,
    UpdateStore,
    Notify,
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowStep::FetchToken => "fetch_token",
            WorkflowStep::ScanArtists => "scan_artists",
            WorkflowStep::FetchReleases => "fetch_releases",
            WorkflowStep::UpdateStore => "update_store",
            WorkflowStep::Notify => "notify",
        };
        write!(f, "{name}")
    }
}

/// Terminal outcome of one workflow run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkflowOutcome {
    NoArtists,
    NoNewReleases,
    NewReleasesFound { new_releases: Vec<Release> },
    Failed { step: WorkflowStep, reason: String },
}
