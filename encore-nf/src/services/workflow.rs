//! Workflow orchestrator
//!
//! Runs the notification pipeline:
//! fetch token → scan artists → branch on the scan result:
//! - empty store → publish the "no artists" message
//! - otherwise → fetch releases per artist → diff → apply store updates →
//!   publish results
//!
//! Each run terminates in exactly one [`WorkflowOutcome`]. Step failures
//! (token, store) abort the run; per-artist fetch failures are isolated and
//! never do. Store updates are acknowledged before the notifier is invoked,
//! so a retried run cannot re-notify releases it already persisted.

use chrono::Utc;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::models::{ArtistRecord, Release, ScanResult, WorkflowOutcome, WorkflowStep};
use crate::services::catalog::FetchError;
use crate::services::diff_engine::diff_releases;
use crate::services::notifier::{
    new_releases_message, no_artists_message, no_new_releases_message, Message,
};
use crate::types::{AccessToken, AccessTokenProvider, ArtistStore, MessageChannel, ReleaseSource};

/// A step-level failure that terminates the run
#[derive(Debug)]
struct StepFailure {
    step: WorkflowStep,
    reason: String,
}

/// Orchestrates one notification workflow run over its collaborators
pub struct WorkflowOrchestrator {
    tokens: Arc<dyn AccessTokenProvider>,
    store: Arc<dyn ArtistStore>,
    source: Arc<dyn ReleaseSource>,
    channel: Arc<dyn MessageChannel>,
    step_timeout: Duration,
}

impl WorkflowOrchestrator {
    pub fn new(
        tokens: Arc<dyn AccessTokenProvider>,
        store: Arc<dyn ArtistStore>,
        source: Arc<dyn ReleaseSource>,
        channel: Arc<dyn MessageChannel>,
        step_timeout: Duration,
    ) -> Self {
        Self {
            tokens,
            store,
            source,
            channel,
            step_timeout,
        }
    }

    /// Execute one run to its terminal outcome
    pub async fn run(&self) -> WorkflowOutcome {
        let run_id = Uuid::new_v4();
        tracing::info!(run_id = %run_id, "Workflow run started");

        let outcome = match self.execute(run_id).await {
            Ok(outcome) => outcome,
            Err(failure) => {
                tracing::error!(
                    run_id = %run_id,
                    step = %failure.step,
                    "Workflow run failed: {}",
                    failure.reason
                );
                WorkflowOutcome::Failed {
                    step: failure.step,
                    reason: failure.reason,
                }
            }
        };

        tracing::info!(run_id = %run_id, "Workflow run finished: {}", outcome_label(&outcome));
        outcome
    }

    async fn execute(&self, run_id: Uuid) -> Result<WorkflowOutcome, StepFailure> {
        let token = self
            .step(WorkflowStep::FetchToken, self.tokens.get_access_token())
            .await?;

        let records = self
            .step(WorkflowStep::ScanArtists, self.store.scan())
            .await?;

        let artists = match ScanResult::from_records(records) {
            ScanResult::Empty => {
                tracing::info!(run_id = %run_id, "No artists currently monitored");
                self.notify(run_id, &no_artists_message()).await;
                return Ok(WorkflowOutcome::NoArtists);
            }
            ScanResult::Artists(artists) => artists,
        };

        let checked = self
            .step(WorkflowStep::FetchReleases, async {
                Ok::<_, Infallible>(self.fetch_all(run_id, &token, artists).await)
            })
            .await?;

        let delta = diff_releases(&checked, Utc::now());

        if delta.is_empty() {
            tracing::info!(run_id = %run_id, "No new releases this run");
            self.notify(run_id, &no_new_releases_message()).await;
            return Ok(WorkflowOutcome::NoNewReleases);
        }

        // Update-then-notify ordering is mandatory: every write must be
        // acknowledged before the message goes out. No rollback on partial
        // failure; each upsert is independently idempotent.
        self.step(WorkflowStep::UpdateStore, async {
            for update in &delta.updates {
                self.store.apply_update(update).await?;
            }
            Ok::<_, encore_common::Error>(())
        })
        .await?;

        tracing::info!(
            run_id = %run_id,
            count = delta.new_releases.len(),
            "New releases found"
        );
        self.notify(run_id, &new_releases_message(&delta.new_releases))
            .await;

        Ok(WorkflowOutcome::NewReleasesFound {
            new_releases: delta.new_releases,
        })
    }

    /// Fetch the latest release for every artist, in scan order.
    ///
    /// A single artist's failure must not prevent the rest of the run:
    /// transient errors and upstream not-found are logged and yield `None`
    /// for that artist.
    async fn fetch_all(
        &self,
        run_id: Uuid,
        token: &AccessToken,
        artists: Vec<ArtistRecord>,
    ) -> Vec<(ArtistRecord, Option<Release>)> {
        let mut checked = Vec::with_capacity(artists.len());

        for artist in artists {
            let fetched = match self.source.latest_release(token, &artist).await {
                Ok(release) => release,
                Err(FetchError::NotFound(_)) => {
                    // Record kept; removal is an explicit user action
                    tracing::warn!(
                        run_id = %run_id,
                        artist_id = %artist.artist_id,
                        "Artist no longer resolvable upstream: {}",
                        artist.name
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!(
                        run_id = %run_id,
                        artist_id = %artist.artist_id,
                        "Fetch failed for {}, skipping this run: {e}",
                        artist.name
                    );
                    None
                }
            };
            checked.push((artist, fetched));
        }

        checked
    }

    /// Publish a message. Delivery failure is reported, not retried, and
    /// leaves the run otherwise successful.
    async fn notify(&self, run_id: Uuid, message: &Message) {
        match tokio::time::timeout(self.step_timeout, self.channel.publish(message)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(run_id = %run_id, "Notification delivery failed: {e}");
            }
            Err(_) => {
                tracing::warn!(
                    run_id = %run_id,
                    "Notification delivery timed out after {:?}",
                    self.step_timeout
                );
            }
        }
    }

    /// Run a fallible step under the configured timeout
    async fn step<T, E>(
        &self,
        step: WorkflowStep,
        fut: impl Future<Output = Result<T, E>>,
    ) -> Result<T, StepFailure>
    where
        E: std::fmt::Display,
    {
        match tokio::time::timeout(self.step_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(StepFailure {
                step,
                reason: e.to_string(),
            }),
            Err(_) => Err(StepFailure {
                step,
                reason: format!("timed out after {:?}", self.step_timeout),
            }),
        }
    }
}

fn outcome_label(outcome: &WorkflowOutcome) -> &'static str {
    match outcome {
        WorkflowOutcome::NoArtists => "no_artists",
        WorkflowOutcome::NoNewReleases => "no_new_releases",
        WorkflowOutcome::NewReleasesFound { .. } => "new_releases_found",
        WorkflowOutcome::Failed { .. } => "failed",
    }
}

/// Run the workflow with the production collaborators from [`AppState`]
///
/// [`AppState`]: crate::AppState
pub async fn run_workflow(state: &crate::AppState) -> WorkflowOutcome {
    let orchestrator = WorkflowOrchestrator::new(
        state.tokens.clone(),
        Arc::new(crate::db::artists::SqliteArtistStore::new(state.db.clone())),
        state.catalog.clone(),
        state.channel.clone(),
        Duration::from_secs(state.config.workflow.step_timeout_secs),
    );

    orchestrator.run().await
}
