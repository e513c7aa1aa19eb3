//! Workflow endpoints
//!
//! POST /workflow/run triggers a notification run on demand, subject to the
//! same single-flight lock as the scheduler.

use axum::{extract::State, routing::post, Json, Router};

use crate::error::{ApiError, ApiResult};
use crate::models::WorkflowOutcome;
use crate::services::workflow::run_workflow;
use crate::AppState;

/// POST /workflow/run
///
/// Runs the workflow inline and returns its terminal outcome. Answers 409
/// if a run is already in flight.
pub async fn trigger_run(State(state): State<AppState>) -> ApiResult<Json<WorkflowOutcome>> {
    let _guard = state
        .run_lock
        .clone()
        .try_lock_owned()
        .map_err(|_| ApiError::Conflict("workflow run already in flight".to_string()))?;

    let outcome = run_workflow(&state).await;
    Ok(Json(outcome))
}

/// Build workflow routes
pub fn workflow_routes() -> Router<AppState> {
    Router::new().route("/workflow/run", post(trigger_run))
}
