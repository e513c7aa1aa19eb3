//! Artist list endpoints
//!
//! GET /artist, POST /artist, DELETE /artist map 1:1 to artist store
//! operations; POST /artist/id searches the catalog for an artist's id.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::artists as store;
use crate::error::{ApiError, ApiResult};
use crate::models::ArtistRecord;
use crate::services::catalog::ArtistMatch;
use crate::types::AccessTokenProvider;
use crate::AppState;

/// GET /artist response
#[derive(Debug, Serialize)]
pub struct ArtistListResponse {
    pub artists: Vec<ArtistRecord>,
}

/// POST /artist and DELETE /artist request
#[derive(Debug, Deserialize)]
pub struct ArtistRequest {
    pub artist_id: String,
    pub artist_name: String,
}

/// POST /artist/id request
#[derive(Debug, Deserialize)]
pub struct SearchArtistRequest {
    pub artist_name: String,
}

/// POST /artist/id response
#[derive(Debug, Serialize)]
pub struct SearchArtistResponse {
    pub artist_search_results: Vec<ArtistMatch>,
}

/// GET /artist
///
/// Lists all monitored artists; answers 204 when the table is empty.
pub async fn list_artists(State(state): State<AppState>) -> Result<Response, ApiError> {
    let artists = store::scan_artists(&state.db).await?;

    if artists.is_empty() {
        tracing::debug!("No artists found, returning 204");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(Json(ArtistListResponse { artists }).into_response())
}

/// POST /artist
pub async fn add_artist(
    State(state): State<AppState>,
    Json(request): Json<ArtistRequest>,
) -> ApiResult<Json<ArtistRecord>> {
    if request.artist_id.is_empty() || request.artist_name.is_empty() {
        return Err(ApiError::BadRequest(
            "artist_id and artist_name are required".to_string(),
        ));
    }

    store::add_artist(&state.db, &request.artist_id, &request.artist_name).await?;
    tracing::info!(artist_id = %request.artist_id, "Now monitoring {}", request.artist_name);

    let record = store::get_artist(&state.db, &request.artist_id)
        .await?
        .ok_or_else(|| ApiError::Internal("artist missing after insert".to_string()))?;

    Ok(Json(record))
}

/// DELETE /artist
pub async fn remove_artist(
    State(state): State<AppState>,
    Json(request): Json<ArtistRequest>,
) -> ApiResult<StatusCode> {
    store::remove_artist(&state.db, &request.artist_id).await?;
    tracing::info!(artist_id = %request.artist_id, "Stopped monitoring {}", request.artist_name);

    Ok(StatusCode::OK)
}

/// POST /artist/id
///
/// Searches the catalog for artists matching the given name so the caller
/// can pick the right id to monitor.
pub async fn search_artist_id(
    State(state): State<AppState>,
    Json(request): Json<SearchArtistRequest>,
) -> ApiResult<Json<SearchArtistResponse>> {
    if request.artist_name.is_empty() {
        return Err(ApiError::BadRequest("artist_name is required".to_string()));
    }

    let token = state
        .tokens
        .get_access_token()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    let artist_search_results = state
        .catalog
        .search_artist(&token, &request.artist_name)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(SearchArtistResponse {
        artist_search_results,
    }))
}

/// Build artist routes
pub fn artist_routes() -> Router<AppState> {
    Router::new()
        .route("/artist", get(list_artists))
        .route("/artist", post(add_artist))
        .route("/artist", delete(remove_artist))
        .route("/artist/id", post(search_artist_id))
}
