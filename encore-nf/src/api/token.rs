//! Token endpoint
//!
//! GET /token hands a fresh catalog access token to direct API clients
//! (e.g. the CLI), mapping 1:1 to the token provider.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::types::AccessTokenProvider;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// GET /token
pub async fn get_token(State(state): State<AppState>) -> ApiResult<Json<TokenResponse>> {
    let token = state
        .tokens
        .get_access_token()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(TokenResponse {
        access_token: token.secret().to_string(),
    }))
}

/// Build token routes
pub fn token_routes() -> Router<AppState> {
    Router::new().route("/token", get(get_token))
}
