//! Catalog access token provider
//!
//! Client-credentials flow against the catalog's accounts endpoint. The
//! token is short-lived and fetched fresh at the start of every workflow
//! run; acquisition failure is fatal to the run.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::types::{AccessToken, AccessTokenProvider};
use async_trait::async_trait;
use encore_common::config::CatalogConfig;

/// Token acquisition errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("catalog credentials not configured")]
    MissingCredentials,

    #[error("network error: {0}")]
    Network(String),

    #[error("token endpoint error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed token response: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

/// Access token provider backed by the catalog accounts endpoint
pub struct TokenProvider {
    http: reqwest::Client,
    accounts_url: String,
    client_id: String,
    client_secret: String,
}

impl TokenProvider {
    pub fn new(config: &CatalogConfig) -> Result<Self, TokenError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TokenError::Network(e.to_string()))?;

        Ok(Self {
            http,
            accounts_url: config.accounts_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for TokenProvider {
    async fn get_access_token(&self) -> Result<AccessToken, TokenError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(TokenError::MissingCredentials);
        }

        let basic = BASE64.encode(format!("{}:{}", self.client_id, self.client_secret));

        tracing::debug!("Requesting access token from {}", self.accounts_url);
        let response = self
            .http
            .post(&self.accounts_url)
            .header(AUTHORIZATION, format!("Basic {basic}"))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| TokenError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TokenError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::Parse(e.to_string()))?;

        if let Some(error) = payload.error {
            return Err(TokenError::Api {
                status: status.as_u16(),
                message: error,
            });
        }

        match payload.access_token {
            Some(secret) if !secret.is_empty() => {
                tracing::info!("Access token acquired");
                Ok(AccessToken::new(secret))
            }
            _ => Err(TokenError::Parse("access_token missing".to_string())),
        }
    }
}
