//! Notifier
//!
//! Deterministic message formatting for the three run outcomes, and the
//! production webhook channel. The channel endpoint handles fan-out to
//! subscribers; delivery failure is reported here, never retried.

use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::models::Release;
use crate::types::MessageChannel;
use async_trait::async_trait;
use encore_common::config::NotifierConfig;

/// Outbound message: a subject line and a plain-text body
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub subject: String,
    pub body: String,
}

/// Delivery errors
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("notification channel not configured")]
    NotConfigured,

    #[error("network error: {0}")]
    Network(String),

    #[error("channel endpoint error {status}: {message}")]
    Api { status: u16, message: String },
}

/// Message for an empty artist store
pub fn no_artists_message() -> Message {
    Message {
        subject: "Encore: no artists found in list".to_string(),
        body: "There are no artists currently being monitored, so there is no new music \
               to report.\nAdd artists to the list to start receiving updates."
            .to_string(),
    }
}

/// Message for a run that found no changed releases
pub fn no_new_releases_message() -> Message {
    Message {
        subject: "Encore: no new music to report".to_string(),
        body: "There is no new music to report. We'll check back in next week!".to_string(),
    }
}

/// Message listing every newly discovered release, in discovery order
pub fn new_releases_message(releases: &[Release]) -> Message {
    let artists: Vec<&str> = releases.iter().map(|r| r.artist_name.as_str()).collect();

    let mut lines = Vec::with_capacity(releases.len());
    for (index, release) in releases.iter().enumerate() {
        lines.push(format!(
            "{}. {} dropped \"{}\" ({}) on {}.",
            index + 1,
            release.artist_name,
            release.release_title,
            release.kind,
            release.released_on,
        ));
    }

    let count = releases.len();
    let lead = if count == 1 {
        "There is 1 artist with new music!".to_string()
    } else {
        format!("There are {count} artists with new music!")
    };

    Message {
        subject: "Encore: new music to report!".to_string(),
        body: format!(
            "{lead} Artists that dropped: {}\n\nHere is the latest:\n{}",
            artists.join(", "),
            lines.join("\n"),
        ),
    }
}

/// Webhook-backed [`MessageChannel`]; POSTs the message as JSON
pub struct WebhookChannel {
    http: reqwest::Client,
    webhook_url: String,
}

impl WebhookChannel {
    pub fn new(config: &NotifierConfig) -> Result<Self, ChannelError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ChannelError::Network(e.to_string()))?;

        Ok(Self {
            http,
            webhook_url: config.webhook_url.clone(),
        })
    }
}

#[async_trait]
impl MessageChannel for WebhookChannel {
    async fn publish(&self, message: &Message) -> Result<(), ChannelError> {
        if self.webhook_url.is_empty() {
            return Err(ChannelError::NotConfigured);
        }

        let response = self
            .http
            .post(&self.webhook_url)
            .json(&json!({
                "subject": message.subject,
                "message": message.body,
            }))
            .send()
            .await
            .map_err(|e| ChannelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::info!("Published notification: {}", message.subject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReleaseKind;

    fn release(artist: &str, title: &str, date: &str, kind: ReleaseKind) -> Release {
        Release {
            artist_id: format!("id-{artist}"),
            artist_name: artist.to_string(),
            release_id: format!("rel-{title}"),
            release_title: title.to_string(),
            released_on: date.to_string(),
            kind,
        }
    }

    #[test]
    fn no_artists_message_is_stable() {
        let message = no_artists_message();
        assert_eq!(message.subject, "Encore: no artists found in list");
        assert!(message.body.contains("no artists currently being monitored"));
    }

    #[test]
    fn single_release_message() {
        let message = new_releases_message(&[release(
            "Nao",
            "And Then Life Was Beautiful",
            "2021-09-24",
            ReleaseKind::Album,
        )]);

        assert_eq!(message.subject, "Encore: new music to report!");
        assert!(message.body.starts_with("There is 1 artist with new music!"));
        assert!(message
            .body
            .contains("1. Nao dropped \"And Then Life Was Beautiful\" (album) on 2021-09-24."));
    }

    #[test]
    fn multi_release_message_lists_in_order() {
        let message = new_releases_message(&[
            release("Anita Baker", "Rapture", "1986-03-25", ReleaseKind::Album),
            release("Sade", "Young Lion", "2025-01-17", ReleaseKind::Single),
        ]);

        assert!(message.body.contains("There are 2 artists with new music!"));
        assert!(message.body.contains("Artists that dropped: Anita Baker, Sade"));

        let rapture = message.body.find("1. Anita Baker").unwrap();
        let young_lion = message.body.find("2. Sade").unwrap();
        assert!(rapture < young_lion);
        assert!(message.body.contains("(single) on 2025-01-17"));
    }

    #[test]
    fn formatting_is_deterministic() {
        let releases =
            vec![release("Mereba", "The Breeze Grew a Fire", "2025-02-14", ReleaseKind::Album)];
        assert_eq!(new_releases_message(&releases), new_releases_message(&releases));
    }
}
