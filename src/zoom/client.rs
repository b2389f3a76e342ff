use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info};

use super::auth::BearerToken;
use super::types::{ErrorResponse, ParticipantsResponse, PollAnswers, PollDefinitions};
use crate::config::ZoomConfig;
use crate::error::{ReportError, ReportResult};

pub const DEFAULT_API_BASE_URL: &str = "https://api.zoom.us/v2";
pub const DEFAULT_OAUTH_URL: &str = "https://zoom.us/oauth/token";

/// Decoded body plus the HTTP status line it arrived with.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
    pub status_text: String,
}

pub struct ZoomClient {
    pub(super) client: reqwest::Client,
    api_base_url: String,
    pub(super) oauth_url: String,
}

impl ZoomClient {
    /// `timeout` is the only deadline applied to requests; `None` keeps
    /// reqwest's defaults.
    pub fn new(
        api_base_url: Option<String>,
        oauth_url: Option<String>,
        timeout: Option<Duration>,
    ) -> ReportResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let api_base_url = api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let oauth_url = oauth_url.unwrap_or_else(|| DEFAULT_OAUTH_URL.to_string());

        info!("Initialized Zoom client with base URL: {}", api_base_url);

        Ok(Self {
            client,
            api_base_url,
            oauth_url,
        })
    }

    pub fn from_config(config: &ZoomConfig) -> ReportResult<Self> {
        Self::new(
            non_empty(&config.api_base_url),
            non_empty(&config.oauth_url),
            config.request_timeout_seconds.map(Duration::from_secs),
        )
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Every join/leave session recorded for a finished meeting.
    pub async fn past_meeting_participants(
        &self,
        token: &BearerToken,
        meeting_id: &str,
    ) -> ReportResult<ApiResponse<ParticipantsResponse>> {
        let url = format!("{}/past_meetings/{}/participants", self.api_base_url, meeting_id);
        self.get_json("participants", &url, token).await
    }

    /// Poll questions and answer keys configured on the meeting.
    pub async fn meeting_poll_definitions(
        &self,
        token: &BearerToken,
        meeting_id: &str,
    ) -> ReportResult<ApiResponse<PollDefinitions>> {
        let url = format!("{}/meetings/{}/polls", self.api_base_url, meeting_id);
        self.get_json("poll definitions", &url, token).await
    }

    /// Answers submitted by participants during the meeting.
    pub async fn past_meeting_poll_answers(
        &self,
        token: &BearerToken,
        meeting_id: &str,
    ) -> ReportResult<ApiResponse<PollAnswers>> {
        let url = format!("{}/past_meetings/{}/polls", self.api_base_url, meeting_id);
        self.get_json("poll answers", &url, token).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        token: &BearerToken,
    ) -> ReportResult<ApiResponse<T>> {
        debug!("Requesting Zoom {} from {}", endpoint, url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("Zoom {} request failed: {}", endpoint, e);
                ReportError::upstream(endpoint, failure_message(None, Some(e.to_string())))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ReportError::upstream(endpoint, failure_message(None, Some(e.to_string()))))?;

        if !status.is_success() {
            error!(
                "Zoom {} request failed with status {}: {}",
                endpoint, status, body
            );
            return Err(ReportError::upstream(
                endpoint,
                failure_message(provider_message(&body), Some(status_message(status))),
            ));
        }

        let data: T = serde_json::from_str(&body).map_err(|e| {
            ReportError::upstream(endpoint, format!("Failed to parse response: {}", e))
        })?;

        Ok(ApiResponse {
            data,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}

/// Pulls Zoom's `message` field out of an error body, if there is one.
pub(super) fn provider_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ErrorResponse>(body).ok()?;
    if let Some(code) = parsed.code {
        debug!("Zoom error code {}", code);
    }
    parsed.message
}

fn status_message(status: StatusCode) -> String {
    format!("Request failed with status code {}", status.as_u16())
}

/// Provider message first, then the transport/status description, then a
/// generic fallback.
pub(super) fn failure_message(provider: Option<String>, transport: Option<String>) -> String {
    provider
        .filter(|m| !m.trim().is_empty())
        .or(transport.filter(|m| !m.trim().is_empty()))
        .unwrap_or_else(|| "unknown error".to_string())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
