//! Server-to-server OAuth: trades account/client credentials for a bearer token.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::fmt;
use tracing::{debug, error, info};

use super::client::{failure_message, provider_message, ZoomClient};
use super::types::TokenResponse;
use crate::error::{ReportError, ReportResult};

#[derive(Clone, Default)]
pub struct Credentials {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(
        account_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Names of the fields that are still blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.account_id.trim().is_empty() {
            missing.push("account_id");
        }
        if self.client_id.trim().is_empty() {
            missing.push("client_id");
        }
        if self.client_secret.trim().is_empty() {
            missing.push("client_secret");
        }
        missing
    }

    fn basic_auth_header(&self) -> String {
        let encoded = BASE64.encode(format!("{}:{}", self.client_id, self.client_secret));
        format!("Basic {}", encoded)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Short-lived access token attached to every API call of a run.
#[derive(Clone)]
pub struct BearerToken {
    token: String,
    expires_in: Option<u64>,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_in: None,
        }
    }

    pub fn secret(&self) -> &str {
        &self.token
    }

    /// Lifetime in seconds as reported by the token endpoint.
    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl ZoomClient {
    /// Exchange account credentials for a bearer token. Any failure is fatal.
    pub async fn fetch_access_token(&self, credentials: &Credentials) -> ReportResult<BearerToken> {
        debug!(
            "Requesting access token for account {} from {}",
            credentials.account_id, self.oauth_url
        );

        let response = self
            .client
            .post(&self.oauth_url)
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", credentials.account_id.as_str()),
            ])
            .header(AUTHORIZATION, credentials.basic_auth_header())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()
            .await
            .map_err(|e| {
                error!("Token request failed: {}", e);
                ReportError::Authentication(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ReportError::Authentication(e.to_string()))?;

        if !status.is_success() {
            error!("Token request failed with status {}: {}", status, body);
            // Zoom's OAuth errors use `reason`, the API uses `message`
            let reason = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("reason").and_then(|r| r.as_str()).map(String::from))
                .or_else(|| provider_message(&body));
            return Err(ReportError::Authentication(failure_message(
                reason,
                Some(format!("status {}", status.as_u16())),
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ReportError::Authentication(format!("Failed to parse token response: {}", e)))?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ReportError::Authentication("response has no access_token".to_string()))?;

        info!(
            "Access token obtained (type: {}, expires in: {:?}s)",
            token.token_type.as_deref().unwrap_or("bearer"),
            token.expires_in
        );
        if let Some(scope) = token.scope.as_deref() {
            debug!("Token scope: {}", scope);
        }

        Ok(BearerToken {
            token: access_token,
            expires_in: token.expires_in,
        })
    }
}
