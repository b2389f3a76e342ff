//! Terminal errors for a report run.
//!
//! A run either produces a full report or stops at the first of these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// The client-credentials exchange failed.
    #[error("Failed to obtain Zoom access token: {0}")]
    Authentication(String),

    /// One of the meeting data endpoints failed or returned an unreadable body.
    #[error("Zoom {endpoint} request failed: {message}")]
    UpstreamRequest {
        endpoint: &'static str,
        message: String,
    },

    /// The email mapping table could not be parsed.
    #[error("Malformed email mappings: {0}")]
    MalformedInput(String),

    /// The HTTP client itself could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ReportError {
    pub fn upstream(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::UpstreamRequest {
            endpoint,
            message: message.into(),
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
