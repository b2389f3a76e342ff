//! Zoom REST API access: the account-credentials token exchange and the
//! three meeting endpoints a report is built from.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{BearerToken, Credentials};
pub use client::{ApiResponse, ZoomClient, DEFAULT_API_BASE_URL, DEFAULT_OAUTH_URL};
pub use types::{
    Participant, ParticipantsResponse, PollAnswers, PollDefinition, PollDefinitions, PollQuestion,
    PollSubmission, QuestionResponse,
};
