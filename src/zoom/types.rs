//! Response shapes for the three Zoom endpoints the report reads.
//!
//! Only the fields the report uses are modelled; everything else in the
//! payloads is ignored. Missing and `null` fields fall back to their defaults.

use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response from `/past_meetings/{id}/participants`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantsResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub participants: Vec<Participant>,
    pub page_count: Option<u32>,
    pub page_size: Option<u32>,
    pub total_records: Option<u32>,
}

/// One join/leave session. A rejoin shows up as another entry with the same name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_email: String,
    /// Some payloads carry `email` instead of, or next to, `user_email`.
    pub email: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub join_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub leave_time: String,
}

impl Participant {
    /// `user_email`, falling back to `email`; `None` when both are blank.
    pub fn contact_email(&self) -> Option<&str> {
        [Some(self.user_email.as_str()), self.email.as_deref()]
            .into_iter()
            .flatten()
            .find(|e| !e.trim().is_empty())
    }
}

/// Response from `/meetings/{id}/polls`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PollDefinitions {
    pub total_records: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub polls: Vec<PollDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PollDefinition {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub status: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub questions: Vec<PollQuestion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PollQuestion {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub answers: Option<Vec<String>>,
    /// `None` means the question is not graded.
    pub right_answers: Option<Vec<String>>,
}

/// Response from `/past_meetings/{id}/polls`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PollAnswers {
    pub id: Option<u64>,
    pub uuid: Option<String>,
    pub start_time: Option<String>,
    /// One submission per participant, answers flattened across polls.
    #[serde(deserialize_with = "null_as_default")]
    pub questions: Vec<PollSubmission>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSubmission {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub question_details: Vec<QuestionResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub polling_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(deserialize_with = "null_as_default")]
    pub answer: String,
    pub date_time: Option<String>,
}

/// Error body Zoom returns on non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub code: Option<i64>,
    pub message: Option<String>,
}

/// Response from the OAuth token endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
}
