//! Report pipeline.
//!
//! token → participants, poll definitions, poll answers → scores → merged
//! attendance → [`MeetingReport`]. The first failure aborts the run; no
//! partial report is ever returned.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::attendance::{merge_attendance, AttendanceMap, AttendeeRecord, EmailMappings};
use crate::error::ReportResult;
use crate::scoring::{calculate_scores, QuestionScore};
use crate::zoom::{Credentials, ZoomClient};

/// Written in place of an email or external ID that is not known.
pub const MISSING_VALUE: &str = "NaN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingReport {
    pub meeting_id: String,
    pub attendees: Vec<AttendeeReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeReport {
    pub name: String,
    #[serde(rename = "totalTime")]
    pub total_time: Option<i64>,
    #[serde(rename = "joinTime")]
    pub join_time: String,
    #[serde(rename = "leaveTime")]
    pub leave_time: String,
    pub email: String,
    #[serde(rename = "LTId")]
    pub lt_id: String,
    pub total_score: u32,
    pub attempted: u32,
    pub total_questions: u32,
    #[serde(
        rename = "pollBreakdown",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub poll_breakdown: Option<Vec<QuestionScore>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Add the per-question `pollBreakdown` list to each attendee.
    pub include_breakdown: bool,
    /// Issue the three data requests concurrently instead of one after another.
    pub parallel_fetches: bool,
}

impl AttendeeReport {
    fn from_record(record: AttendeeRecord, include_breakdown: bool) -> Self {
        let AttendeeRecord {
            name,
            total_time,
            join_time,
            leave_time,
            email,
            external_id,
            score,
        } = record;

        Self {
            name,
            total_time,
            join_time,
            leave_time,
            email: email.unwrap_or_else(|| MISSING_VALUE.to_string()),
            lt_id: external_id.unwrap_or_else(|| MISSING_VALUE.to_string()),
            total_score: score.total_score,
            attempted: score.attempted,
            total_questions: score.total_questions,
            poll_breakdown: include_breakdown.then_some(score.breakdown),
        }
    }
}

impl MeetingReport {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Flatten merged attendance into the output record, keeping first-seen order.
pub fn assemble_report(
    meeting_id: &str,
    attendance: AttendanceMap,
    include_breakdown: bool,
) -> MeetingReport {
    MeetingReport {
        meeting_id: meeting_id.to_string(),
        attendees: attendance
            .into_iter()
            .map(|record| AttendeeReport::from_record(record, include_breakdown))
            .collect(),
    }
}

/// Run the whole workflow for one meeting.
///
/// `email_mappings` is the raw JSON mapping table, if the caller has one. It
/// is parsed before any request is made so bad input fails fast.
pub async fn generate_report(
    client: &ZoomClient,
    credentials: &Credentials,
    meeting_id: &str,
    email_mappings: Option<&str>,
    options: &ReportOptions,
) -> ReportResult<MeetingReport> {
    let mappings = EmailMappings::from_json(email_mappings.unwrap_or_default())?;
    if !mappings.is_empty() {
        info!(entries = mappings.len(), "Loaded email mappings");
    }

    info!(meeting_id, "Fetching access token with account credentials");
    let token = client.fetch_access_token(credentials).await?;

    info!(meeting_id, parallel = options.parallel_fetches, "Fetching meeting data");
    let (participants, definitions, answers) = if options.parallel_fetches {
        tokio::try_join!(
            client.past_meeting_participants(&token, meeting_id),
            client.meeting_poll_definitions(&token, meeting_id),
            client.past_meeting_poll_answers(&token, meeting_id),
        )?
    } else {
        let participants = client.past_meeting_participants(&token, meeting_id).await?;
        let definitions = client.meeting_poll_definitions(&token, meeting_id).await?;
        let answers = client.past_meeting_poll_answers(&token, meeting_id).await?;
        (participants, definitions, answers)
    };
    info!(
        meeting_id,
        sessions = participants.data.participants.len(),
        polls = definitions.data.polls.len(),
        submissions = answers.data.questions.len(),
        "Meeting data fetched"
    );

    let scores = calculate_scores(&definitions.data, &answers.data);
    info!(meeting_id, scored = scores.len(), "Calculated poll scores");

    let attendance = merge_attendance(&participants.data.participants, &scores, &mappings);
    info!(meeting_id, attendees = attendance.len(), "Merged attendance");

    Ok(assemble_report(meeting_id, attendance, options.include_breakdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ParticipantScore, ScoreTable};
    use crate::zoom::Participant;

    fn session(name: &str, join: &str, leave: &str) -> Participant {
        Participant {
            name: name.to_string(),
            join_time: join.to_string(),
            leave_time: leave.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_assemble_empty_report() {
        let report = assemble_report("82339006452", AttendanceMap::default(), false);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({ "meetingId": "82339006452", "attendees": [] })
        );
    }

    #[test]
    fn test_assemble_uses_output_field_names_and_sentinels() {
        let mut scores = ScoreTable::new();
        scores.insert(
            "Alice".to_string(),
            ParticipantScore {
                total_score: 1,
                attempted: 1,
                total_questions: 1,
                breakdown: vec![QuestionScore {
                    poll_title: "Warmup".to_string(),
                    question: "How are you?".to_string(),
                    score: 1,
                }],
            },
        );
        let attendance = merge_attendance(
            &[session("Alice", "2024-01-01T10:00:00Z", "2024-01-01T10:30:00Z")],
            &scores,
            &EmailMappings::default(),
        );

        let report = assemble_report("m-1", attendance, false);

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "meetingId": "m-1",
                "attendees": [{
                    "name": "Alice",
                    "totalTime": 1800,
                    "joinTime": "2024-01-01T10:00:00Z",
                    "leaveTime": "2024-01-01T10:30:00Z",
                    "email": "NaN",
                    "LTId": "NaN",
                    "total_score": 1,
                    "attempted": 1,
                    "total_questions": 1
                }]
            })
        );
    }

    #[test]
    fn test_assemble_with_breakdown() {
        let mut scores = ScoreTable::new();
        scores.insert(
            "Alice".to_string(),
            ParticipantScore {
                total_score: 0,
                attempted: 1,
                total_questions: 1,
                breakdown: vec![QuestionScore {
                    poll_title: "Quiz".to_string(),
                    question: "Pick B".to_string(),
                    score: 0,
                }],
            },
        );
        let attendance = merge_attendance(
            &[
                session("Alice", "2024-01-01T10:00:00Z", "2024-01-01T10:30:00Z"),
                session("Bob", "2024-01-01T10:00:00Z", "2024-01-01T10:30:00Z"),
            ],
            &scores,
            &EmailMappings::default(),
        );

        let report = assemble_report("m-1", attendance, true);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(
            value["attendees"][0]["pollBreakdown"],
            serde_json::json!([{ "poll_title": "Quiz", "question": "Pick B", "score": 0 }])
        );
        assert_eq!(value["attendees"][1]["pollBreakdown"], serde_json::json!([]));
    }

    #[test]
    fn test_assemble_keeps_first_seen_order() {
        let attendance = merge_attendance(
            &[
                session("Zed", "2024-01-01T10:00:00Z", "2024-01-01T10:01:00Z"),
                session("Amy", "2024-01-01T10:00:00Z", "2024-01-01T10:01:00Z"),
                session("Zed", "2024-01-01T10:02:00Z", "2024-01-01T10:03:00Z"),
                session("Mia", "2024-01-01T10:00:00Z", "2024-01-01T10:01:00Z"),
            ],
            &ScoreTable::new(),
            &EmailMappings::default(),
        );

        let report = assemble_report("m-1", attendance, false);
        let names: Vec<_> = report.attendees.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Mia"]);
    }

    #[test]
    fn test_negative_time_is_reported_as_is() {
        let attendance = merge_attendance(
            &[session("Alice", "2024-01-01T10:30:00Z", "2024-01-01T10:00:00Z")],
            &ScoreTable::new(),
            &EmailMappings::default(),
        );

        let report = assemble_report("m-1", attendance, false);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["attendees"][0]["totalTime"], serde_json::json!(-1800));
    }

    #[test]
    fn test_unreadable_time_serializes_as_null() {
        let attendance = merge_attendance(
            &[session("Alice", "garbage", "2024-01-01T10:30:00Z")],
            &ScoreTable::new(),
            &EmailMappings::default(),
        );

        let report = assemble_report("m-1", attendance, false);
        let value = serde_json::to_value(&report).unwrap();
        assert!(value["attendees"][0]["totalTime"].is_null());
    }

    #[test]
    fn test_to_json_pretty_and_compact() {
        let report = assemble_report("m-1", AttendanceMap::default(), false);
        assert_eq!(report.to_json(false).unwrap(), r#"{"meetingId":"m-1","attendees":[]}"#);
        assert!(report.to_json(true).unwrap().contains('\n'));
    }
}
