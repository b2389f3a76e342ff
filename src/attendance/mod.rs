//! Attendance merging.
//!
//! Folds the participant sessions of a meeting into one record per display
//! name, then attaches poll scores. Names are compared exactly; "alice" and
//! "Alice" are different attendees.

use chrono::DateTime;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::scoring::{ParticipantScore, ScoreTable};
use crate::zoom::Participant;

pub mod mappings;

pub use mappings::{EmailMappings, MappingEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeRecord {
    pub name: String,
    /// Seconds across all sessions; `None` once any session had an
    /// unreadable timestamp.
    pub total_time: Option<i64>,
    /// Raw timestamps of the most recent session seen.
    pub join_time: String,
    pub leave_time: String,
    pub email: Option<String>,
    pub external_id: Option<String>,
    pub score: ParticipantScore,
}

/// Attendee records keyed by name, iterated in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct AttendanceMap {
    records: Vec<AttendeeRecord>,
    index: HashMap<String, usize>,
}

impl AttendanceMap {
    pub fn get(&self, name: &str) -> Option<&AttendeeRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AttendeeRecord> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.records[i]),
            None => None,
        }
    }

    fn insert(&mut self, record: AttendeeRecord) {
        self.index.insert(record.name.clone(), self.records.len());
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttendeeRecord> {
        self.records.iter()
    }
}

impl IntoIterator for AttendanceMap {
    type Item = AttendeeRecord;
    type IntoIter = std::vec::IntoIter<AttendeeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Length of one session in whole seconds. Negative when leave precedes join.
pub fn session_seconds(join_time: &str, leave_time: &str) -> Option<i64> {
    let join = DateTime::parse_from_rfc3339(join_time.trim()).ok()?;
    let leave = DateTime::parse_from_rfc3339(leave_time.trim()).ok()?;
    Some((leave - join).num_seconds())
}

pub fn merge_attendance(
    participants: &[Participant],
    scores: &ScoreTable,
    mappings: &EmailMappings,
) -> AttendanceMap {
    let mut attendance = AttendanceMap::default();

    for participant in participants {
        let duration = session_seconds(&participant.join_time, &participant.leave_time);
        if duration.is_none() {
            warn!(
                "Unreadable session timestamps for {} ({:?} - {:?})",
                participant.name, participant.join_time, participant.leave_time
            );
        }

        if let Some(existing) = attendance.get_mut(&participant.name) {
            existing.total_time = match (existing.total_time, duration) {
                (Some(total), Some(d)) => Some(total + d),
                _ => None,
            };
            existing.join_time = participant.join_time.clone();
            existing.leave_time = participant.leave_time.clone();
            continue;
        }

        let (email, external_id) = match mappings.get(&participant.name) {
            Some(entry) => (entry.email.clone(), entry.lt_id.clone()),
            None => (participant.contact_email().map(String::from), None),
        };

        attendance.insert(AttendeeRecord {
            name: participant.name.clone(),
            total_time: duration,
            join_time: participant.join_time.clone(),
            leave_time: participant.leave_time.clone(),
            email,
            external_id,
            score: ParticipantScore::default(),
        });
    }

    for (name, score) in scores {
        match attendance.get_mut(name) {
            Some(record) => record.score = score.clone(),
            None => debug!("Dropping poll score for {} who has no attendance record", name),
        }
    }

    attendance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(name: &str, email: &str, join: &str, leave: &str) -> Participant {
        Participant {
            id: None,
            name: name.to_string(),
            user_email: email.to_string(),
            email: None,
            join_time: join.to_string(),
            leave_time: leave.to_string(),
        }
    }

    fn score(attempted: u32, total_score: u32) -> ParticipantScore {
        ParticipantScore {
            total_score,
            attempted,
            total_questions: attempted,
            breakdown: Vec::new(),
        }
    }

    #[test]
    fn test_session_seconds() {
        assert_eq!(
            session_seconds("2024-01-01T10:00:00Z", "2024-01-01T10:30:00Z"),
            Some(1800)
        );
        assert_eq!(
            session_seconds("2024-01-01T10:30:00Z", "2024-01-01T10:00:00Z"),
            Some(-1800)
        );
        assert_eq!(
            session_seconds("2024-01-01T11:00:00+01:00", "2024-01-01T10:00:05Z"),
            Some(5)
        );
        assert_eq!(session_seconds("", "2024-01-01T10:00:00Z"), None);
        assert_eq!(session_seconds("yesterday", "today"), None);
    }

    #[test]
    fn test_rejoins_sum_durations_and_keep_last_timestamps() {
        let participants = vec![
            session("Alice", "a@x.io", "2024-01-01T10:00:00Z", "2024-01-01T10:10:00Z"),
            session("Bob", "", "2024-01-01T10:00:00Z", "2024-01-01T10:05:00Z"),
            session("Alice", "a@x.io", "2024-01-01T10:20:00Z", "2024-01-01T10:25:00Z"),
            session("Alice", "a@x.io", "2024-01-01T10:40:00Z", "2024-01-01T10:41:30Z"),
        ];

        let attendance = merge_attendance(&participants, &ScoreTable::new(), &EmailMappings::default());

        assert_eq!(attendance.len(), 2);
        let alice = attendance.get("Alice").unwrap();
        assert_eq!(alice.total_time, Some(600 + 300 + 90));
        assert_eq!(alice.join_time, "2024-01-01T10:40:00Z");
        assert_eq!(alice.leave_time, "2024-01-01T10:41:30Z");

        let names: Vec<_> = attendance.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_negative_session_passes_through() {
        let participants = vec![
            session("Alice", "", "2024-01-01T10:00:00Z", "2024-01-01T10:10:00Z"),
            session("Alice", "", "2024-01-01T10:30:00Z", "2024-01-01T10:20:00Z"),
            session("Bob", "", "2024-01-01T10:05:00Z", "2024-01-01T10:00:00Z"),
        ];

        let attendance = merge_attendance(&participants, &ScoreTable::new(), &EmailMappings::default());
        assert_eq!(attendance.get("Alice").unwrap().total_time, Some(0));
        assert_eq!(attendance.get("Bob").unwrap().total_time, Some(-300));
    }

    #[test]
    fn test_record_email_falls_back_to_secondary_field() {
        let mut participant = session("Alice", "", "2024-01-01T10:00:00Z", "2024-01-01T10:01:00Z");
        participant.email = Some("alice@other.example".to_string());

        let attendance = merge_attendance(&[participant], &ScoreTable::new(), &EmailMappings::default());
        assert_eq!(
            attendance.get("Alice").unwrap().email.as_deref(),
            Some("alice@other.example")
        );
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let participants = vec![
            session("alice", "", "2024-01-01T10:00:00Z", "2024-01-01T10:01:00Z"),
            session("Alice", "", "2024-01-01T10:00:00Z", "2024-01-01T10:01:00Z"),
            session("Alice ", "", "2024-01-01T10:00:00Z", "2024-01-01T10:01:00Z"),
        ];

        let attendance = merge_attendance(&participants, &ScoreTable::new(), &EmailMappings::default());
        assert_eq!(attendance.len(), 3);
    }

    #[test]
    fn test_unreadable_timestamp_poisons_total() {
        let participants = vec![
            session("Alice", "", "2024-01-01T10:00:00Z", "2024-01-01T10:10:00Z"),
            session("Alice", "", "2024-01-01T10:20:00Z", ""),
            session("Alice", "", "2024-01-01T10:30:00Z", "2024-01-01T10:40:00Z"),
        ];

        let attendance = merge_attendance(&participants, &ScoreTable::new(), &EmailMappings::default());
        assert_eq!(attendance.get("Alice").unwrap().total_time, None);
    }

    #[test]
    fn test_identity_from_mapping_then_record_then_absent() {
        let participants = vec![
            session("Mapped", "zoom@x.io", "2024-01-01T10:00:00Z", "2024-01-01T10:01:00Z"),
            session("Unmapped", "own@x.io", "2024-01-01T10:00:00Z", "2024-01-01T10:01:00Z"),
            session("Anonymous", "", "2024-01-01T10:00:00Z", "2024-01-01T10:01:00Z"),
        ];
        let mappings: EmailMappings = [(
            "Mapped".to_string(),
            MappingEntry {
                email: Some("hr@x.io".to_string()),
                lt_id: Some("LT-7".to_string()),
            },
        )]
        .into_iter()
        .collect();

        let attendance = merge_attendance(&participants, &ScoreTable::new(), &mappings);

        let mapped = attendance.get("Mapped").unwrap();
        assert_eq!(mapped.email.as_deref(), Some("hr@x.io"));
        assert_eq!(mapped.external_id.as_deref(), Some("LT-7"));

        let unmapped = attendance.get("Unmapped").unwrap();
        assert_eq!(unmapped.email.as_deref(), Some("own@x.io"));
        assert_eq!(unmapped.external_id, None);

        let anonymous = attendance.get("Anonymous").unwrap();
        assert_eq!(anonymous.email, None);
        assert_eq!(anonymous.external_id, None);
    }

    #[test]
    fn test_scores_attach_to_attendees_and_orphans_are_dropped() {
        let participants = vec![
            session("Alice", "", "2024-01-01T10:00:00Z", "2024-01-01T10:30:00Z"),
            session("Bob", "", "2024-01-01T10:00:00Z", "2024-01-01T10:30:00Z"),
        ];
        let mut scores = ScoreTable::new();
        scores.insert("Alice".to_string(), score(3, 2));
        scores.insert("Ghost".to_string(), score(5, 5));

        let attendance = merge_attendance(&participants, &scores, &EmailMappings::default());

        assert_eq!(attendance.len(), 2);
        assert!(attendance.get("Ghost").is_none());
        assert_eq!(attendance.get("Alice").unwrap().score, score(3, 2));
        assert_eq!(attendance.get("Bob").unwrap().score, ParticipantScore::default());
    }

    #[test]
    fn test_empty_participants() {
        let mut scores = ScoreTable::new();
        scores.insert("Alice".to_string(), score(1, 1));

        let attendance = merge_attendance(&[], &scores, &EmailMappings::default());
        assert!(attendance.is_empty());
    }
}
