//! Poll scoring.
//!
//! Each submitted answer is resolved against the meeting's poll definitions,
//! first by poll id and then by question text. Only resolved answers count
//! towards `attempted`; ungraded questions (no answer key) are always
//! credited.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::zoom::{PollAnswers, PollDefinition, PollDefinitions, PollQuestion};

/// Score lookup keyed by participant display name.
pub type ScoreTable = HashMap<String, ParticipantScore>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantScore {
    pub total_score: u32,
    pub attempted: u32,
    /// Mirrors `attempted`.
    pub total_questions: u32,
    /// One entry per resolved answer, in submission order.
    pub breakdown: Vec<QuestionScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub poll_title: String,
    pub question: String,
    pub score: u32,
}

impl PollQuestion {
    /// Ungraded questions accept anything; graded ones need an exact,
    /// case-sensitive match.
    pub fn is_correct(&self, answer: &str) -> bool {
        match &self.right_answers {
            None => true,
            Some(right) => right.iter().any(|r| r == answer),
        }
    }
}

impl PollDefinition {
    fn question(&self, name: &str) -> Option<&PollQuestion> {
        self.questions.iter().find(|q| q.name == name)
    }
}

impl PollDefinitions {
    fn poll(&self, id: &str) -> Option<&PollDefinition> {
        self.polls.iter().find(|p| p.id == id)
    }
}

/// Score every submission. A name that appears twice in `answers` keeps only
/// its last submission.
pub fn calculate_scores(definitions: &PollDefinitions, answers: &PollAnswers) -> ScoreTable {
    let mut scores = ScoreTable::with_capacity(answers.questions.len());

    for submission in &answers.questions {
        let mut score = ParticipantScore::default();

        for response in &submission.question_details {
            let Some(poll) = definitions.poll(&response.polling_id) else {
                debug!(
                    "Ignoring answer from {} for unknown poll {}",
                    submission.name, response.polling_id
                );
                continue;
            };

            let Some(question) = poll.question(&response.question) else {
                debug!(
                    "Ignoring answer from {} to unknown question {:?} in poll {}",
                    submission.name, response.question, poll.id
                );
                continue;
            };

            let points = u32::from(question.is_correct(&response.answer));
            score.attempted += 1;
            score.total_score += points;
            score.breakdown.push(QuestionScore {
                poll_title: poll.title.clone(),
                question: question.name.clone(),
                score: points,
            });
        }

        score.total_questions = score.attempted;

        if scores.insert(submission.name.clone(), score).is_some() {
            debug!("Replacing earlier poll submission for {}", submission.name);
        }
    }

    scores
}
