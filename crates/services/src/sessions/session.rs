use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

use quiz_core::model::{
    OptionState, QuestionRecord, ResponseEntry, SessionQuestionId, option_states,
};

use super::score::{Score, incorrect_indices};
use super::view::{ReviewItem, ReviewStatus, SessionProgress};
use crate::error::SessionError;

//
// ─── SESSION QUESTION ──────────────────────────────────────────────────────────
//

/// A question as it appears in one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuestion {
    pub id: SessionQuestionId,
    pub record: QuestionRecord,
}

/// Where a sequential move ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Now showing the question at this index.
    Moved(usize),
    /// Moved past the last question; the session is complete.
    Finished,
    /// Moved back from the first question; the session is abandoned.
    Exited,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory practice run over a copied list of questions.
///
/// Responses are kept sparsely by question index. Once the session is complete,
/// every mutating call fails with `SessionError::Completed`.
pub struct QuizSession {
    questions: Vec<SessionQuestion>,
    current: usize,
    responses: BTreeMap<usize, ResponseEntry>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a session over `records`, tagging each with a fresh session id.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyList` if no records are provided.
    pub fn new(records: Vec<QuestionRecord>, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if records.is_empty() {
            return Err(SessionError::EmptyList);
        }

        let questions = records
            .into_iter()
            .map(|record| SessionQuestion {
                id: SessionQuestionId::generate(),
                record,
            })
            .collect();

        Ok(Self {
            questions,
            current: 0,
            responses: BTreeMap::new(),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[SessionQuestion] {
        &self.questions
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &SessionQuestion {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn current_response(&self) -> Option<&ResponseEntry> {
        self.responses.get(&self.current)
    }

    #[must_use]
    pub fn response(&self, index: usize) -> Option<&ResponseEntry> {
        self.responses.get(&index)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Answer the current question, replacing any earlier answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is already finished.
    pub fn select_option(&mut self, option: impl Into<String>) -> Result<&ResponseEntry, SessionError> {
        self.ensure_active()?;
        let record = &self.questions[self.current].record;
        let entry = self.responses.entry(self.current).or_default();
        entry.select(record, option);
        tracing::trace!(index = self.current, correct = entry.is_correct, "answered");
        Ok(entry)
    }

    /// Show or hide the explanation of the current question.
    ///
    /// Returns the new visibility.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is already finished.
    pub fn toggle_explanation(&mut self) -> Result<bool, SessionError> {
        self.ensure_active()?;
        let entry = self.responses.entry(self.current).or_default();
        entry.explanation_visible = !entry.explanation_visible;
        Ok(entry.explanation_visible)
    }

    /// Jump straight to `index`, as from a review list.
    ///
    /// Explanation visibility at the destination is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` for an index past the end and
    /// `SessionError::Completed` if the session is already finished.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_active()?;
        if index >= self.questions.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// Advance to the next question, or finish the session from the last one.
    ///
    /// The destination's explanation is hidden again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is already finished.
    pub fn next(&mut self, now: DateTime<Utc>) -> Result<Step, SessionError> {
        self.ensure_active()?;
        if self.current + 1 >= self.questions.len() {
            self.completed_at = Some(now);
            return Ok(Step::Finished);
        }
        self.move_sequentially(self.current + 1);
        Ok(Step::Moved(self.current))
    }

    /// Go back one question, or leave the session from the first one.
    ///
    /// The destination's explanation is hidden again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is already finished.
    pub fn previous(&mut self) -> Result<Step, SessionError> {
        self.ensure_active()?;
        if self.current == 0 {
            return Ok(Step::Exited);
        }
        self.move_sequentially(self.current - 1);
        Ok(Step::Moved(self.current))
    }

    fn move_sequentially(&mut self, index: usize) {
        self.current = index;
        if let Some(entry) = self.responses.get_mut(&index) {
            entry.explanation_visible = false;
        }
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.is_complete() {
            Err(SessionError::Completed)
        } else {
            Ok(())
        }
    }

    #[must_use]
    pub fn score(&self) -> Score {
        Score::from_responses(self.questions.len(), &self.responses)
    }

    /// Records answered wrongly, in session order.
    #[must_use]
    pub fn incorrect_records(&self) -> Vec<QuestionRecord> {
        incorrect_indices(&self.responses)
            .into_iter()
            .filter_map(|index| self.questions.get(index))
            .map(|question| question.record.clone())
            .collect()
    }

    /// Visual state of each option of the current question.
    #[must_use]
    pub fn option_states(&self) -> Vec<OptionState> {
        option_states(&self.current_question().record, self.current_response())
    }

    /// One entry per question, for a jump-to-question list.
    #[must_use]
    pub fn review_items(&self) -> Vec<ReviewItem> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| ReviewItem {
                index,
                id: question.id,
                status: ReviewStatus::of(self.responses.get(&index)),
                is_current: index == self.current,
            })
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.questions.len(),
            answered: self.score().attempted,
            current: self.current,
            is_complete: self.is_complete(),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("responses_len", &self.responses.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn record(n: usize) -> QuestionRecord {
        QuestionRecord::new(
            format!("Q{n}"),
            vec!["right".to_string(), "wrong".to_string()],
            "A",
            Some(format!("because {n}")),
        )
        .unwrap()
    }

    fn session(len: usize) -> QuizSession {
        QuizSession::new((0..len).map(record).collect(), fixed_now()).unwrap()
    }

    #[test]
    fn empty_session_returns_error() {
        let err = QuizSession::new(Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::EmptyList);
    }

    #[test]
    fn questions_get_distinct_session_ids() {
        let session = session(3);
        let ids: std::collections::HashSet<_> =
            session.questions().iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn select_overwrites_and_keeps_explanation() {
        let mut session = session(2);
        assert!(session.toggle_explanation().unwrap());
        session.select_option("wrong").unwrap();
        let entry = session.select_option("right").unwrap();
        assert!(entry.is_correct);
        assert!(entry.explanation_visible);
        assert_eq!(entry.selected.as_deref(), Some("right"));
    }

    #[test]
    fn toggle_only_affects_current_question() {
        let mut session = session(2);
        session.toggle_explanation().unwrap();
        session.go_to(1).unwrap();
        assert!(session.current_response().is_none());
        session.go_to(0).unwrap();
        assert!(session.current_response().unwrap().explanation_visible);
    }

    #[test]
    fn sequential_moves_hide_explanation_but_jumps_do_not() {
        let mut session = session(3);
        session.go_to(1).unwrap();
        session.toggle_explanation().unwrap();

        session.go_to(0).unwrap();
        session.go_to(1).unwrap();
        assert!(session.current_response().unwrap().explanation_visible);

        session.go_to(0).unwrap();
        assert_eq!(session.next(fixed_now()).unwrap(), Step::Moved(1));
        assert!(!session.current_response().unwrap().explanation_visible);

        session.toggle_explanation().unwrap();
        session.go_to(2).unwrap();
        assert_eq!(session.previous().unwrap(), Step::Moved(1));
        assert!(!session.current_response().unwrap().explanation_visible);
    }

    #[test]
    fn boundaries_exit_and_finish() {
        let mut session = session(3);
        assert_eq!(session.previous().unwrap(), Step::Exited);
        assert_eq!(session.current_index(), 0);

        session.go_to(2).unwrap();
        assert_eq!(session.next(fixed_now()).unwrap(), Step::Finished);
        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn completed_session_rejects_mutation() {
        let mut session = session(1);
        session.next(fixed_now()).unwrap();
        assert_eq!(session.select_option("right").unwrap_err(), SessionError::Completed);
        assert_eq!(session.toggle_explanation().unwrap_err(), SessionError::Completed);
        assert_eq!(session.go_to(0).unwrap_err(), SessionError::Completed);
        assert_eq!(session.previous().unwrap_err(), SessionError::Completed);
    }

    #[test]
    fn go_to_rejects_out_of_range() {
        let mut session = session(2);
        assert_eq!(
            session.go_to(2).unwrap_err(),
            SessionError::IndexOutOfRange { index: 2, len: 2 }
        );
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn incorrect_records_follow_session_order() {
        let mut session = session(4);
        session.go_to(3).unwrap();
        session.select_option("wrong").unwrap();
        session.go_to(0).unwrap();
        session.select_option("right").unwrap();
        session.go_to(1).unwrap();
        session.select_option("wrong").unwrap();

        let wrong: Vec<_> = session
            .incorrect_records()
            .iter()
            .map(|record| record.question().to_owned())
            .collect();
        assert_eq!(wrong, vec!["Q1", "Q3"]);

        let score = session.score();
        assert_eq!(score.attempted, 3);
        assert_eq!(score.correct, 1);
        assert_eq!(score.unanswered, 1);
        assert_eq!(score.accuracy, 33);
    }

    #[test]
    fn review_items_report_status() {
        let mut session = session(3);
        session.select_option("right").unwrap();
        session.go_to(1).unwrap();
        session.select_option("wrong").unwrap();

        let items = session.review_items();
        let statuses: Vec<_> = items.iter().map(|item| item.status).collect();
        assert_eq!(
            statuses,
            vec![ReviewStatus::Correct, ReviewStatus::Incorrect, ReviewStatus::Unanswered]
        );
        assert!(items[1].is_current);
        assert_eq!(session.progress().answered, 2);
    }

    #[test]
    fn option_states_use_current_response() {
        let mut session = session(1);
        session.select_option("wrong").unwrap();
        assert_eq!(
            session.option_states(),
            vec![OptionState::Missed, OptionState::Incorrect]
        );
    }
}
