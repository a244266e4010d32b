use quiz_core::Clock;
use quiz_core::model::{OptionState, QuestionRecord, ResponseEntry};

use super::plan::SessionPlan;
use super::score::Score;
use super::session::{QuizSession, SessionQuestion, Step};
use super::view::{ReviewItem, SessionProgress};
use crate::error::SessionError;

/// Where the user is in the quiz.
#[derive(Debug, Default)]
pub enum QuizState {
    /// Choosing what to practise. No session exists.
    #[default]
    TopicSelect,
    /// Answering questions.
    Practice(QuizSession),
    /// Looking at the results of a finished session.
    Summary(QuizSession),
}

/// Drives the quiz state machine.
///
/// Every operation either performs a legal transition or returns an error and
/// leaves the state untouched.
#[derive(Debug, Default)]
pub struct QuizFlow {
    state: QuizState,
    clock: Clock,
}

impl QuizFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    #[must_use]
    pub fn is_selecting(&self) -> bool {
        matches!(self.state, QuizState::TopicSelect)
    }

    #[must_use]
    pub fn is_practicing(&self) -> bool {
        matches!(self.state, QuizState::Practice(_))
    }

    #[must_use]
    pub fn is_summary(&self) -> bool {
        matches!(self.state, QuizState::Summary(_))
    }

    /// The running or finished session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        match &self.state {
            QuizState::Practice(session) | QuizState::Summary(session) => Some(session),
            QuizState::TopicSelect => None,
        }
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Start practising `records`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyActive` while a session is being practised,
    /// and `SessionError::EmptyList` if `records` is empty. Starting from the
    /// summary discards the finished session.
    pub fn start(&mut self, records: Vec<QuestionRecord>) -> Result<&QuizSession, SessionError> {
        if self.is_practicing() {
            return Err(SessionError::AlreadyActive);
        }
        self.enter_practice(records)
    }

    /// Start practising the questions of `plan`.
    ///
    /// # Errors
    ///
    /// See [`QuizFlow::start`].
    pub fn start_plan(&mut self, plan: SessionPlan) -> Result<&QuizSession, SessionError> {
        tracing::debug!(source = ?plan.source, total = plan.total(), "starting planned session");
        self.start(plan.questions)
    }

    /// From the summary, practise again only the questions answered wrongly.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInSummary` outside the summary, and
    /// `SessionError::EmptyList` if every attempted answer was correct.
    pub fn review_incorrect(&mut self) -> Result<&QuizSession, SessionError> {
        let QuizState::Summary(finished) = &self.state else {
            return Err(SessionError::NotInSummary);
        };
        let plan = SessionPlan::review(finished.incorrect_records());
        if plan.is_empty() {
            return Err(SessionError::EmptyList);
        }
        self.enter_practice(plan.questions)
    }

    fn enter_practice(&mut self, records: Vec<QuestionRecord>) -> Result<&QuizSession, SessionError> {
        let session = QuizSession::new(records, self.clock.now())?;
        tracing::debug!(questions = session.total_questions(), "entering practice");
        self.state = QuizState::Practice(session);
        match &self.state {
            QuizState::Practice(session) => Ok(session),
            _ => Err(SessionError::NotPracticing),
        }
    }

    /// Abandon the current session and return to topic selection.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotPracticing` outside practice.
    pub fn back(&mut self) -> Result<(), SessionError> {
        self.practice()?;
        tracing::debug!("leaving practice");
        self.state = QuizState::TopicSelect;
        Ok(())
    }

    /// Discard any session and return to topic selection.
    pub fn reset(&mut self) {
        self.state = QuizState::TopicSelect;
    }

    /// Advance; from the last question this moves to the summary.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotPracticing` outside practice.
    pub fn next(&mut self) -> Result<Step, SessionError> {
        let now = self.clock.now();
        let step = self.practice_mut()?.next(now)?;
        if step == Step::Finished {
            self.finish();
        }
        Ok(step)
    }

    /// Go back; from the first question this returns to topic selection.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotPracticing` outside practice.
    pub fn previous(&mut self) -> Result<Step, SessionError> {
        let step = self.practice_mut()?.previous()?;
        if step == Step::Exited {
            tracing::debug!("left practice from the first question");
            self.state = QuizState::TopicSelect;
        }
        Ok(step)
    }

    fn finish(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            QuizState::Practice(session) => {
                let score = session.score();
                tracing::info!(
                    total = score.total,
                    attempted = score.attempted,
                    correct = score.correct,
                    accuracy = score.accuracy,
                    "session finished"
                );
                QuizState::Summary(session)
            }
            other => other,
        };
    }

    //
    // ─── PRACTICE OPERATIONS ───────────────────────────────────────────────────
    //

    /// Answer the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotPracticing` outside practice.
    pub fn select_option(&mut self, option: impl Into<String>) -> Result<&ResponseEntry, SessionError> {
        self.practice_mut()?.select_option(option)
    }

    /// Show or hide the current explanation, returning the new visibility.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotPracticing` outside practice.
    pub fn toggle_explanation(&mut self) -> Result<bool, SessionError> {
        self.practice_mut()?.toggle_explanation()
    }

    /// Jump to a question without touching its explanation visibility.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotPracticing` outside practice and
    /// `SessionError::IndexOutOfRange` for a bad index.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.practice_mut()?.go_to(index)
    }

    fn practice(&self) -> Result<&QuizSession, SessionError> {
        match &self.state {
            QuizState::Practice(session) => Ok(session),
            _ => Err(SessionError::NotPracticing),
        }
    }

    fn practice_mut(&mut self) -> Result<&mut QuizSession, SessionError> {
        match &mut self.state {
            QuizState::Practice(session) => Ok(session),
            _ => Err(SessionError::NotPracticing),
        }
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn current_question(&self) -> Option<&SessionQuestion> {
        self.practice().ok().map(QuizSession::current_question)
    }

    #[must_use]
    pub fn current_response(&self) -> Option<&ResponseEntry> {
        self.practice().ok().and_then(QuizSession::current_response)
    }

    #[must_use]
    pub fn option_states(&self) -> Option<Vec<OptionState>> {
        self.practice().ok().map(QuizSession::option_states)
    }

    /// Score of the running or finished session.
    #[must_use]
    pub fn score(&self) -> Option<Score> {
        self.session().map(QuizSession::score)
    }

    #[must_use]
    pub fn review_items(&self) -> Option<Vec<ReviewItem>> {
        self.session().map(QuizSession::review_items)
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.session().map(QuizSession::progress)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::{fixed_clock, fixed_now};

    fn records(n: usize) -> Vec<QuestionRecord> {
        (0..n)
            .map(|i| {
                QuestionRecord::new(
                    format!("Q{i}"),
                    vec!["yes".into(), "no".into()],
                    "yes",
                    None,
                )
                .unwrap()
            })
            .collect()
    }

    fn flow() -> QuizFlow {
        QuizFlow::new().with_clock(fixed_clock())
    }

    #[test]
    fn starts_in_topic_select() {
        let flow = flow();
        assert!(flow.is_selecting());
        assert!(flow.session().is_none());
        assert!(flow.score().is_none());
    }

    #[test]
    fn empty_start_keeps_topic_select() {
        let mut flow = flow();
        assert_eq!(flow.start(Vec::new()).unwrap_err(), SessionError::EmptyList);
        assert!(flow.is_selecting());
    }

    #[test]
    fn previous_at_first_question_returns_to_topic_select() {
        let mut flow = flow();
        flow.start(records(3)).unwrap();
        assert_eq!(flow.previous().unwrap(), Step::Exited);
        assert!(flow.is_selecting());
    }

    #[test]
    fn next_at_last_question_enters_summary() {
        let mut flow = flow();
        flow.start(records(3)).unwrap();
        assert_eq!(flow.next().unwrap(), Step::Moved(1));
        assert_eq!(flow.next().unwrap(), Step::Moved(2));
        assert_eq!(flow.next().unwrap(), Step::Finished);
        assert!(flow.is_summary());
        assert_eq!(flow.session().unwrap().completed_at(), Some(fixed_now()));
    }

    #[test]
    fn summary_rejects_answers() {
        let mut flow = flow();
        flow.start(records(1)).unwrap();
        flow.next().unwrap();
        assert_eq!(flow.select_option("yes").unwrap_err(), SessionError::NotPracticing);
        assert_eq!(flow.toggle_explanation().unwrap_err(), SessionError::NotPracticing);
        assert_eq!(flow.go_to(0).unwrap_err(), SessionError::NotPracticing);
        assert!(flow.current_question().is_none());
        assert_eq!(flow.score().unwrap().total, 1);
    }

    #[test]
    fn cannot_start_while_active() {
        let mut flow = flow();
        flow.start(records(2)).unwrap();
        assert_eq!(flow.start(records(1)).unwrap_err(), SessionError::AlreadyActive);
        assert_eq!(flow.session().unwrap().total_questions(), 2);
    }

    #[test]
    fn start_from_summary_replaces_finished_session() {
        let mut flow = flow();
        flow.start(records(2)).unwrap();
        flow.next().unwrap();
        flow.next().unwrap();
        assert!(flow.is_summary());

        let session = flow.start(records(1)).unwrap();
        assert_eq!(session.total_questions(), 1);
        assert!(flow.is_practicing());
    }

    #[test]
    fn empty_start_from_summary_keeps_summary() {
        let mut flow = flow();
        flow.start(records(1)).unwrap();
        flow.next().unwrap();
        assert_eq!(flow.start(Vec::new()).unwrap_err(), SessionError::EmptyList);
        assert!(flow.is_summary());
    }

    #[test]
    fn review_incorrect_restarts_with_wrong_answers() {
        let mut flow = flow();
        flow.start(records(3)).unwrap();
        flow.select_option("no").unwrap();
        flow.next().unwrap();
        flow.select_option("yes").unwrap();
        flow.next().unwrap();
        flow.select_option("no").unwrap();
        flow.next().unwrap();
        assert!(flow.is_summary());

        let session = flow.review_incorrect().unwrap();
        let texts: Vec<_> = session
            .questions()
            .iter()
            .map(|q| q.record.question().to_owned())
            .collect();
        assert_eq!(texts, vec!["Q0", "Q2"]);
        assert!(flow.is_practicing());
        assert_eq!(flow.current_question().unwrap().record.question(), "Q0");
        assert!(flow.current_response().is_none());
    }

    #[test]
    fn review_incorrect_with_nothing_wrong_stays_in_summary() {
        let mut flow = flow();
        flow.start(records(1)).unwrap();
        flow.select_option("yes").unwrap();
        flow.next().unwrap();
        assert_eq!(flow.review_incorrect().unwrap_err(), SessionError::EmptyList);
        assert!(flow.is_summary());
    }

    #[test]
    fn review_incorrect_requires_summary() {
        let mut flow = flow();
        assert_eq!(flow.review_incorrect().unwrap_err(), SessionError::NotInSummary);
        flow.start(records(1)).unwrap();
        assert_eq!(flow.review_incorrect().unwrap_err(), SessionError::NotInSummary);
    }

    #[test]
    fn back_and_reset_return_to_topic_select() {
        let mut flow = flow();
        assert_eq!(flow.back().unwrap_err(), SessionError::NotPracticing);
        flow.start(records(2)).unwrap();
        flow.back().unwrap();
        assert!(flow.is_selecting());

        flow.start(records(1)).unwrap();
        flow.next().unwrap();
        flow.reset();
        assert!(flow.is_selecting());
    }
}
