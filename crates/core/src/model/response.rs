use crate::model::question::QuestionRecord;

/// What the user did with one question of a session.
///
/// Sessions only hold entries for questions that were touched; a missing entry
/// means unanswered with the explanation hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseEntry {
    pub selected: Option<String>,
    pub is_correct: bool,
    pub explanation_visible: bool,
}

impl ResponseEntry {
    /// True once a non-empty option has been selected.
    #[must_use]
    pub fn is_attempted(&self) -> bool {
        self.selected.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Records `option` as the answer to `record`, keeping explanation visibility.
    pub fn select(&mut self, record: &QuestionRecord, option: impl Into<String>) {
        let option = option.into();
        self.is_correct = record.is_correct(&option);
        self.selected = Some(option);
    }
}

/// Visual state of a single option of the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    /// Not selected, and either not correct or the question is unanswered.
    Neutral,
    /// Selected and correct.
    Correct,
    /// Selected but wrong.
    Incorrect,
    /// Correct but not the one the user selected.
    Missed,
}

/// Computes the state of every option of `record` given the user's response.
///
/// Correctness is resolved per option with [`QuestionRecord::is_correct`], so it
/// always agrees with how the answer was scored.
#[must_use]
pub fn option_states(record: &QuestionRecord, response: Option<&ResponseEntry>) -> Vec<OptionState> {
    let selected = response
        .filter(|entry| entry.is_attempted())
        .and_then(|entry| entry.selected.as_deref());

    record
        .options()
        .iter()
        .map(|option| match selected {
            None => OptionState::Neutral,
            Some(choice) if choice == option => {
                if record.is_correct(option) {
                    OptionState::Correct
                } else {
                    OptionState::Incorrect
                }
            }
            Some(_) if record.is_correct(option) => OptionState::Missed,
            Some(_) => OptionState::Neutral,
        })
        .collect()
}
