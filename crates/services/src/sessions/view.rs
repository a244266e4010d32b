use quiz_core::model::{ResponseEntry, SessionQuestionId};

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub current: usize,
    pub is_complete: bool,
}

/// Answer status of one question in the review list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Unanswered,
    Correct,
    Incorrect,
}

impl ReviewStatus {
    #[must_use]
    pub fn of(response: Option<&ResponseEntry>) -> Self {
        match response {
            Some(entry) if entry.is_attempted() && entry.is_correct => Self::Correct,
            Some(entry) if entry.is_attempted() => Self::Incorrect,
            _ => Self::Unanswered,
        }
    }
}

/// Presentation-agnostic row of the jump-to-question list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub index: usize,
    pub id: SessionQuestionId,
    pub status: ReviewStatus,
    pub is_current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ignores_explanation_only_entries() {
        let opened = ResponseEntry {
            explanation_visible: true,
            ..ResponseEntry::default()
        };
        assert_eq!(ReviewStatus::of(Some(&opened)), ReviewStatus::Unanswered);
        assert_eq!(ReviewStatus::of(None), ReviewStatus::Unanswered);
    }

    #[test]
    fn status_reflects_correctness() {
        let right = ResponseEntry {
            selected: Some("a".into()),
            is_correct: true,
            explanation_visible: false,
        };
        let wrong = ResponseEntry {
            is_correct: false,
            ..right.clone()
        };
        assert_eq!(ReviewStatus::of(Some(&right)), ReviewStatus::Correct);
        assert_eq!(ReviewStatus::of(Some(&wrong)), ReviewStatus::Incorrect);
    }
}
