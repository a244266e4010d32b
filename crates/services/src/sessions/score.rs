use std::collections::BTreeMap;

use quiz_core::model::ResponseEntry;

/// Aggregate results of a session, computed from its responses on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub total: usize,
    pub attempted: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    /// Percentage of attempted questions answered correctly, rounded half up.
    /// Zero when nothing was attempted.
    pub accuracy: u32,
}

impl Score {
    /// Folds the sparse response map of a session with `total` questions.
    #[must_use]
    pub fn from_responses(total: usize, responses: &BTreeMap<usize, ResponseEntry>) -> Self {
        let (attempted, correct) = responses
            .values()
            .filter(|entry| entry.is_attempted())
            .fold((0_usize, 0_usize), |(attempted, correct), entry| {
                (attempted + 1, correct + usize::from(entry.is_correct))
            });

        Self {
            total,
            attempted,
            correct,
            incorrect: attempted - correct,
            unanswered: total.saturating_sub(attempted),
            accuracy: accuracy_percent(correct, attempted),
        }
    }
}

/// `round(100 * correct / attempted)` in integer arithmetic.
fn accuracy_percent(correct: usize, attempted: usize) -> u32 {
    if attempted == 0 {
        return 0;
    }
    let percent = (200 * correct + attempted) / (2 * attempted);
    u32::try_from(percent).unwrap_or(100)
}

/// Indices answered wrongly, in ascending order.
#[must_use]
pub(crate) fn incorrect_indices(responses: &BTreeMap<usize, ResponseEntry>) -> Vec<usize> {
    responses
        .iter()
        .filter(|(_, entry)| entry.is_attempted() && !entry.is_correct)
        .map(|(index, _)| *index)
        .collect()
}
