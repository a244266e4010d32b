use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{QuestionRecord, Topic, TopicId};

/// Where the questions of a session came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    Topic(TopicId),
    Mixed(Vec<TopicId>),
    /// The incorrect answers of a finished session.
    Review,
}

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub source: PlanSource,
    pub questions: Vec<QuestionRecord>,
}

impl SessionPlan {
    /// All questions of one topic, in import order.
    #[must_use]
    pub fn for_topic(topic: &Topic) -> Self {
        Self {
            source: PlanSource::Topic(topic.id()),
            questions: topic.questions().to_vec(),
        }
    }

    /// The union of several topics' questions, optionally shuffled.
    #[must_use]
    pub fn mixed<R: Rng + ?Sized>(topics: &[&Topic], shuffle: bool, rng: &mut R) -> Self {
        let ids = topics.iter().map(|topic| topic.id()).collect();
        let lists = topics.iter().map(|topic| topic.questions());
        let questions = if shuffle {
            shuffle_questions(lists, rng)
        } else {
            lists.flatten().cloned().collect()
        };
        Self {
            source: PlanSource::Mixed(ids),
            questions,
        }
    }

    #[must_use]
    pub fn review(questions: Vec<QuestionRecord>) -> Self {
        Self {
            source: PlanSource::Review,
            questions,
        }
    }

    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when no questions were selected for this session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Concatenates `lists` and returns a uniformly random permutation of the result.
///
/// Uses an in-place Fisher–Yates shuffle, so every record appears exactly once.
pub fn shuffle_questions<'a, R, I>(lists: I, rng: &mut R) -> Vec<QuestionRecord>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a [QuestionRecord]>,
{
    let mut combined: Vec<QuestionRecord> = lists.into_iter().flatten().cloned().collect();
    combined.as_mut_slice().shuffle(rng);
    combined
}
