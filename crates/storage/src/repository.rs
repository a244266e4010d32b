use chrono::{DateTime, Utc};
use quiz_core::model::{QuestionRecord, Topic, TopicId, TopicName};
use thiserror::Error;

/// Errors surfaced by topic stores.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("a topic named \"{name}\" already exists")]
    DuplicateName { name: String },
}

/// Repository contract for imported topics.
///
/// Names are unique under case-insensitive comparison. Topics are never edited
/// in place; replacing one means removing it and inserting a new one.
pub trait TopicRepository {
    /// Store a new topic and assign it an id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DuplicateName` if a topic with a matching name exists.
    fn insert_topic(
        &mut self,
        name: TopicName,
        questions: Vec<QuestionRecord>,
        created_at: DateTime<Utc>,
    ) -> Result<Topic, StorageError>;

    /// Remove a topic. Removing an unknown id is a no-op.
    fn remove_topic(&mut self, id: TopicId);

    /// Fetch a topic by ID.
    fn get_topic(&self, id: TopicId) -> Option<&Topic>;

    /// All topics, most recently added first.
    fn list_topics(&self) -> Vec<&Topic>;

    /// Returns true if a topic with a name matching `name` exists.
    fn contains_name(&self, name: &TopicName) -> bool {
        self.list_topics()
            .iter()
            .any(|topic| topic.name().matches(name))
    }
}

/// Arena-backed in-memory store.
///
/// Topic `n` lives in slot `n - 1`; removal empties the slot so ids stay stable
/// and are never handed out twice.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    slots: Vec<Option<Topic>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot_index(id: TopicId) -> Option<usize> {
        usize::try_from(id.value()).ok()?.checked_sub(1)
    }
}

impl TopicRepository for InMemoryRepository {
    fn insert_topic(
        &mut self,
        name: TopicName,
        questions: Vec<QuestionRecord>,
        created_at: DateTime<Utc>,
    ) -> Result<Topic, StorageError> {
        if self.contains_name(&name) {
            return Err(StorageError::DuplicateName {
                name: name.as_str().to_owned(),
            });
        }

        let next = u64::try_from(self.slots.len()).unwrap_or(u64::MAX);
        let id = TopicId::new(next.saturating_add(1));
        let topic = Topic::new(id, name, questions, created_at);
        self.slots.push(Some(topic.clone()));
        tracing::debug!(%id, "stored topic");
        Ok(topic)
    }

    fn remove_topic(&mut self, id: TopicId) {
        if let Some(slot) = Self::slot_index(id).and_then(|index| self.slots.get_mut(index)) {
            if slot.take().is_some() {
                tracing::debug!(%id, "removed topic");
            }
        }
    }

    fn get_topic(&self, id: TopicId) -> Option<&Topic> {
        Self::slot_index(id)
            .and_then(|index| self.slots.get(index))
            .and_then(Option::as_ref)
    }

    fn list_topics(&self) -> Vec<&Topic> {
        self.slots.iter().rev().flatten().collect()
    }
}
