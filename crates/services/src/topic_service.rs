use rand::Rng;

use quiz_core::Clock;
use quiz_core::import::{LineDiagnostic, parse_questions};
use quiz_core::model::{Topic, TopicId, TopicName};
use storage::{InMemoryRepository, TopicRepository};

use crate::error::{ImportError, SessionError};
use crate::sessions::SessionPlan;

/// A successful import: the stored topic and the rows that were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub topic: Topic,
    pub diagnostics: Vec<LineDiagnostic>,
}

/// Imports, lists and removes topics, and builds session plans from them.
pub struct TopicService {
    clock: Clock,
    topics: Box<dyn TopicRepository>,
}

impl Default for TopicService {
    fn default() -> Self {
        Self::new(Box::new(InMemoryRepository::new()))
    }
}

impl TopicService {
    #[must_use]
    pub fn new(topics: Box<dyn TopicRepository>) -> Self {
        Self {
            clock: Clock::default(),
            topics,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Parse `raw_text` and store its questions as a new topic called `name`.
    ///
    /// Rows that cannot be used are reported in the outcome's diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidName` for a blank name,
    /// `ImportError::DuplicateName` if a topic with the same name (ignoring case)
    /// exists, `ImportError::EmptyContent` for blank text and
    /// `ImportError::NoValidRecords` when no row yields a question. Nothing is
    /// stored on error.
    pub fn import_topic(&mut self, name: &str, raw_text: &str) -> Result<ImportOutcome, ImportError> {
        let name = TopicName::new(name)?;
        if self.topics.contains_name(&name) {
            tracing::warn!(topic = %name, "rejected duplicate topic name");
            return Err(ImportError::DuplicateName {
                name: name.as_str().to_owned(),
            });
        }

        let parsed = parse_questions(raw_text).inspect_err(|err| {
            tracing::warn!(topic = %name, error = %err, "import failed");
        })?;
        let skipped = parsed.skipped();
        let topic = self
            .topics
            .insert_topic(name, parsed.records, self.clock.now())?;

        tracing::info!(
            topic = %topic.name(),
            id = %topic.id(),
            questions = topic.question_count(),
            skipped,
            "imported topic"
        );
        Ok(ImportOutcome {
            topic,
            diagnostics: parsed.diagnostics,
        })
    }

    /// Remove a topic. Unknown ids are ignored.
    pub fn remove_topic(&mut self, id: TopicId) {
        self.topics.remove_topic(id);
    }

    #[must_use]
    pub fn get_topic(&self, id: TopicId) -> Option<&Topic> {
        self.topics.get_topic(id)
    }

    /// All topics, most recently imported first.
    #[must_use]
    pub fn list_topics(&self) -> Vec<&Topic> {
        self.topics.list_topics()
    }

    /// Plan a session over one topic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownTopic` if the topic does not exist.
    pub fn plan_topic(&self, id: TopicId) -> Result<SessionPlan, SessionError> {
        self.topics
            .get_topic(id)
            .map(SessionPlan::for_topic)
            .ok_or(SessionError::UnknownTopic(id))
    }

    /// Plan a session over several topics, shuffled when `shuffle` is set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownTopic` for the first id that does not exist.
    pub fn plan_mixed<R: Rng + ?Sized>(
        &self,
        ids: &[TopicId],
        shuffle: bool,
        rng: &mut R,
    ) -> Result<SessionPlan, SessionError> {
        let topics = ids
            .iter()
            .map(|id| self.topics.get_topic(*id).ok_or(SessionError::UnknownTopic(*id)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SessionPlan::mixed(&topics, shuffle, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::{fixed_clock, fixed_now};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const MATH: &str = "question,option a,option b,correct\n1+1?,2,3,A\n2+2?,4,5,4\n";

    fn service() -> TopicService {
        TopicService::default().with_clock(fixed_clock())
    }

    #[test]
    fn import_stores_topic() {
        let mut service = service();
        let outcome = service.import_topic("Math", MATH).unwrap();
        assert_eq!(outcome.topic.question_count(), 2);
        assert_eq!(outcome.topic.created_at(), fixed_now());
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(service.list_topics().len(), 1);
    }

    #[test]
    fn duplicate_name_is_rejected_in_any_case() {
        let mut service = service();
        service.import_topic("Math", MATH).unwrap();
        let err = service.import_topic("  MATH ", MATH).unwrap_err();
        assert_eq!(
            err,
            ImportError::DuplicateName {
                name: "MATH".to_string()
            }
        );
        assert_eq!(service.list_topics().len(), 1);
    }

    #[test]
    fn failed_imports_store_nothing() {
        let mut service = service();
        assert_eq!(
            service.import_topic("Empty", "  \n").unwrap_err(),
            ImportError::EmptyContent
        );
        assert_eq!(
            service
                .import_topic("Broken", "question,a,b,answer\nQ,only\n")
                .unwrap_err(),
            ImportError::NoValidRecords { skipped: 1 }
        );
        assert!(matches!(
            service.import_topic(" ", MATH).unwrap_err(),
            ImportError::InvalidName(_)
        ));
        assert!(service.list_topics().is_empty());
    }

    #[test]
    fn remove_then_reimport() {
        let mut service = service();
        let id = service.import_topic("Math", MATH).unwrap().topic.id();
        service.remove_topic(id);
        service.remove_topic(id);
        assert!(service.get_topic(id).is_none());
        assert!(service.import_topic("math", MATH).is_ok());
    }

    #[test]
    fn plans_reference_existing_topics() {
        let mut service = service();
        let math = service.import_topic("Math", MATH).unwrap().topic.id();
        let plan = service.plan_topic(math).unwrap();
        assert_eq!(plan.total(), 2);

        let missing = TopicId::new(9);
        assert_eq!(
            service.plan_topic(missing).unwrap_err(),
            SessionError::UnknownTopic(missing)
        );

        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            service
                .plan_mixed(&[math, missing], true, &mut rng)
                .unwrap_err(),
            SessionError::UnknownTopic(missing)
        );
        assert_eq!(service.plan_mixed(&[math, math], true, &mut rng).unwrap().total(), 4);
    }
}
