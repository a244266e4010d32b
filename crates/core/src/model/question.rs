use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest number of options addressable by a letter label (`A`..`D`).
pub const MAX_LETTER_OPTIONS: usize = 4;

/// Minimum number of options a question must offer.
pub const MIN_OPTIONS: usize = 2;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is missing")]
    EmptyQuestion,

    #[error("at least {MIN_OPTIONS} options are required, found {found}")]
    TooFewOptions { found: usize },

    #[error("correct answer is missing")]
    EmptyCorrectAnswer,
}

//
// ─── QUESTION RECORD ───────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
///
/// `correct_answer` is kept exactly as authored. It may be the literal text of an
/// option or a letter label, and is resolved against the options on every call to
/// [`QuestionRecord::is_correct`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawQuestionRecord")]
pub struct QuestionRecord {
    question: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: Option<String>,
}

impl QuestionRecord {
    /// Builds a record, enforcing the question invariants.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyQuestion` if the question text is blank.
    /// Returns `QuestionError::TooFewOptions` if fewer than two options are given.
    /// Returns `QuestionError::EmptyCorrectAnswer` if the correct answer is blank.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let question = question.into();
        let correct_answer = correct_answer.into();

        if question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        if options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                found: options.len(),
            });
        }
        if correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyCorrectAnswer);
        }

        Ok(Self {
            question,
            options,
            correct_answer,
            explanation: explanation.filter(|text| !text.trim().is_empty()),
        })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The correct answer as authored (literal option text or a letter).
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Returns true if `selected` is the correct answer.
    ///
    /// A literal match against the stored answer wins. Otherwise the stored answer
    /// is read as a letter label and compared with the option at that position.
    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        if selected == self.correct_answer {
            return true;
        }
        self.letter_index()
            .and_then(|index| self.options.get(index))
            .is_some_and(|option| option == selected)
    }

    /// Position of the correct option, resolved with the same precedence as
    /// [`QuestionRecord::is_correct`].
    #[must_use]
    pub fn correct_option_index(&self) -> Option<usize> {
        self.options
            .iter()
            .position(|option| *option == self.correct_answer)
            .or_else(|| {
                self.letter_index()
                    .filter(|index| *index < self.options.len())
            })
    }

    fn letter_index(&self) -> Option<usize> {
        letter_to_index(&self.correct_answer)
    }
}

/// Unvalidated wire shape; deserialization goes through [`QuestionRecord::new`].
#[derive(Deserialize)]
struct RawQuestionRecord {
    question: String,
    options: Vec<String>,
    correct_answer: String,
    #[serde(default)]
    explanation: Option<String>,
}

impl TryFrom<RawQuestionRecord> for QuestionRecord {
    type Error = QuestionError;

    fn try_from(raw: RawQuestionRecord) -> Result<Self, Self::Error> {
        Self::new(raw.question, raw.options, raw.correct_answer, raw.explanation)
    }
}

/// Maps a letter label `A`..`D` (any case, surrounding whitespace ignored) to a
/// zero-based option index.
#[must_use]
pub fn letter_to_index(label: &str) -> Option<usize> {
    match label.trim().to_uppercase().as_str() {
        "A" => Some(0),
        "B" => Some(1),
        "C" => Some(2),
        "D" => Some(3),
        _ => None,
    }
}

/// Letter label for a zero-based option index, if it has one.
#[must_use]
pub fn index_to_letter(index: usize) -> Option<char> {
    if index < MAX_LETTER_OPTIONS {
        u8::try_from(index).ok().map(|offset| char::from(b'A' + offset))
    } else {
        None
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
