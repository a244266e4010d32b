//! Assembles question records from tokenized rows.

use thiserror::Error;

use crate::import::header::{FieldRole, map_headers};
use crate::import::tokenizer::tokenize_line;
use crate::model::{QuestionError, QuestionRecord};

//
// ─── ERRORS & DIAGNOSTICS ──────────────────────────────────────────────────────
//

/// Whole-import failures. Nothing is produced when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    #[error("the file is empty")]
    EmptyContent,

    #[error("no valid questions found ({skipped} lines skipped)")]
    NoValidRecords { skipped: usize },
}

/// Why a single row was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The row could not be split into fields.
    Unparseable,
    /// The row has a different number of fields than the header.
    ColumnCountMismatch { expected: usize, found: usize },
    /// The row parsed but does not describe a complete question.
    InsufficientData(QuestionError),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unparseable => write!(f, "line could not be parsed"),
            SkipReason::ColumnCountMismatch { expected, found } => {
                write!(f, "expected {expected} columns, found {found}")
            }
            SkipReason::InsufficientData(err) => write!(f, "insufficient data: {err}"),
        }
    }
}

/// A skipped row, identified by its 1-based line number in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    pub line: usize,
    pub reason: SkipReason,
}

/// Records accepted from an import, plus the rows that were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestions {
    pub records: Vec<QuestionRecord>,
    pub diagnostics: Vec<LineDiagnostic>,
}

impl ParsedQuestions {
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.diagnostics.len()
    }
}

//
// ─── RECORD BUILDER ────────────────────────────────────────────────────────────
//

/// Builds one record from a row whose fields line up with `roles`.
///
/// Option values are collected in column order, whatever number their header
/// carries. Empty values are treated as absent.
///
/// # Errors
///
/// Returns `SkipReason::ColumnCountMismatch` if `fields` and `roles` differ in
/// length, or `SkipReason::InsufficientData` if the question text, two options or
/// the correct answer are missing.
pub fn build_record(fields: &[String], roles: &[FieldRole]) -> Result<QuestionRecord, SkipReason> {
    if fields.len() != roles.len() {
        return Err(SkipReason::ColumnCountMismatch {
            expected: roles.len(),
            found: fields.len(),
        });
    }

    let mut question: Option<&str> = None;
    let mut options = Vec::new();
    let mut correct_answer: Option<&str> = None;
    let mut explanation: Option<&str> = None;

    for (role, value) in roles.iter().zip(fields) {
        if value.is_empty() {
            continue;
        }
        match role {
            FieldRole::Question => question = Some(value.as_str()),
            FieldRole::Option(_) => options.push(value.clone()),
            FieldRole::CorrectAnswer => correct_answer = Some(value.as_str()),
            FieldRole::Explanation => explanation = Some(value.as_str()),
            FieldRole::Unmapped => {}
        }
    }

    let question = question.ok_or(SkipReason::InsufficientData(QuestionError::EmptyQuestion))?;
    QuestionRecord::new(
        question,
        options,
        correct_answer.unwrap_or_default(),
        explanation.map(str::to_owned),
    )
    .map_err(SkipReason::InsufficientData)
}

/// Parses a whole text blob: header line first, one question per later line.
///
/// Rows that cannot be used are skipped and reported in
/// [`ParsedQuestions::diagnostics`]; the rest of the import carries on.
///
/// # Errors
///
/// Returns `ParseError::EmptyContent` for empty or whitespace-only input and
/// `ParseError::NoValidRecords` when no row produced a record.
pub fn parse_questions(text: &str) -> Result<ParsedQuestions, ParseError> {
    let mut lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Err(ParseError::EmptyContent);
    };
    let headers = tokenize_line(header).map_err(|_| ParseError::EmptyContent)?;
    let roles = map_headers(&headers);
    tracing::debug!(line = header_line, ?roles, "mapped header row");

    let mut records = Vec::new();
    let mut diagnostics = Vec::new();

    for (line, raw) in lines {
        let outcome = tokenize_line(raw)
            .map_err(|_| SkipReason::Unparseable)
            .and_then(|fields| build_record(&fields, &roles));

        match outcome {
            Ok(record) => records.push(record),
            Err(reason) => {
                tracing::debug!(line, %reason, "skipping row");
                diagnostics.push(LineDiagnostic { line, reason });
            }
        }
    }

    if records.is_empty() {
        return Err(ParseError::NoValidRecords {
            skipped: diagnostics.len(),
        });
    }

    Ok(ParsedQuestions {
        records,
        diagnostics,
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
