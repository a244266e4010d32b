//! Turns loosely formatted comma-separated text into question records.
//!
//! The first non-blank line names the columns; [`header::map_headers`] assigns each
//! column a role, [`tokenizer::tokenize_line`] splits every later line into fields,
//! and [`builder::parse_questions`] assembles and validates the records.

pub mod builder;
pub mod header;
pub mod tokenizer;

pub use builder::{
    LineDiagnostic, ParseError, ParsedQuestions, SkipReason, build_record, parse_questions,
};
pub use header::{FieldRole, classify_header, map_headers, normalize_header};
pub use tokenizer::{TokenizeError, tokenize_line};
