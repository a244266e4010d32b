//! Splits one line of comma-separated text into fields.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenizeError {
    #[error("line contains no fields")]
    Blank,

    #[error("malformed line: {message}")]
    Malformed { message: String },
}

/// Parses a line into trimmed fields, honouring double-quoted values.
///
/// A field that opens with `"` is quoted: commas inside it are literal and `""`
/// stands for one `"`. A quote in the middle of an unquoted field is kept as is.
/// Empty fields are kept, so `a,,c` yields three fields. An unterminated quote
/// runs to the end of the line.
///
/// # Errors
///
/// Returns `TokenizeError::Blank` if the line is empty or only whitespace.
pub fn tokenize_line(line: &str) -> Result<Vec<String>, TokenizeError> {
    if line.trim().is_empty() {
        return Err(TokenizeError::Blank);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    let found = reader
        .read_record(&mut record)
        .map_err(|err| TokenizeError::Malformed {
            message: err.to_string(),
        })?;
    if !found {
        return Err(TokenizeError::Blank);
    }

    Ok(record.iter().map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_fields() {
        assert_eq!(tokenize_line("a,b,c").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn trims_each_field() {
        assert_eq!(tokenize_line("  a , b  ,c ").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn quoted_field_keeps_commas_and_unescapes_quotes() {
        let fields = tokenize_line(r#""a, ""b"" c",next"#).unwrap();
        assert_eq!(fields, vec![r#"a, "b" c"#, "next"]);
    }

    #[test]
    fn quote_inside_unquoted_field_is_literal() {
        let fields = tokenize_line(r#"How long is a 5" nail?,short,long,A"#).unwrap();
        assert_eq!(fields, vec![r#"How long is a 5" nail?"#, "short", "long", "A"]);
    }

    #[test]
    fn quoted_field_is_trimmed_inside() {
        let fields = tokenize_line(r#"one,"  two, three  ",four"#).unwrap();
        assert_eq!(fields, vec!["one", "two, three", "four"]);
    }

    #[test]
    fn empty_fields_are_kept() {
        assert_eq!(tokenize_line("a,,c,").unwrap(), vec!["a", "", "c", ""]);
        assert_eq!(tokenize_line(",").unwrap(), vec!["", ""]);
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(tokenize_line(r#"a,"b, c"#).unwrap(), vec!["a", "b, c"]);
    }

    #[test]
    fn blank_line_is_rejected() {
        assert_eq!(tokenize_line(""), Err(TokenizeError::Blank));
        assert_eq!(tokenize_line(" \t "), Err(TokenizeError::Blank));
    }
}
