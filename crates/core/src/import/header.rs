//! Header cell classification.

/// What a column contributes to a question record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// Answer option column, numbered 1..=4 as spelled in the header.
    Option(u8),
    Question,
    CorrectAnswer,
    Explanation,
    /// No recognised role; values in this column are dropped.
    Unmapped,
}

const OPTION_LETTERS: [char; 4] = ['a', 'b', 'c', 'd'];

/// Lower-cases a header cell and strips every non-alphanumeric character.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Classifies one header cell. The first matching rule wins.
#[must_use]
pub fn classify_header(raw: &str) -> FieldRole {
    let header = normalize_header(raw);
    if header.is_empty() {
        return FieldRole::Unmapped;
    }

    for (number, letter) in (1u8..).zip(OPTION_LETTERS) {
        if is_option_header(&header, number, letter) {
            return FieldRole::Option(number);
        }
    }

    if header.contains("question") || header.contains("prompt") || header == "q" {
        FieldRole::Question
    } else if header.contains("correct")
        || header.contains("answer")
        || header.contains("solution")
        || header == "key"
    {
        FieldRole::CorrectAnswer
    } else if header.contains("explan")
        || header.contains("rationale")
        || header.contains("reason")
        || header.contains("note")
    {
        FieldRole::Explanation
    } else {
        FieldRole::Unmapped
    }
}

fn is_option_header(header: &str, number: u8, letter: char) -> bool {
    let number = number.to_string();
    let letter = letter.to_string();

    if header == number || header == letter {
        return true;
    }

    // "answer" alone also names the correct-answer column, so it only marks an
    // option when nothing else follows ("correctanswerad" must not match).
    if header == format!("answer{number}") || header == format!("answer{letter}") {
        return true;
    }

    // A letter label must end the header, or "optional..." would read as option A.
    ["option", "opt", "choice"]
        .iter()
        .any(|prefix| header.contains(&format!("{prefix}{number}")))
        || ["option", "choice"]
            .iter()
            .any(|prefix| header.ends_with(&format!("{prefix}{letter}")))
}

/// Maps a header row to one role per column.
#[must_use]
pub fn map_headers<S: AsRef<str>>(headers: &[S]) -> Vec<FieldRole> {
    headers
        .iter()
        .map(|cell| classify_header(cell.as_ref()))
        .collect()
}
