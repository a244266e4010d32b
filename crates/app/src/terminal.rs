//! Line-oriented quiz driver over any reader/writer pair.

use std::fmt;
use std::io::{self, BufRead, Write};

use quiz_core::model::{OptionState, index_to_letter, letter_to_index};
use services::{QuizFlow, QuizSession, QuizState, ReviewStatus, SessionError, Step};

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Answer with the option at this zero-based position.
    Answer(usize),
    Next,
    Previous,
    Jump(usize),
    Explain,
    List,
    Review,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parses a line. Options are picked by 1-based number or by letter.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let lower = line.to_lowercase();
        match lower.as_str() {
            "n" | "next" => return Self::Next,
            "p" | "prev" | "previous" => return Self::Previous,
            "e" | "explain" => return Self::Explain,
            "l" | "list" => return Self::List,
            "r" | "review" => return Self::Review,
            "q" | "quit" | "back" => return Self::Quit,
            _ => {}
        }

        if let Some(target) = lower.strip_prefix("g ") {
            return match target.trim().parse::<usize>() {
                Ok(number) if number > 0 => Self::Jump(number - 1),
                _ => Self::Unknown(line.to_string()),
            };
        }
        if let Ok(number) = lower.parse::<usize>() {
            if number > 0 {
                return Self::Answer(number - 1);
            }
        }
        if let Some(index) = letter_to_index(&lower) {
            return Self::Answer(index);
        }
        Self::Unknown(line.to_string())
    }
}

/// A command the flow refused. Shown to the user, never fatal.
#[derive(Debug, PartialEq, Eq)]
enum Rejected {
    Session(SessionError),
    NoSuchOption { number: usize, available: usize },
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejected::Session(err) => write!(f, "{err}"),
            Rejected::NoSuchOption { number, available } => {
                write!(f, "there is no option {number} (choose 1 to {available})")
            }
        }
    }
}

impl From<SessionError> for Rejected {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

/// Runs `flow` until the user leaves the session or input ends.
///
/// # Errors
///
/// Returns any I/O error from `input` or `output`.
pub fn run<R: BufRead, W: Write>(flow: &mut QuizFlow, input: R, mut output: W) -> io::Result<()> {
    let mut lines = input.lines();

    loop {
        match flow.state() {
            QuizState::TopicSelect => return Ok(()),
            QuizState::Practice(session) => render_question(session, &mut output)?,
            QuizState::Summary(session) => render_summary(session, &mut output)?,
        }
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            flow.reset();
            return Ok(());
        };
        let command = Command::parse(&line);
        if let Err(err) = dispatch(flow, command, &mut output)? {
            writeln!(output, "{err}")?;
        }
    }
}

/// Applies one command. The inner result carries rejected operations, which are
/// shown to the user instead of ending the loop.
fn dispatch<W: Write>(
    flow: &mut QuizFlow,
    command: Command,
    output: &mut W,
) -> io::Result<Result<(), Rejected>> {
    if flow.is_summary() {
        return Ok(match command {
            Command::Review => flow.review_incorrect().map(|_| ()).map_err(Rejected::from),
            Command::Quit => {
                flow.reset();
                Ok(())
            }
            _ => {
                writeln!(output, "r = review incorrect answers, q = quit")?;
                Ok(())
            }
        });
    }

    let result = match command {
        Command::Answer(index) => answer(flow, index),
        Command::Next => flow.next().map(|_| ()).map_err(Rejected::from),
        Command::Previous => flow
            .previous()
            .map(|step| {
                if step == Step::Exited {
                    tracing::debug!("left the session from the first question");
                }
            })
            .map_err(Rejected::from),
        Command::Jump(index) => flow.go_to(index).map_err(Rejected::from),
        Command::Explain => flow.toggle_explanation().map(|_| ()).map_err(Rejected::from),
        Command::List => {
            render_review_list(flow, output)?;
            Ok(())
        }
        Command::Quit => flow.back().map_err(Rejected::from),
        Command::Review | Command::Unknown(_) => {
            writeln!(
                output,
                "answer with a number or letter; n/p move, g <n> jumps, e explains, l lists, q quits"
            )?;
            Ok(())
        }
    };
    Ok(result)
}

fn answer(flow: &mut QuizFlow, index: usize) -> Result<(), Rejected> {
    let options = flow
        .current_question()
        .map(|question| question.record.options())
        .ok_or(SessionError::NotPracticing)?;
    let option = options
        .get(index)
        .cloned()
        .ok_or(Rejected::NoSuchOption {
            number: index + 1,
            available: options.len(),
        })?;
    flow.select_option(option)?;
    Ok(())
}

fn render_question<W: Write>(session: &QuizSession, out: &mut W) -> io::Result<()> {
    let question = session.current_question();
    let response = session.current_response();
    writeln!(out)?;
    writeln!(
        out,
        "[{}/{}] {}",
        session.current_index() + 1,
        session.total_questions(),
        question.record.question()
    )?;

    for (index, (option, state)) in question
        .record
        .options()
        .iter()
        .zip(session.option_states())
        .enumerate()
    {
        let label = index_to_letter(index).unwrap_or('*');
        let marker = match state {
            OptionState::Neutral => "  ",
            OptionState::Correct => "✓ ",
            OptionState::Incorrect => "✗ ",
            OptionState::Missed => "→ ",
        };
        writeln!(out, "  {marker}{}. ({label}) {option}", index + 1)?;
    }

    if response.is_some_and(|entry| entry.explanation_visible) {
        match question.record.explanation() {
            Some(text) => writeln!(out, "  Explanation: {text}")?,
            None => writeln!(out, "  (no explanation)")?,
        }
    }
    Ok(())
}

fn render_review_list<W: Write>(flow: &QuizFlow, out: &mut W) -> io::Result<()> {
    for item in flow.review_items().unwrap_or_default() {
        let status = match item.status {
            ReviewStatus::Unanswered => "·",
            ReviewStatus::Correct => "✓",
            ReviewStatus::Incorrect => "✗",
        };
        let cursor = if item.is_current { ">" } else { " " };
        writeln!(out, "{cursor} {:>3} {status}", item.index + 1)?;
    }
    Ok(())
}

fn render_summary<W: Write>(session: &QuizSession, out: &mut W) -> io::Result<()> {
    let score = session.score();
    writeln!(out)?;
    writeln!(out, "Finished: {} questions", score.total)?;
    writeln!(
        out,
        "  correct {} / attempted {} ({}%), unanswered {}",
        score.correct, score.attempted, score.accuracy, score.unanswered
    )?;
    if score.incorrect > 0 {
        writeln!(out, "  r: review {} incorrect answers", score.incorrect)?;
    }
    writeln!(out, "  q: quit")
}
