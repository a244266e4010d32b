mod logging;
mod terminal;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use quiz_core::model::TopicId;
use services::{QuizFlow, SessionPlan, TopicService};

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    NoFiles,
    TopicNameWithManyFiles,
    InvalidShuffle { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::NoFiles => write!(f, "at least one CSV file is required"),
            ArgsError::TopicNameWithManyFiles => {
                write!(f, "--topic can only be used with a single file")
            }
            ArgsError::InvalidShuffle { raw } => write!(f, "invalid QUIZ_SHUFFLE value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, PartialEq, Eq)]
enum Parsed {
    Run(Args),
    Help,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    topic: Option<String>,
    shuffle: bool,
    files: Vec<PathBuf>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--topic <name>] [--shuffle] <file.csv>...");
    eprintln!();
    eprintln!("One file starts a session over that topic. Several files, or --shuffle,");
    eprintln!("start one shuffled session over every imported topic.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_SHUFFLE (true/false), QUIZ_LOG (tracing filter, default info)");
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl Args {
    fn parse(
        args: impl IntoIterator<Item = String>,
        shuffle_env: Option<String>,
    ) -> Result<Parsed, ArgsError> {
        let mut shuffle = match shuffle_env {
            Some(raw) => parse_flag(&raw).ok_or(ArgsError::InvalidShuffle { raw })?,
            None => false,
        };
        let mut topic = None;
        let mut files = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--topic" => topic = Some(require_value(&mut args, "--topic")?),
                "--shuffle" => shuffle = true,
                "--help" | "-h" => return Ok(Parsed::Help),
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => files.push(PathBuf::from(arg)),
            }
        }

        if files.is_empty() {
            return Err(ArgsError::NoFiles);
        }
        if topic.is_some() && files.len() > 1 {
            return Err(ArgsError::TopicNameWithManyFiles);
        }
        Ok(Parsed::Run(Self {
            topic,
            shuffle,
            files,
        }))
    }

    fn mixed(&self) -> bool {
        self.shuffle || self.files.len() > 1
    }
}

/// Topic name for a file: the explicit name, or the file stem.
fn topic_name(explicit: Option<&str>, path: &Path) -> String {
    explicit.map(str::to_owned).unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    })
}

fn import_files(
    service: &mut TopicService,
    args: &Args,
) -> Result<Vec<TopicId>, Box<dyn std::error::Error>> {
    let mut ids = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let text = std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
        let name = topic_name(args.topic.as_deref(), path);
        let outcome = service
            .import_topic(&name, &text)
            .map_err(|err| format!("{}: {err}", path.display()))?;

        eprintln!(
            "imported \"{}\": {} questions",
            outcome.topic.name(),
            outcome.topic.question_count()
        );
        for diagnostic in &outcome.diagnostics {
            eprintln!("  line {}: {}", diagnostic.line, diagnostic.reason);
        }
        ids.push(outcome.topic.id());
    }
    Ok(ids)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let shuffle_env = std::env::var("QUIZ_SHUFFLE").ok();
    let args = match Args::parse(std::env::args().skip(1), shuffle_env) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            print_usage();
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    logging::init_logging()?;

    let mut service = TopicService::default();
    let ids = import_files(&mut service, &args)?;

    let plan: SessionPlan = match ids.as_slice() {
        [only] if !args.mixed() => service.plan_topic(*only)?,
        _ => service.plan_mixed(&ids, true, &mut rand::rng())?,
    };

    let mut flow = QuizFlow::new();
    flow.start_plan(plan)?;

    let stdin = io::stdin();
    terminal::run(&mut flow, stdin.lock(), io::stdout().lock())?;
    Ok(())
}

/// Argument errors are followed by the usage text.
fn wants_usage(err: &(dyn std::error::Error + 'static)) -> bool {
    err.is::<ArgsError>()
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        if wants_usage(err.as_ref()) {
            print_usage();
        }
        std::process::exit(2);
    }
}
