//! json-canon CLI.
//!
//! Parses JSON and prints its canonical form, validates documents, runs the
//! escape codec on a single argument and runs conformance corpora.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::{error, LevelFilter};

use json_canon::conformance::{CorpusRunner, TestResult};
use json_canon::error::{ParseError, ParseErrorKind};
use json_canon::json::lexer::Position;
use json_canon::json::{self, JsonObject, JsonValue, Limits};

#[derive(Parser)]
#[command(name = "json-canon")]
#[command(about = "Canonical JSON parser and serializer", long_about = None)]
#[command(version)]
struct Cli {
    /// Use the strict limits preset for untrusted input
    #[arg(long, global = true)]
    strict: bool,

    /// Override the maximum nesting depth
    #[arg(long, global = true, value_name = "N")]
    max_depth: Option<u64>,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information
    Version,

    /// Parse a document and print its canonical form
    Canon {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Check that a document parses
    Check {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Escape TEXT as the body of a string literal
    Escape {
        /// Text to escape
        text: String,
    },

    /// Decode the escapes in TEXT
    Unescape {
        /// Escaped text
        text: String,
    },

    /// Run a conformance corpus
    Corpus {
        /// Path to the corpus file
        path: PathBuf,
    },
}

impl Cli {
    fn limits(&self) -> Limits {
        let limits = if self.strict {
            Limits::strict()
        } else {
            Limits::lenient()
        };
        match self.max_depth {
            Some(depth) => limits.with_max_nesting_depth(depth),
            None => limits,
        }
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn read_document(file: Option<&PathBuf>, limits: Limits) -> Result<JsonValue, ParseError> {
    match file {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                Position::default().error(ParseErrorKind::Io(format!("{}: {e}", path.display())))
            })?;
            json::from_reader(file, limits)
        }
        None => json::from_reader(io::stdin().lock(), limits),
    }
}

/// `{"err":{"code":..,"name":..,"message":..,"offset":..,"line":..,"column":..}}`
fn error_report(kind: &ParseErrorKind, message: String, position: Position) -> String {
    let mut err = JsonObject::new();
    let built = err
        .set("code", kind.code())
        .and_then(|e| e.set("name", kind.name()))
        .and_then(|e| e.set("message", message))
        .and_then(|e| e.set("offset", position.offset))
        .and_then(|e| e.set("line", position.line))
        .and_then(|e| e.set("column", position.column))
        .map(|_| ());
    let mut report = JsonObject::new();
    match built.and_then(|()| report.set("err", err).map(|_| ())) {
        Ok(()) => json::to_string(&report.into()),
        Err(e) => format!("{{\"err\":{{\"message\":\"{}\"}}}}", json::escape(&e.to_string())),
    }
}

fn parse_error_report(err: &ParseError) -> String {
    let position = Position {
        offset: err.offset,
        line: err.line,
        column: err.column,
    };
    error_report(&err.kind, err.to_string(), position)
}

fn run_document(file: Option<&PathBuf>, limits: Limits, canonical: bool) -> ExitCode {
    match read_document(file, limits) {
        Ok(value) => {
            if canonical {
                println!("{value}");
            } else {
                println!("{{\"ok\":true}}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            println!("{}", parse_error_report(&err));
            ExitCode::FAILURE
        }
    }
}

fn run_unescape(text: &str) -> ExitCode {
    match json::unescape(text) {
        Ok(decoded) => {
            println!("{decoded}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let offset = err.index as u64;
            let position = Position {
                offset,
                line: 1,
                column: offset + 1,
            };
            let message = err.to_string();
            let kind = ParseErrorKind::from(err.kind);
            println!("{}", error_report(&kind, message, position));
            ExitCode::FAILURE
        }
    }
}

fn run_corpus(path: &PathBuf) -> ExitCode {
    let runner = match CorpusRunner::load(path) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("Failed to load corpus: {err}");
            return ExitCode::from(2);
        }
    };

    let results = runner.run_all();
    for (id, result) in &results.details {
        match result {
            TestResult::Fail { expected, actual } => {
                println!("FAIL {id} - expected: {expected}, actual: {actual}");
            }
            TestResult::Error { message } => println!("ERROR {id} - {message}"),
            TestResult::Skip { reason } => println!("SKIP {id} - {reason}"),
            TestResult::Pass => {}
        }
    }
    println!("{}", results.summary());

    if results.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let limits = cli.limits();

    match &cli.command {
        Some(Commands::Version) => {
            println!("json-canon v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Some(Commands::Canon { file }) => run_document(file.as_ref(), limits, true),
        Some(Commands::Check { file }) => run_document(file.as_ref(), limits, false),
        Some(Commands::Escape { text }) => {
            println!("{}", json::escape(text));
            ExitCode::SUCCESS
        }
        Some(Commands::Unescape { text }) => run_unescape(text),
        Some(Commands::Corpus { path }) => run_corpus(path),
        None => {
            println!("json-canon v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
            ExitCode::SUCCESS
        }
    }
}
