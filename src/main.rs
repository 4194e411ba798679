use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox as lox;

use lox::ast_printer::AstPrinter;
use lox::parser::Parser;
use lox::scanner::Scanner;
use lox::session::{Outcome, Session, EXIT_STATIC_ERROR};

/// Exit status for command‑line usage errors.
const EXIT_USAGE: i32 = 64;

#[derive(ClapParser, Debug)]
#[command(
    version,
    about = "Lox language interpreter",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Script to run; without one an interactive prompt starts
    script: Option<PathBuf>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print tokens as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints the syntax tree of each statement
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },
}

/// Reads the contents of a file as UTF‑8 text.
fn read_file(filename: &PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    String::from_utf8(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'rox::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn report(outcome: &Outcome) {
    for diagnostic in outcome.diagnostics() {
        eprintln!("{}", diagnostic);
    }
}

fn run_file(filename: &PathBuf) -> Result<()> {
    info!("Running {:?}", filename);

    let source = read_file(filename)?;
    let mut session = Session::new();

    let outcome = session.run(&source);
    report(&outcome);

    if !outcome.is_success() {
        debug!("Run failed, exiting with code {}", outcome.exit_code());
        std::process::exit(outcome.exit_code());
    }

    info!("Program executed successfully");
    Ok(())
}

/// Line‑at‑a‑time prompt sharing one session.  Errors are reported and the
/// prompt carries on; EOF ends it.
fn run_prompt() -> Result<()> {
    info!("Starting interactive prompt");

    let mut session = Session::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush prompt")?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        let outcome = session.run(&line);
        report(&outcome);
    }

    info!("Prompt closed");
    Ok(())
}

fn tokenize(filename: &PathBuf, json: bool) -> Result<()> {
    info!("Running Tokenize subcommand");

    let source = read_file(filename)?;
    let mut tokenized = true;

    for item in Scanner::new(&source) {
        match item {
            Ok(token) if json => println!("{}", serde_json::to_string(&token)?),
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code {}", EXIT_STATIC_ERROR);
        std::process::exit(EXIT_STATIC_ERROR);
    }

    Ok(())
}

fn parse(filename: &PathBuf) -> Result<()> {
    info!("Running Parse subcommand");

    let source = read_file(filename)?;
    let (tokens, lex_errors) = Scanner::new(&source).scan_tokens();

    let parsed = Parser::new(tokens).parse();

    let mut errors = lex_errors;
    match parsed {
        Ok(statements) if errors.is_empty() => {
            for stmt in &statements {
                println!("{}", AstPrinter::print_stmt(stmt));
            }
            Ok(())
        }
        Ok(_) => {
            report(&Outcome::StaticErrors(errors));
            std::process::exit(EXIT_STATIC_ERROR);
        }
        Err(parse_errors) => {
            errors.extend(parse_errors);
            report(&Outcome::StaticErrors(errors));
            std::process::exit(EXIT_STATIC_ERROR);
        }
    }
}

fn evaluate(filename: &PathBuf) -> Result<()> {
    info!("Running Evaluate subcommand");

    let source = read_file(filename)?;
    let mut session = Session::new();

    match session.evaluate(&source) {
        Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        Err(outcome) => {
            report(&outcome);
            std::process::exit(outcome.exit_code());
        }
    }
}

fn main() -> Result<()> {
    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(
            e.kind(),
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion
        ) =>
        {
            e.exit()
        }
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: rox [script]");
            std::process::exit(EXIT_USAGE);
        }
    };

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match (args.command, args.script) {
        (Some(Commands::Tokenize { filename, json }), _) => tokenize(&filename, json),
        (Some(Commands::Parse { filename }), _) => parse(&filename),
        (Some(Commands::Evaluate { filename }), _) => evaluate(&filename),
        (Some(Commands::Run { filename }), _) | (None, Some(filename)) => run_file(&filename),
        (None, None) => run_prompt(),
    }
}
