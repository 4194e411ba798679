//! One interpretation session: the whole pipeline behind a single call.
//!
//! A `Session` keeps one interpreter (and so one global scope) alive across
//! source units, which is what the interactive prompt needs.  Each unit goes
//! text → tokens → AST → distance table → execution; static errors from the
//! first three stages are all collected before deciding whether to run.

use std::io::Write;

use log::{debug, info};

use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::value::Value;

/// Exit status for lexical, syntax and resolution errors.
pub const EXIT_STATIC_ERROR: i32 = 65;

/// Exit status for an uncaught runtime error.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Result of running one source unit.
#[derive(Debug)]
pub enum Outcome {
    Completed,

    /// Lexical, syntax or resolution errors, in discovery order.  Nothing
    /// was executed.
    StaticErrors(Vec<LoxError>),

    /// Execution started and was aborted by this error.
    RuntimeError(LoxError),
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed => 0,
            Outcome::StaticErrors(_) => EXIT_STATIC_ERROR,
            Outcome::RuntimeError(_) => EXIT_RUNTIME_ERROR,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    /// Every diagnostic to show the user, one per error.
    pub fn diagnostics(&self) -> Vec<&LoxError> {
        match self {
            Outcome::Completed => Vec::new(),
            Outcome::StaticErrors(errors) => errors.iter().collect(),
            Outcome::RuntimeError(error) => vec![error],
        }
    }
}

pub struct Session {
    interpreter: Interpreter,
    next_id: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::from_interpreter(Interpreter::new())
    }

    /// A session whose `print` statements write to `out`.
    pub fn with_output<W: Write + 'static>(out: W) -> Self {
        Self::from_interpreter(Interpreter::with_output(out))
    }

    fn from_interpreter(interpreter: Interpreter) -> Self {
        info!("Session started");

        Self {
            interpreter,
            next_id: 0,
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Scan, parse, resolve and execute one source unit.
    pub fn run(&mut self, source: &str) -> Outcome {
        let (tokens, mut errors) = Scanner::new(source).scan_tokens();

        let mut parser: Parser = Parser::new(tokens).with_first_id(self.next_id);
        let parsed = parser.parse();
        self.next_id = parser.next_id();

        let statements = match parsed {
            Ok(statements) => statements,
            Err(parse_errors) => {
                errors.extend(parse_errors);
                return Outcome::StaticErrors(errors);
            }
        };

        if !errors.is_empty() {
            debug!("Lexical errors suppress execution");
            return Outcome::StaticErrors(errors);
        }

        match Resolver::new().resolve(&statements) {
            Ok(locals) => self.interpreter.resolve(locals),
            Err(resolve_errors) => return Outcome::StaticErrors(resolve_errors),
        }

        match self.interpreter.interpret(&statements) {
            Ok(()) => Outcome::Completed,
            Err(e) => {
                debug!("Runtime error: {}", e);
                Outcome::RuntimeError(e)
            }
        }
    }

    /// Scan and parse `source` as a single expression and evaluate it
    /// against the session's globals.
    pub fn evaluate(&mut self, source: &str) -> Result<Value, Outcome> {
        let (tokens, mut errors) = Scanner::new(source).scan_tokens();

        let mut parser: Parser = Parser::new(tokens).with_first_id(self.next_id);
        let parsed = parser.parse_expression();
        self.next_id = parser.next_id();

        let expr = match parsed {
            Ok(expr) if errors.is_empty() => expr,
            Ok(_) => return Err(Outcome::StaticErrors(errors)),
            Err(parse_errors) => {
                errors.extend(parse_errors);
                return Err(Outcome::StaticErrors(errors));
            }
        };

        self.interpreter.evaluate(&expr).map_err(Outcome::RuntimeError)
    }
}
