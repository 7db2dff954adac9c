use std::fmt;

use super::context::Position;

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Fatal,
    Error,
    Warning,
    Info,
    Hint,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Hint => "hint",
        }
    }
}

/// What went wrong, independent of the human-readable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    UnexpectedEndOfInput,
    UnexpectedInput,
    OutOfRange,
    Generic,
    /// Nesting through references exceeded `ParseConfig::max_depth`.
    RecursionLimit,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Code::UnexpectedEndOfInput => "unexpected end of input",
            Code::UnexpectedInput => "unexpected input",
            Code::OutOfRange => "out of range",
            Code::Generic => "generic",
            Code::RecursionLimit => "recursion limit",
        }
    }
}

/// A single message produced while parsing.
///
/// `expected` names what the failing leaf was looking for, e.g. `'class'`
/// or `an integer`. A [`label`](super::Parser::label) replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub code: Code,
    pub expected: String,
    pub position: Position,
}

impl Diagnostic {
    pub fn offset(&self) -> usize {
        self.position.offset
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} at {}:{}",
            self.level.as_str(),
            self.code.as_str(),
            self.position.line,
            self.position.column
        )?;
        if !self.expected.is_empty() {
            write!(f, ", expected {}", self.expected)?;
        }
        Ok(())
    }
}

/// The diagnostics of a top-level parse that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.diagnostics))]
pub struct ParseFailure {
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseFailure {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// The diagnostic the caller most likely wants to show first.
    pub fn primary(&self) -> Option<&Diagnostic> {
        self.diagnostics
            .iter()
            .find(|d| d.level == Level::Fatal)
            .or_else(|| self.diagnostics.last())
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

fn render(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => "parse failed".to_string(),
        [single] => single.to_string(),
        many => many
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
