use std::fmt;

use tracing::trace;

use super::config::{LineTracking, ParseConfig};
use super::diagnostic::{Code, Diagnostic, Level};

/// Something a parser can consume one at a time.
///
/// `width` is what one element adds to [`Position::offset`]; for `char` it
/// is the UTF-8 length so offsets are byte offsets into the source text.
pub trait Element: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn width(&self) -> usize {
        1
    }

    fn is_line_break(&self) -> bool {
        false
    }

    /// How the element is named in an "expected ..." text.
    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

impl Element for char {
    fn width(&self) -> usize {
        self.len_utf8()
    }

    fn is_line_break(&self) -> bool {
        *self == '\n'
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl Element for u8 {
    fn is_line_break(&self) -> bool {
        *self == b'\n'
    }
}

/// Where the cursor is. `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Why a parser did not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The input did not match; an enclosing choice may try something else.
    Mismatch,
    /// The parse cannot continue at all, e.g. the nesting ceiling was hit.
    Abort,
}

pub type ParseResult<T> = Result<T, Failure>;

#[derive(Debug, Clone, Copy)]
struct SavedState {
    index: usize,
    position: Position,
    reporting: bool,
}

/// Cursor, diagnostics and backtracking stack for a single parse.
pub struct ParseContext<'a, E> {
    input: &'a [E],
    index: usize,
    position: Position,
    diagnostics: Vec<Diagnostic>,
    reporting: bool,
    saved: Vec<SavedState>,
    depth: usize,
    config: ParseConfig,
}

impl<'a, E: Element> ParseContext<'a, E> {
    pub fn new(input: &'a [E]) -> Self {
        Self::with_config(input, ParseConfig::default())
    }

    pub fn with_config(input: &'a [E], config: ParseConfig) -> Self {
        Self {
            input,
            index: 0,
            position: Position::default(),
            diagnostics: Vec::new(),
            reporting: true,
            saved: Vec::new(),
            depth: 0,
            config,
        }
    }

    /// The unconsumed remainder of the input.
    pub fn input(&self) -> &'a [E] {
        &self.input[self.index..]
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.input.len()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Number of elements consumed so far.
    pub fn consumed(&self) -> usize {
        self.index
    }

    /// Advances the cursor past the next `count` elements.
    pub fn consume(&mut self, count: usize) {
        let end = (self.index + count).min(self.input.len());
        for element in &self.input[self.index..end] {
            self.position.offset += element.width();
            match self.config.line_tracking {
                LineTracking::Newlines if element.is_line_break() => {
                    self.position.line += 1;
                    self.position.column = 1;
                }
                _ => self.position.column += 1,
            }
        }
        self.index = end;
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_reporting(&self) -> bool {
        self.reporting
    }

    pub fn set_reporting(&mut self, reporting: bool) {
        self.reporting = reporting;
    }

    /// Records a diagnostic at the current position, unless reporting is off.
    pub fn push_diagnostic(&mut self, level: Level, code: Code, expected: impl Into<String>) {
        if self.reporting {
            self.diagnostics.push(Diagnostic {
                level,
                code,
                expected: expected.into(),
                position: self.position,
            });
        }
    }

    /// Shorthand for an [`Level::Error`] diagnostic.
    pub fn report(&mut self, code: Code, expected: impl Into<String>) {
        self.push_diagnostic(Level::Error, code, expected);
    }

    /// Replaces the "expected" text of the most recent diagnostic.
    pub fn relabel_last(&mut self, expected: &str) {
        if !self.reporting {
            return;
        }
        if let Some(last) = self.diagnostics.last_mut() {
            last.expected = expected.to_string();
        }
    }

    /// Pushes the cursor and reporting flag so a speculative attempt can be
    /// undone.
    pub fn save_state(&mut self) {
        self.saved.push(SavedState {
            index: self.index,
            position: self.position,
            reporting: self.reporting,
        });
    }

    /// Pops the last saved state and rewinds the cursor and reporting flag to it.
    pub fn restore_state(&mut self) {
        if let Some(state) = self.saved.pop() {
            trace!(
                from = self.position.offset,
                to = state.position.offset,
                "rolling back speculative attempt"
            );
            self.index = state.index;
            self.position = state.position;
            self.reporting = state.reporting;
        }
    }

    /// Pops the last saved state, keeping the cursor where it is now.
    ///
    /// The reporting flag goes back to its saved value.
    pub fn discard_saved_state(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.reporting = state.reporting;
        }
    }

    pub fn saved_states(&self) -> usize {
        self.saved.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Enters one level of reference nesting. Returns `false` (after
    /// recording a fatal diagnostic) when the configured ceiling is hit.
    pub(crate) fn enter(&mut self, what: &str) -> bool {
        if let Some(max) = self.config.max_depth {
            if self.depth >= max {
                self.diagnostics.push(Diagnostic {
                    level: Level::Fatal,
                    code: Code::RecursionLimit,
                    expected: format!("at most {max} nested {what}"),
                    position: self.position,
                });
                return false;
            }
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl ParseContext<'_, char> {
    /// The unconsumed remainder as a string.
    pub fn rest(&self) -> String {
        self.input().iter().collect()
    }
}
