/// Nesting ceiling used when no explicit limit is configured.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How [`ParseContext::consume`](super::ParseContext::consume) advances
/// line and column numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTracking {
    /// Line breaks in consumed input start a new line at column 1.
    #[default]
    Newlines,
    /// Every consumed element advances the column; the line never changes.
    ColumnsOnly,
}

/// Per-parse settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Maximum number of nested reference entries, `None` for no ceiling.
    pub max_depth: Option<usize>,
    pub line_tracking: LineTracking,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            line_tracking: LineTracking::default(),
        }
    }
}

impl ParseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn without_depth_limit(mut self) -> Self {
        self.max_depth = None;
        self
    }

    pub fn with_line_tracking(mut self, tracking: LineTracking) -> Self {
        self.line_tracking = tracking;
        self
    }
}
