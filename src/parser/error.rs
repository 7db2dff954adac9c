use thiserror::Error;

/// A grammar that was put together wrongly. Raised while building parsers,
/// never while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("only a reference can be assigned, this parser produces `{0}`")]
    NotAReference(String),

    #[error("reference to `{0}` is already assigned")]
    AlreadyAssigned(&'static str),

    #[error("expected a parser producing `{expected}`, found one producing `{found}`")]
    ShapeMismatch { expected: String, found: String },
}
