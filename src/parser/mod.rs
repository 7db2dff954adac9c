//! The parser-combinator engine.
//!
//! Small parsers are built from the leaves in this module and combined with
//! the operators on [`Parser`]:
//!
//! - `a >> b` parse both in order
//! - `a | b` ordered choice
//! - `a - b` / `a * b` keep only the left / right result
//! - `a.many()`, `a.many1()`, `a.repeat(2..=4)` repetition
//! - `a.optional()`, `a.ignore()`, `a.label("...")`, `a.map(f)`, `a.to(v)`
//!
//! Results are [`Value`]s whose [`Shape`] is known when the parser is built.
//! Use [`Parser::parse_as`] or [`Value::extract`] to get typed data back.

mod combinators;
mod config;
mod context;
mod diagnostic;
mod error;
mod leaf;
mod reference;
mod value;

pub use combinators::*;
pub use config::*;
pub use context::*;
pub use diagnostic::*;
pub use error::*;
pub use leaf::{
    ch, constant, element, element_if, end, integer, integer_radix, literal, satisfy,
    sequence_of, ws, Integer, Terminal,
};
pub use reference::reference;
pub use value::*;
