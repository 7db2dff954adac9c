//! # Braid - A Parser-Combinator Engine
//!
//! Braid builds parsers out of small immutable values combined with
//! operators, and runs them over a slice of input elements (usually
//! characters). There is no separate lexer: whitespace is part of the
//! grammar.
//!
//! ## Architecture Overview
//!
//! 1. **Engine** (`parser`) - Parse context, leaf parsers, the combinator
//!    algebra, forward references and diagnostics
//! 2. **AST** (`ast`) - Tree of a small imperative language
//! 3. **Grammar** (`grammar`) - That language's grammar, written purely with
//!    the engine's combinators
//! 4. **Formatting** (`fmt`) - Prints the tree back as text
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [Parser<char>] → Value (runtime-typed result)
//!     ↓
//! [FromValue] → ast::Unit / ast::Expression / ...
//! ```
//!
//! ## Key Design Decisions
//!
//! ### Result shapes
//! Every parser knows the shape of its result when it is built:
//!
//! - sequences drop parts that produce nothing and collapse a single survivor
//! - choices with one distinct result type produce it directly, otherwise a
//!   tagged union
//! - repeating a character parser produces a `String`, anything else a list
//!
//! Transformations are checked against that shape at construction, so a
//! grammar that would hand a closure the wrong type fails to build.
//!
//! ### Backtracking
//! Only choices, optionals and the extra rounds of a repetition speculate.
//! They save the cursor, turn diagnostics off, and restore both on failure.
//! A plain sequence never rewinds.
//!
//! ## Example
//!
//! ```
//! use braid::parser::{ch, integer, ws};
//!
//! let pair = (integer::<i32>() >> ws().ignore().many() >> ch(',').ignore()
//!     >> ws().ignore().many() >> integer::<i32>())
//!     .map(|(a, b): (i32, i32)| a + b);
//!
//! assert_eq!(pair.parse_as::<i32>("3, 4"), Ok(7));
//! ```

pub mod ast;
pub mod fmt;
pub mod grammar;
pub mod parser;
