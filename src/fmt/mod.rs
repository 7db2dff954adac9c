//! Code formatting for the toy language.
//!
//! Expressions print fully parenthesized, so two trees print the same text
//! exactly when they have the same structure.

mod surface;
