//! Lexical building blocks. The language has no separate lexer, so
//! whitespace is skipped explicitly wherever it may appear.

use crate::parser::{ch, literal, satisfy, ws, Parser};

/// Any amount of whitespace, produces nothing.
pub fn ws_many() -> Parser<char> {
    ws().ignore().many()
}

/// At least one whitespace character, produces nothing.
pub fn ws1() -> Parser<char> {
    ws().ignore().many1()
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// ident := [a-zA-Z_] [a-zA-Z0-9_]*
pub fn ident() -> Parser<char> {
    (satisfy(is_ident_start, "identifier") >> satisfy(is_ident_continue, "identifier").many())
        .map(|(first, rest): (char, String)| format!("{first}{rest}"))
}

/// A keyword that must be present but is not kept.
pub fn keyword(text: &str) -> Parser<char> {
    literal(text).ignore()
}

/// Punctuation that must be present but is not kept.
pub fn punct(c: char) -> Parser<char> {
    ch(c).ignore()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_joins_head_and_tail() {
        assert_eq!(ident().parse_as::<String>("foo_1 bar"), Ok("foo_1".to_string()));
    }

    #[test]
    fn test_ident_rejects_leading_digit() {
        let failure = ident().parse("1abc").unwrap_err();
        assert_eq!(failure.diagnostics[0].expected, "identifier");
    }

    #[test]
    fn test_ws_many_accepts_nothing() {
        assert_eq!(ws_many().parse(""), Ok(crate::parser::Value::Nothing));
    }
}
