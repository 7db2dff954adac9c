//! Expression parsers, one layer per precedence level:
//!
//! ```text
//! expression := sum (compare_op sum)*
//! sum        := product (sum_op product)*
//! product    := unary (product_op unary)*
//! unary      := unary_op* simple
//! simple     := constant | call | variable | "(" expression ")"
//! ```

use crate::ast::{BinaryOp, Expression, UnaryOp};
use crate::parser::{ch, integer, literal, reference, Parser};

use super::literal::{ident, punct, ws_many};

fn unary_op() -> Parser<char> {
    ch('+').to(UnaryOp::Plus) | ch('-').to(UnaryOp::Minus)
}

fn product_op() -> Parser<char> {
    ch('*').to(BinaryOp::Multiply) | ch('/').to(BinaryOp::Divide)
}

fn sum_op() -> Parser<char> {
    ch('+').to(BinaryOp::Add) | ch('-').to(BinaryOp::Subtract)
}

/// Two-character operators come before their one-character prefixes.
fn compare_op() -> Parser<char> {
    literal("!=").to(BinaryOp::NotEqual)
        | literal("==").to(BinaryOp::Equal)
        | literal("<=").to(BinaryOp::LessThanOrEqual)
        | literal("<").to(BinaryOp::LessThan)
        | literal(">=").to(BinaryOp::GreaterThanOrEqual)
        | literal(">").to(BinaryOp::GreaterThan)
}

/// `operand (op operand)*`, folded into a left-leaning tree.
fn left_associative(operand: Parser<char>, op: Parser<char>) -> Parser<char> {
    (operand.clone() >> ws_many() >> (ws_many() >> op >> ws_many() >> operand).many()).map(
        |(first, rest): (Expression, Vec<(BinaryOp, Expression)>)| {
            rest.into_iter()
                .fold(first, |lhs, (op, rhs)| Expression::binary(op, lhs, rhs))
        },
    )
}

/// An odd number of `-` prefixes negates once, `+` prefixes are dropped.
fn apply_unary((ops, operand): (Vec<UnaryOp>, Expression)) -> Expression {
    let minus = ops.iter().filter(|op| **op == UnaryOp::Minus).count();
    if minus % 2 == 0 {
        operand
    } else {
        Expression::unary(UnaryOp::Minus, operand)
    }
}

/// The full expression grammar.
pub fn expression() -> Parser<char> {
    let nested = reference::<char, Expression>();

    let constant = integer::<i32>().map(Expression::Constant);
    let variable = ident().map(Expression::Variable);
    let bracket = punct('(') >> ws_many() >> nested.clone() >> ws_many() >> punct(')');

    let arguments = nested.clone().separated_by(ws_many() >> ',' >> ws_many());
    let call = (ident() >> ws_many() >> punct('(') >> ws_many() >> arguments.optional()
        >> ws_many()
        >> punct(')'))
    .map(|(name, args): (String, Option<Vec<Expression>>)| {
        Expression::call(name, args.unwrap_or_default())
    });

    let simple = constant | call | variable | bracket;
    let unary = ((ws_many() >> unary_op()).many() >> ws_many() >> simple).map(apply_unary);
    let product = left_associative(unary, product_op());
    let sum = left_associative(product, sum_op());
    let compare = left_associative(sum, compare_op()).label("expression");

    nested
        .assign(&compare)
        .expect("expression reference is fresh and produces an Expression");
    compare
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Expression {
        expression().parse_as::<Expression>(input).unwrap()
    }

    #[test]
    fn test_constant() {
        assert_eq!(parse("42"), Expression::constant(42));
    }

    #[test]
    fn test_sum_is_left_associative() {
        assert_eq!(
            parse("a - b - c"),
            Expression::binary(
                BinaryOp::Subtract,
                Expression::binary(
                    BinaryOp::Subtract,
                    Expression::variable("a"),
                    Expression::variable("b")
                ),
                Expression::variable("c")
            )
        );
    }

    #[test]
    fn test_double_minus_cancels() {
        assert_eq!(parse("--x"), Expression::variable("x"));
        assert_eq!(
            parse("- + -  - y"),
            Expression::unary(UnaryOp::Minus, Expression::variable("y"))
        );
    }

    #[test]
    fn test_call_without_arguments() {
        assert_eq!(parse("f()"), Expression::call("f", vec![]));
    }

    #[test]
    fn test_compare_prefers_two_character_operators() {
        assert_eq!(
            parse("a <= b"),
            Expression::binary(
                BinaryOp::LessThanOrEqual,
                Expression::variable("a"),
                Expression::variable("b")
            )
        );
    }
}
