//! Grammar of a small imperative language, built from the combinators in
//! [`crate::parser`].
//!
//! ```text
//! unit     := function*
//! function := "fn" ident "(" [ident ("," ident)*] ")" "{" statement* [expression] "}"
//! ```

mod expression;
mod literal;
mod statement;

use crate::ast::{Expression, Function, Statement, Unit};
use crate::parser::{end, reference, Parser};

pub use literal::{ident, ws1, ws_many};

use literal::{keyword, punct};

/// Every entry point of the grammar, all producing AST nodes.
///
/// Each `Grammar` owns its own parsers; building one is cheap enough to do
/// per use, and a built grammar can be shared between threads.
#[derive(Debug, Clone)]
pub struct Grammar {
    /// Produces [`Expression`].
    pub expression: Parser<char>,
    /// Produces [`Statement`].
    pub statement: Parser<char>,
    pub return_statement: Parser<char>,
    pub variable_declaration: Parser<char>,
    pub variable_assignment: Parser<char>,
    pub while_statement: Parser<char>,
    /// Produces [`Function`].
    pub function: Parser<char>,
    /// Produces [`Unit`], requires the whole input to be consumed.
    pub unit: Parser<char>,
}

/// `parser` surrounded by optional whitespace, followed by the end of input.
///
/// Produces whatever `parser` produces.
pub fn complete(parser: &Parser<char>) -> Parser<char> {
    ws_many() >> parser.clone() >> ws_many() >> end::<char>()
}

impl Grammar {
    pub fn new() -> Self {
        let expression = expression::expression();

        let nested = reference::<char, Statement>();
        let return_statement = statement::return_statement(&expression);
        let variable_declaration = statement::variable_declaration(&expression);
        let variable_assignment = statement::variable_assignment(&expression);
        let while_statement = statement::while_statement(&expression, &nested);

        // `return` and `let` before assignment, which would accept them as identifiers.
        let statement = return_statement.clone()
            | variable_declaration.clone()
            | variable_assignment.clone()
            | while_statement.clone();
        nested
            .assign(&statement)
            .expect("statement reference is fresh and produces a Statement");

        let function = function(&expression, &statement);
        let unit = (function.clone().wrap(ws_many()).many() >> ws_many() >> end::<char>())
            .map(|functions: Vec<Function>| Unit { functions });

        Self {
            expression,
            statement,
            return_statement,
            variable_declaration,
            variable_assignment,
            while_statement,
            function,
            unit,
        }
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

fn function(expression: &Parser<char>, statement: &Parser<char>) -> Parser<char> {
    let parameters = ident().separated_by(ws_many() >> ',' >> ws_many());
    (keyword("fn")
        >> ws1()
        >> ident()
        >> ws_many()
        >> punct('(')
        >> ws_many()
        >> parameters.optional()
        >> ws_many()
        >> punct(')')
        >> ws_many()
        >> punct('{')
        >> ws_many()
        >> (statement.clone() >> ws_many()).many()
        >> expression.clone().optional()
        >> ws_many()
        >> punct('}'))
    .map(
        |(name, parameters, body, tail): (
            String,
            Option<Vec<String>>,
            Vec<Statement>,
            Option<Expression>,
        )| Function {
            name,
            parameters: parameters.unwrap_or_default(),
            body,
            tail,
        },
    )
}
