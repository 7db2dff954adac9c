//! Statement parsers. Each one needs the expression grammar, and `while`
//! needs a reference to the full statement grammar for its body.

use crate::ast::{Expression, Statement};
use crate::parser::Parser;

use super::literal::{ident, keyword, punct, ws1, ws_many};

/// return_statement := "return" expression ";"
pub fn return_statement(expression: &Parser<char>) -> Parser<char> {
    (keyword("return") >> ws_many() >> expression.clone() >> ws_many() >> punct(';'))
        .map(Statement::Return)
}

/// variable_declaration := "let" ident "=" expression ";"
pub fn variable_declaration(expression: &Parser<char>) -> Parser<char> {
    (keyword("let")
        >> ws1()
        >> ident()
        >> ws_many()
        >> punct('=')
        >> ws_many()
        >> expression.clone()
        >> ws_many()
        >> punct(';'))
    .map(|(name, initializer): (String, Expression)| Statement::VariableDeclaration {
        name,
        initializer,
    })
}

/// variable_assignment := ident "=" expression ";"
pub fn variable_assignment(expression: &Parser<char>) -> Parser<char> {
    (ident() >> ws_many() >> punct('=') >> ws_many() >> expression.clone() >> ws_many() >> punct(';'))
        .map(|(name, value): (String, Expression)| Statement::VariableAssignment { name, value })
}

/// while_statement := "while" expression "{" statement* "}"
pub fn while_statement(expression: &Parser<char>, statement: &Parser<char>) -> Parser<char> {
    (keyword("while")
        >> ws1()
        >> expression.clone()
        >> ws_many()
        >> punct('{')
        >> ws_many()
        >> (statement.clone() >> ws_many()).many()
        >> punct('}'))
    .map(|(condition, body): (Expression, Vec<Statement>)| Statement::While { condition, body })
}
