use crate::scalar_value;

pub mod expression;
pub mod statement;

pub use expression::{BinaryOp, Expression, UnaryOp};
pub use statement::Statement;

/// `fn name(parameters) { body tail }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Vec<Statement>,
    /// Expression after the last statement, the function's result.
    pub tail: Option<Expression>,
}

/// A whole source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unit {
    pub functions: Vec<Function>,
}

scalar_value!(Expression, Statement, Function, Unit, UnaryOp, BinaryOp);
