use crate::ast::expression::Expression;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `let name = initializer;`
    VariableDeclaration {
        name: String,
        initializer: Expression,
    },
    /// `name = value;`
    VariableAssignment { name: String, value: Expression },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    Return(Expression),
}
