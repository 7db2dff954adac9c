//! Display implementations for the AST.

use std::fmt::{self, Display};

use crate::ast::{Expression, Function, Statement, Unit};

const INDENT: &str = "    ";

struct Formatter {
    buffer: String,
    indent_level: usize,
}

impl Formatter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
    }

    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn write_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn finish(self) -> String {
        self.buffer
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{value}"),
            Expression::Variable(name) => f.write_str(name),
            Expression::Unary { op, operand } => write!(f, "{}{operand}", op.symbol()),
            Expression::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Expression::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_statement(self, &mut formatter);
        f.write_str(&formatter.finish())
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_function(self, &mut formatter);
        f.write_str(&formatter.finish())
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        for (i, function) in self.functions.iter().enumerate() {
            if i > 0 {
                formatter.write_newline();
            }
            format_function(function, &mut formatter);
            formatter.write_newline();
        }
        f.write_str(&formatter.finish())
    }
}

fn format_function(function: &Function, fmt: &mut Formatter) {
    fmt.write_str("fn ");
    fmt.write_str(&function.name);
    fmt.write_str("(");
    fmt.write_str(&function.parameters.join(", "));
    fmt.write_str(") {");
    fmt.write_newline();

    fmt.indent();
    for statement in &function.body {
        fmt.write_indent();
        format_statement(statement, fmt);
        fmt.write_newline();
    }
    if let Some(tail) = &function.tail {
        fmt.write_indent();
        fmt.write_str(&tail.to_string());
        fmt.write_newline();
    }
    fmt.dedent();

    fmt.write_indent();
    fmt.write_str("}");
}

fn format_statement(statement: &Statement, fmt: &mut Formatter) {
    match statement {
        Statement::VariableDeclaration { name, initializer } => {
            fmt.write_str(&format!("let {name} = {initializer};"));
        }
        Statement::VariableAssignment { name, value } => {
            fmt.write_str(&format!("{name} = {value};"));
        }
        Statement::Return(value) => {
            fmt.write_str(&format!("return {value};"));
        }
        Statement::While { condition, body } => {
            fmt.write_str(&format!("while {condition} {{"));
            fmt.write_newline();
            fmt.indent();
            for statement in body {
                fmt.write_indent();
                format_statement(statement, fmt);
                fmt.write_newline();
            }
            fmt.dedent();
            fmt.write_indent();
            fmt.write_str("}");
        }
    }
}
