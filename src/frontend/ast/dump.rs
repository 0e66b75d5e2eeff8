//! Deterministic textual dump of the syntax tree, used by `-ast` mode and
//! golden tests. Spans are left out so the output only depends
//! on the structure and literal values.

use itertools::Itertools;

use super::{Block, CompUnit, Expression, ExpressionKind, FuncDef, Stmt, StmtKind};

impl core::fmt::Display for CompUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompUnit {{ {} }}", self.func_def)
    }
}

impl core::fmt::Display for FuncDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FuncDef {{ FuncType {{ {} }}, {}, {} }}",
            self.func_type, self.ident.name, self.block
        )
    }
}

impl core::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Block {{ {} }}",
            self.statements().iter().map(|s| s.to_string()).join(", ")
        )
    }
}

impl core::fmt::Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            StmtKind::Return(expression) => write!(f, "Stmt {{ return {expression}; }}"),
        }
    }
}

impl core::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExpressionKind::Number(value) => write!(f, "Number({value})"),
            ExpressionKind::Unary { operator, operand } => {
                write!(f, "UnaryExp({operator}, {operand})")
            }
            ExpressionKind::Add { operator, lhs, rhs } => {
                write!(f, "AddExp({operator}, {lhs}, {rhs})")
            }
            ExpressionKind::Mul { operator, lhs, rhs } => {
                write!(f, "MulExp({operator}, {lhs}, {rhs})")
            }
            ExpressionKind::Rel { operator, lhs, rhs } => {
                write!(f, "RelExp({operator}, {lhs}, {rhs})")
            }
            ExpressionKind::Eq { operator, lhs, rhs } => {
                write!(f, "EqExp({operator}, {lhs}, {rhs})")
            }
            ExpressionKind::LAnd { lhs, rhs } => write!(f, "LAndExp({lhs}, {rhs})"),
            ExpressionKind::LOr { lhs, rhs } => write!(f, "LOrExp({lhs}, {rhs})"),
        }
    }
}
