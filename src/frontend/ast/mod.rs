//! Syntax tree produced by the parser. Nodes own their children and are never
//! mutated after construction; lowering only borrows them.

use crate::frontend::lexer::Span;

pub mod dump;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompUnit {
    pub func_def: FuncDef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDef {
    pub span: Span,
    pub func_type: FuncType,
    pub ident: Identifier,
    pub block: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FuncType {
    Int,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub span: Span,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub span: Span,
    statements: Vec<Stmt>,
}

impl Block {
    /// A block always holds at least one statement
    pub fn new(span: Span, first: Stmt, rest: impl IntoIterator<Item = Stmt>) -> Self {
        let mut statements = vec![first];
        statements.extend(rest);

        Self { span, statements }
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    Return(Expression),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub span: Span,
    pub kind: ExpressionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionKind {
    Number(i32),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Add {
        operator: AddOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Mul {
        operator: MulOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Rel {
        operator: RelOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Eq {
        operator: EqOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    LAnd {
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    LOr {
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum UnaryOperator {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "!")]
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum AddOperator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum MulOperator {
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RelOperator {
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum EqOperator {
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
}
