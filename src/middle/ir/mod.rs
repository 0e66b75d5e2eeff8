//! Structured IR: programs are lists of functions, functions own an arena of
//! values and an ordered list of basic blocks, and blocks list the values
//! that are instructions. Integer constants live in the arena but never in a
//! block, so an operand is either a constant or the result of an earlier
//! instruction.

use strum::EnumString;

use crate::{
    index::{Index, IndexVec, simple_index},
    middle::temp::TempId,
};

pub mod display;
pub mod parse;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub functions: Vec<Function>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Symbol name including the leading `@`
    pub name: String,
    pub return_type: Type,
    values: IndexVec<ValueId, Value>,
    blocks: Vec<BasicBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Type {
    I32,
}

simple_index! {
    /// Identifies a value within its function
    pub struct ValueId;
}

simple_index! {
    /// Identifies a basic block within its function
    pub struct BlockId;
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    /// Label including the leading `%`
    pub name: String,
    pub instructions: Vec<ValueId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    /// Set for every value that produces a result at runtime
    pub name: Option<TempId>,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    Integer(i32),
    Binary {
        op: BinaryOp,
        lhs: ValueId,
        rhs: ValueId,
    },
    Return(Option<ValueId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl Function {
    pub fn new(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            return_type,
            values: IndexVec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn value(&self, id: ValueId) -> &Value {
        &self.values[id]
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.index()]
    }

    pub fn push_block(&mut self, name: impl Into<String>) -> BlockId {
        self.blocks.push(BasicBlock {
            name: name.into(),
            instructions: Vec::new(),
        });
        BlockId::new(self.blocks.len() - 1)
    }

    /// Creates a constant. Constants are never placed in a block.
    pub fn integer(&mut self, value: i32) -> ValueId {
        self.values.push(Value {
            name: None,
            kind: ValueKind::Integer(value),
        })
    }

    /// Appends `name = op lhs, rhs` to the end of `block`
    pub fn append_binary(
        &mut self,
        block: BlockId,
        name: TempId,
        op: BinaryOp,
        lhs: ValueId,
        rhs: ValueId,
    ) -> ValueId {
        self.append(
            block,
            Value {
                name: Some(name),
                kind: ValueKind::Binary { op, lhs, rhs },
            },
        )
    }

    pub fn append_return(&mut self, block: BlockId, value: Option<ValueId>) -> ValueId {
        self.append(
            block,
            Value {
                name: None,
                kind: ValueKind::Return(value),
            },
        )
    }

    fn append(&mut self, block: BlockId, value: Value) -> ValueId {
        let id = self.values.push(value);
        self.blocks[block.index()].instructions.push(id);
        id
    }

    /// Whether the final block ends in a `ret`
    pub fn returns(&self) -> bool {
        self.blocks
            .last()
            .and_then(|block| block.instructions.last())
            .is_some_and(|id| matches!(self.value(*id).kind, ValueKind::Return(_)))
    }
}
