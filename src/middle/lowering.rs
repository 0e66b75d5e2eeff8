//! Lowers the syntax tree to the structured IR. Expression trees are walked in
//! post order, so every operand is computed before the instruction using it
//! and temporaries are numbered in the order their instructions appear.

use crate::{
    frontend::ast::{
        AddOperator, Block, CompUnit, EqOperator, Expression, ExpressionKind, FuncDef, FuncType,
        MulOperator, RelOperator, Stmt, StmtKind, UnaryOperator,
    },
    middle::{
        ir::{self, BinaryOp, BlockId, ValueId},
        temp::TempAllocator,
    },
};

pub fn lower_comp_unit(comp_unit: &CompUnit, temps: &mut TempAllocator) -> ir::Program {
    ir::Program {
        functions: vec![lower_function_definition(&comp_unit.func_def, temps)],
    }
}

fn lower_function_definition(func_def: &FuncDef, temps: &mut TempAllocator) -> ir::Function {
    let return_type = match func_def.func_type {
        FuncType::Int => ir::Type::I32,
    };

    // The entry point is always emitted as `@main`, whatever it was declared as
    let mut function = ir::Function::new("@main", return_type);
    let entry = function.push_block("%entry");

    let mut context = BodyLoweringContext {
        temps,
        function,
        current_block: entry,
    };

    context.lower_block(&func_def.block);
    context.function
}

struct BodyLoweringContext<'a> {
    temps: &'a mut TempAllocator,
    function: ir::Function,
    current_block: BlockId,
}

impl BodyLoweringContext<'_> {
    /// Allocates the result name right before appending so numbering follows
    /// emission order
    fn push_binary(&mut self, op: BinaryOp, lhs: ValueId, rhs: ValueId) -> ValueId {
        let name = self.temps.allocate();
        self.function
            .append_binary(self.current_block, name, op, lhs, rhs)
    }

    /// Lowers every statement and yields the value of the last one
    fn lower_block(&mut self, block: &Block) -> ValueId {
        let mut last = None;

        for statement in block.statements() {
            last = Some(self.lower_statement(statement));
        }

        last.expect("blocks always contain at least one statement")
    }

    fn lower_statement(&mut self, statement: &Stmt) -> ValueId {
        match &statement.kind {
            StmtKind::Return(expression) => {
                let value = self.lower_expression(expression);
                self.function
                    .append_return(self.current_block, Some(value));
                value
            }
        }
    }

    fn lower_expression(&mut self, expression: &Expression) -> ValueId {
        match &expression.kind {
            ExpressionKind::Number(value) => self.function.integer(*value),
            ExpressionKind::Unary { operator, operand } => {
                let operand = self.lower_expression(operand);

                match operator {
                    UnaryOperator::Plus => operand,
                    UnaryOperator::Minus => {
                        let zero = self.function.integer(0);
                        self.push_binary(BinaryOp::Sub, zero, operand)
                    }
                    UnaryOperator::Not => {
                        let zero = self.function.integer(0);
                        self.push_binary(BinaryOp::Eq, operand, zero)
                    }
                }
            }
            ExpressionKind::Add { operator, lhs, rhs } => {
                let op = match operator {
                    AddOperator::Add => BinaryOp::Add,
                    AddOperator::Sub => BinaryOp::Sub,
                };
                self.lower_binary(op, lhs, rhs)
            }
            ExpressionKind::Mul { operator, lhs, rhs } => {
                let op = match operator {
                    MulOperator::Mul => BinaryOp::Mul,
                    MulOperator::Div => BinaryOp::Div,
                    MulOperator::Mod => BinaryOp::Mod,
                };
                self.lower_binary(op, lhs, rhs)
            }
            ExpressionKind::Rel { operator, lhs, rhs } => {
                let op = match operator {
                    RelOperator::Lt => BinaryOp::Lt,
                    RelOperator::Le => BinaryOp::Le,
                    RelOperator::Gt => BinaryOp::Gt,
                    RelOperator::Ge => BinaryOp::Ge,
                };
                self.lower_binary(op, lhs, rhs)
            }
            ExpressionKind::Eq { operator, lhs, rhs } => {
                let op = match operator {
                    EqOperator::Eq => BinaryOp::Eq,
                    EqOperator::Ne => BinaryOp::Ne,
                };
                self.lower_binary(op, lhs, rhs)
            }
            ExpressionKind::LAnd { lhs, rhs } => self.lower_logical(BinaryOp::And, lhs, rhs),
            ExpressionKind::LOr { lhs, rhs } => self.lower_logical(BinaryOp::Or, lhs, rhs),
        }
    }

    // Left operand first, always
    fn lower_binary(&mut self, op: BinaryOp, lhs: &Expression, rhs: &Expression) -> ValueId {
        let lhs = self.lower_expression(lhs);
        let rhs = self.lower_expression(rhs);
        self.push_binary(op, lhs, rhs)
    }

    /// `&&` and `||` without short circuiting: both operands are evaluated,
    /// each is normalised to 0/1 with `ne x, 0`, then combined bitwise.
    fn lower_logical(&mut self, op: BinaryOp, lhs: &Expression, rhs: &Expression) -> ValueId {
        let lhs = self.lower_expression(lhs);
        let rhs = self.lower_expression(rhs);

        let zero = self.function.integer(0);
        let lhs = self.push_binary(BinaryOp::Ne, lhs, zero);
        let zero = self.function.integer(0);
        let rhs = self.push_binary(BinaryOp::Ne, rhs, zero);

        self.push_binary(op, lhs, rhs)
    }
}
