//! Textual form of the IR:
//!
//! ```text
//! fun @main(): i32 {
//! %entry:
//!   %0 = eq 0, 0
//!   ret %0
//! }
//! ```

use itertools::Itertools;

use crate::middle::ir::{Function, Program, ValueId, ValueKind};

impl core::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.functions.iter().map(|function| function.to_string()).join("\n")
        )
    }
}

impl core::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "fun {}(): {} {{", self.name, self.return_type)?;

        for block in self.blocks() {
            writeln!(f, "{}:", block.name)?;

            for instruction in &block.instructions {
                writeln!(f, "  {}", self.display_instruction(*instruction))?;
            }
        }

        writeln!(f, "}}")
    }
}

impl Function {
    /// How `value` is written when used as an operand: constants are written
    /// inline, everything else by name
    pub fn display_operand(&self, value: ValueId) -> String {
        let value = self.value(value);

        match (value.kind, value.name) {
            (ValueKind::Integer(integer), _) => integer.to_string(),
            (_, Some(name)) => name.to_string(),
            (kind, None) => unreachable!("operand {kind:?} does not produce a named result"),
        }
    }

    pub fn display_instruction(&self, instruction: ValueId) -> String {
        match self.value(instruction).kind {
            ValueKind::Binary { op, lhs, rhs } => format!(
                "{} = {op} {}, {}",
                self.display_operand(instruction),
                self.display_operand(lhs),
                self.display_operand(rhs)
            ),
            ValueKind::Return(Some(value)) => format!("ret {}", self.display_operand(value)),
            ValueKind::Return(None) => "ret".to_string(),
            ValueKind::Integer(integer) => unreachable!("constant {integer} placed in a block"),
        }
    }
}
