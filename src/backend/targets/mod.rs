use crate::middle::ir;

mod riscv32;

pub use riscv32::CodeGeneratorRiscv32;

pub trait CodeGenerator {
    fn translate_to_asm(&self, program: &ir::Program) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Riscv32,
}

impl Target {
    pub fn get_code_generator(self) -> impl CodeGenerator {
        match self {
            Target::Riscv32 => CodeGeneratorRiscv32,
        }
    }
}
