use crate::{
    backend::{
        assemblers::riscv::{Assembler, RiscvRegister},
        targets::CodeGenerator,
    },
    middle::ir::{self, ValueId, ValueKind},
};

pub struct CodeGeneratorRiscv32;

impl CodeGenerator for CodeGeneratorRiscv32 {
    fn translate_to_asm(&self, program: &ir::Program) -> String {
        let mut assembler = Assembler::new();
        visit_program(program, &mut assembler);
        assembler.into_output()
    }
}

fn visit_program(program: &ir::Program, assembler: &mut Assembler) {
    for function in &program.functions {
        visit_function(function, assembler);
    }
}

fn visit_function(function: &ir::Function, assembler: &mut Assembler) {
    let name = function
        .name
        .strip_prefix('@')
        .unwrap_or(&function.name);

    assembler.section_text();
    assembler.global_label(name);

    for block in function.blocks() {
        visit_basic_block(function, block, assembler);
    }
}

fn visit_basic_block(function: &ir::Function, block: &ir::BasicBlock, assembler: &mut Assembler) {
    for instruction in &block.instructions {
        visit_instruction(function, *instruction, assembler);
    }
}

fn visit_instruction(function: &ir::Function, instruction: ValueId, assembler: &mut Assembler) {
    match function.value(instruction).kind {
        ValueKind::Return(value) => visit_return(function, value, assembler),
        // Nothing the front end produces today needs registers for
        // intermediate results, so reaching one of these means an upstream
        // stage is broken
        ValueKind::Binary { op, .. } => {
            unreachable!("`{op}` instructions cannot be lowered to RISC-V yet")
        }
        ValueKind::Integer(integer) => {
            unreachable!("constant {integer} was placed in a basic block")
        }
    }
}

fn visit_return(function: &ir::Function, value: Option<ValueId>, assembler: &mut Assembler) {
    if let Some(value) = value
        && let ValueKind::Integer(integer) = function.value(value).kind
    {
        assembler.load_immediate(RiscvRegister::RETURN_VALUE, integer);
    }

    assembler.ret();
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::{
        index::Index,
        middle::{ir::BinaryOp, temp::TempId},
    };

    fn returning(value: i32) -> ir::Function {
        let mut function = ir::Function::new("@main", ir::Type::I32);
        let entry = function.push_block("%entry");
        let value = function.integer(value);
        function.append_return(entry, Some(value));
        function
    }

    #[test]
    fn returns_literal_in_a0() {
        let program = ir::Program {
            functions: vec![returning(42)],
        };

        assert_eq!(
            CodeGeneratorRiscv32.translate_to_asm(&program),
            indoc! {"
                .text
                .globl main
                main:
                  li a0, 42
                  ret
            "}
        );
    }

    #[test]
    fn every_function_gets_its_own_header() {
        let mut second = returning(-1);
        second.name = "@helper".to_string();

        let program = ir::Program {
            functions: vec![returning(0), second],
        };

        assert_eq!(
            CodeGeneratorRiscv32.translate_to_asm(&program),
            indoc! {"
                .text
                .globl main
                main:
                  li a0, 0
                  ret
                .text
                .globl helper
                helper:
                  li a0, -1
                  ret
            "}
        );
    }

    #[test]
    fn bare_return_only_emits_ret() {
        let mut function = ir::Function::new("main", ir::Type::I32);
        let entry = function.push_block("%entry");
        function.append_return(entry, None);

        let mut assembler = Assembler::new();
        visit_function(&function, &mut assembler);

        assert_eq!(assembler.into_output(), ".text\n.globl main\nmain:\n  ret\n");
    }

    #[test]
    fn non_literal_return_skips_load_immediate() {
        let mut function = ir::Function::new("@main", ir::Type::I32);
        let entry = function.push_block("%entry");
        let zero = function.integer(0);
        let not = function.append_binary(entry, TempId::new(0), BinaryOp::Eq, zero, zero);

        let mut assembler = Assembler::new();
        visit_return(&function, Some(not), &mut assembler);
        assert_eq!(assembler.into_output(), "  ret\n");

        let mut assembler = Assembler::new();
        visit_return(&function, Some(zero), &mut assembler);
        assert_eq!(assembler.into_output(), "  li a0, 0\n  ret\n");
    }

    #[test]
    #[should_panic(expected = "`add` instructions cannot be lowered to RISC-V yet")]
    fn binary_instructions_are_fatal() {
        let mut function = ir::Function::new("@main", ir::Type::I32);
        let entry = function.push_block("%entry");
        let one = function.integer(1);
        let sum = function.append_binary(entry, TempId::new(0), BinaryOp::Add, one, one);
        function.append_return(entry, Some(sum));

        CodeGeneratorRiscv32.translate_to_asm(&ir::Program {
            functions: vec![function],
        });
    }
}
