//! Runs the pipeline up to the stage a [`Mode`] asks for and returns the
//! resulting text.

use strum::EnumString;

use crate::{
    backend::targets::{CodeGenerator, Target},
    error::CompileError,
    frontend::{SourceFile, SourceFileOrigin, parser::Parser},
    middle::{
        ir::{self, parse::parse_program},
        lowering::lower_comp_unit,
        temp::TempAllocator,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
pub enum Mode {
    /// Dump the syntax tree
    #[strum(serialize = "-ast")]
    Ast,

    /// Emit textual IR
    #[strum(serialize = "-koopa")]
    Koopa,

    /// Emit RISC-V assembly
    #[strum(serialize = "-riscv")]
    Riscv,
}

/// Compiles `source` for `mode`. With [`Mode::Riscv`], a file ending in
/// `.koopa` is taken to already be textual IR.
pub fn compile(mode: Mode, source: &SourceFile) -> Result<String, CompileError> {
    if mode == Mode::Riscv && is_ir_text(source) {
        return compile_ir_text(&source.contents);
    }

    let comp_unit = Parser::parse_comp_unit(source)?;
    let lower = || lower_comp_unit(&comp_unit, &mut TempAllocator::new());

    Ok(match mode {
        Mode::Ast => format!("{comp_unit}\n"),
        Mode::Koopa => lower().to_string(),
        Mode::Riscv => emit_assembly(&lower()),
    })
}

/// Assembly for a program given as textual IR
pub fn compile_ir_text(text: &str) -> Result<String, CompileError> {
    let program = parse_program(text)?;
    Ok(emit_assembly(&program))
}

fn emit_assembly(program: &ir::Program) -> String {
    Target::Riscv32.get_code_generator().translate_to_asm(program)
}

fn is_ir_text(source: &SourceFile) -> bool {
    match &source.origin {
        SourceFileOrigin::File(path) => path.extension().is_some_and(|ext| ext == "koopa"),
        SourceFileOrigin::Memory => false,
    }
}
