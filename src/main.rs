use std::{path::PathBuf, process::ExitCode};

use clap::Parser as ClapParser;
use colored::Colorize;
use indoc::indoc;
use minic::{
    diagnostic,
    driver::{self, Mode},
    error::CompileError,
    frontend::{SourceFile, SourceFileOrigin},
};

#[derive(Debug, ClapParser)]
#[command(
    version,
    about,
    long_about = None,
    after_help = indoc! {"
        Modes:
          -ast     print the syntax tree
          -koopa   print the intermediate representation
          -riscv   print RISC-V assembly (inputs ending in .koopa are read as IR)
    "}
)]
pub struct Args {
    /// One of `-ast`, `-koopa` or `-riscv`
    #[arg(allow_hyphen_values = true)]
    mode: String,

    input: PathBuf,

    #[arg(short)]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let Ok(mode) = args.mode.parse::<Mode>() else {
        eprintln!(
            "{}: unknown mode `{}`, expected one of `-ast`, `-koopa`, `-riscv`",
            "error".red(),
            args.mode
        );
        return ExitCode::SUCCESS;
    };

    let source_file = match read_source_file(args.input) {
        Ok(source_file) => source_file,
        Err(error) => {
            eprint!("{}", diagnostic::render(&error, None));
            return ExitCode::FAILURE;
        }
    };

    let output = match driver::compile(mode, &source_file) {
        Ok(output) => output,
        Err(error) => {
            eprint!("{}", diagnostic::render(&error, Some(&source_file)));
            return ExitCode::FAILURE;
        }
    };

    if let Err(source) = std::fs::write(&args.output, output) {
        let error = CompileError::Io {
            path: args.output,
            source,
        };
        eprint!("{}", diagnostic::render(&error, None));
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn read_source_file(path: PathBuf) -> Result<SourceFile, CompileError> {
    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(SourceFile {
            contents,
            origin: SourceFileOrigin::File(path),
        }),
        Err(source) => Err(CompileError::Io { path, source }),
    }
}
