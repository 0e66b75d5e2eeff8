use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use indoc::indoc;
use minic::{
    driver::{self, Mode},
    frontend::{SourceFile, SourceFileOrigin},
};
use mktemp::Temp;

fn run_minic(mode: &str, input: &Path, output: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_minic"))
        .arg(mode)
        .arg(input)
        .arg("-o")
        .arg(output)
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn compiles_source_file_to_ir() {
    let temp = Temp::new_dir().unwrap();
    let dir = temp.to_path_buf();
    let input = write_input(
        &dir,
        "hello.c",
        indoc! {"
            // the answer
            int main() {
              return !(1 + 2 * 3 <= 4) && -5;
            }
        "},
    );
    let output = dir.join("hello.koopa");

    let result = run_minic("-koopa", &input, &output);

    assert!(result.status.success());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        indoc! {"
            fun @main(): i32 {
            %entry:
              %0 = mul 2, 3
              %1 = add 1, %0
              %2 = le %1, 4
              %3 = eq %2, 0
              %4 = sub 0, 5
              %5 = ne %3, 0
              %6 = ne %4, 0
              %7 = and %5, %6
              ret %7
            }
        "}
    );
}

#[test]
fn compiles_literal_return_to_assembly() {
    let temp = Temp::new_dir().unwrap();
    let dir = temp.to_path_buf();
    let input = write_input(&dir, "zero.c", "int main() { return 0x1f; }");
    let output = dir.join("zero.S");

    let result = run_minic("-riscv", &input, &output);

    assert!(result.status.success());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        indoc! {"
            .text
            .globl main
            main:
              li a0, 31
              ret
        "}
    );
}

#[test]
fn ir_files_feed_the_backend() {
    let temp = Temp::new_dir().unwrap();
    let dir = temp.to_path_buf();
    let input = write_input(
        &dir,
        "seven.koopa",
        "fun @main(): i32 {\n%entry:\n  ret 7\n}\n",
    );
    let output = dir.join("seven.S");

    let result = run_minic("-riscv", &input, &output);

    assert!(result.status.success());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        ".text\n.globl main\nmain:\n  li a0, 7\n  ret\n"
    );
}

#[test]
fn syntax_errors_exit_with_failure() {
    let temp = Temp::new_dir().unwrap();
    let dir = temp.to_path_buf();
    let input = write_input(&dir, "broken.c", "int main() {\n  return 1 +;\n}\n");
    let output = dir.join("broken.koopa");

    let result = run_minic("-koopa", &input, &output);
    let stderr = String::from_utf8_lossy(&result.stderr);

    assert_eq!(result.status.code(), Some(1));
    assert!(stderr.contains("error: "), "stderr was {stderr}");
    assert!(stderr.contains("broken.c:2:"), "stderr was {stderr}");
    assert!(!output.exists());
}

#[test]
fn missing_input_exits_with_failure() {
    let temp = Temp::new_dir().unwrap();
    let dir = temp.to_path_buf();
    let output = dir.join("out.S");

    let result = run_minic("-riscv", &dir.join("missing.c"), &output);

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("could not access"));
    assert!(!output.exists());
}

#[test]
fn unknown_mode_writes_nothing() {
    let temp = Temp::new_dir().unwrap();
    let dir = temp.to_path_buf();
    let input = write_input(&dir, "main.c", "int main() { return 0; }");
    let output = dir.join("out.txt");

    let result = run_minic("-perf", &input, &output);

    assert_eq!(result.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&result.stderr).contains("unknown mode `-perf`"));
    assert!(!output.exists());
}

#[test]
fn library_pipeline_matches_binary_output() {
    let temp = Temp::new_dir().unwrap();
    let dir = temp.to_path_buf();
    let input = write_input(&dir, "ast.c", "int main() { return -(!0); }");
    let output = dir.join("ast.txt");

    assert!(run_minic("-ast", &input, &output).status.success());

    let source = SourceFile {
        contents: fs::read_to_string(&input).unwrap(),
        origin: SourceFileOrigin::File(input),
    };

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        driver::compile(Mode::Ast, &source).unwrap()
    );
}

#[test]
fn deeply_nested_input_is_a_diagnostic() {
    let temp = Temp::new_dir().unwrap();
    let dir = temp.to_path_buf();
    let negations = "-".repeat(200_000);
    let input = write_input(
        &dir,
        "deep.c",
        &format!("int main() {{ return {negations}1; }}"),
    );
    let output = dir.join("deep.koopa");

    let result = run_minic("-koopa", &input, &output);

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("levels deep"));
    assert!(!output.exists());
}

#[test]
fn oversized_literal_is_a_range_error() {
    let temp = Temp::new_dir().unwrap();
    let dir = temp.to_path_buf();
    let input = write_input(&dir, "big.c", "int main() { return 99999999999999999999; }");
    let output = dir.join("big.koopa");

    let result = run_minic("-koopa", &input, &output);

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("does not fit in i32"));
}
