//! Reads the textual IR back into a [`Program`]. This is only needed when IR
//! is exchanged as text; the compiler itself builds the structured form
//! directly.

use hashbrown::HashMap;

use crate::{
    error::CompileError,
    index::Index,
    middle::{
        ir::{BinaryOp, BlockId, Function, Program, Type, ValueId, ValueKind},
        temp::TempId,
    },
};

pub fn parse_program(text: &str) -> Result<Program, CompileError> {
    let mut program = Program::default();
    let mut current: Option<FunctionReader> = None;
    let mut last_line = 0;

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = strip_comment(raw_line).trim();
        last_line = line_number;

        if line.is_empty() {
            continue;
        }

        if line == "}" {
            let Some(reader) = current.take() else {
                return Err(error(line_number, "unexpected `}` outside of a function"));
            };

            program.functions.push(reader.finish(line_number)?);
            continue;
        }

        match current.as_mut() {
            None => current = Some(FunctionReader::new(parse_header(line, line_number)?)),
            Some(reader) => reader.read_line(line, line_number)?,
        }
    }

    if let Some(reader) = current {
        return Err(error(
            last_line,
            format!("function `{}` is missing its closing `}}`", reader.function.name),
        ));
    }

    Ok(program)
}

fn error(line: usize, message: impl Into<String>) -> CompileError {
    CompileError::IrParse {
        line,
        message: message.into(),
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(start) => &line[..start],
        None => line,
    }
}

/// fun @main(): i32 {
fn parse_header(line: &str, line_number: usize) -> Result<Function, CompileError> {
    let Some(rest) = line.strip_prefix("fun ") else {
        return Err(error(line_number, format!("expected function header but found `{line}`")));
    };

    let Some((name, signature)) = rest.split_once('(') else {
        return Err(error(line_number, "expected `(` after function name"));
    };
    let name = name.trim();

    if !name.starts_with('@') || name.len() == 1 {
        return Err(error(line_number, format!("invalid function name `{name}`")));
    }

    let signature: String = signature.chars().filter(|c| !c.is_whitespace()).collect();
    let return_type = signature
        .strip_prefix("):")
        .and_then(|s| s.strip_suffix('{'))
        .ok_or_else(|| error(line_number, format!("malformed signature for `{name}`")))?;
    let return_type = return_type
        .parse::<Type>()
        .map_err(|_| error(line_number, format!("unknown type `{return_type}`")))?;

    Ok(Function::new(name, return_type))
}

struct FunctionReader {
    function: Function,
    block: Option<BlockId>,
    names: HashMap<TempId, ValueId>,
}

impl FunctionReader {
    fn new(function: Function) -> Self {
        Self {
            function,
            block: None,
            names: HashMap::new(),
        }
    }

    fn finish(self, line_number: usize) -> Result<Function, CompileError> {
        if !self.function.returns() {
            return Err(error(
                line_number,
                format!("function `{}` does not end with `ret`", self.function.name),
            ));
        }

        Ok(self.function)
    }

    fn read_line(&mut self, line: &str, line_number: usize) -> Result<(), CompileError> {
        // Block label
        if let Some(label) = line.strip_suffix(':') {
            if !label.starts_with('%') || label.len() == 1 {
                return Err(error(line_number, format!("invalid block label `{label}`")));
            }

            self.block = Some(self.function.push_block(label));
            return Ok(());
        }

        let Some(block) = self.block else {
            return Err(error(line_number, "instruction outside of a basic block"));
        };

        let block_is_terminated = self
            .function
            .block(block)
            .instructions
            .last()
            .is_some_and(|id| matches!(self.function.value(*id).kind, ValueKind::Return(_)));

        if block_is_terminated {
            return Err(error(line_number, "instruction after `ret`"));
        }

        // ret / ret <operand>
        if line == "ret" {
            self.function.append_return(block, None);
            return Ok(());
        }

        if let Some(operand) = line.strip_prefix("ret ") {
            let value = self.read_operand(operand, line_number)?;
            self.function.append_return(block, Some(value));
            return Ok(());
        }

        // %N = op lhs, rhs
        let Some((name, expression)) = line.split_once('=') else {
            return Err(error(line_number, format!("unknown instruction `{line}`")));
        };

        let name = parse_temp(name.trim(), line_number)?
            .ok_or_else(|| error(line_number, format!("invalid value name `{}`", name.trim())))?;

        if self.names.contains_key(&name) {
            return Err(error(
                line_number,
                format!("value `{name}` is defined more than once"),
            ));
        }

        let expression = expression.trim();
        let (op, operands) = expression
            .split_once(char::is_whitespace)
            .ok_or_else(|| error(line_number, format!("malformed instruction `{line}`")))?;

        let op = op
            .parse::<BinaryOp>()
            .map_err(|_| error(line_number, format!("unknown opcode `{op}`")))?;

        let Some((lhs, rhs)) = operands.split_once(',') else {
            return Err(error(line_number, format!("`{op}` expects two operands")));
        };

        let lhs = self.read_operand(lhs, line_number)?;
        let rhs = self.read_operand(rhs, line_number)?;

        let value = self.function.append_binary(block, name, op, lhs, rhs);
        self.names.insert(name, value);

        Ok(())
    }

    fn read_operand(&mut self, operand: &str, line_number: usize) -> Result<ValueId, CompileError> {
        let operand = operand.trim();

        if let Some(temp) = parse_temp(operand, line_number)? {
            return self
                .names
                .get(&temp)
                .copied()
                .ok_or_else(|| error(line_number, format!("undefined value `{temp}`")));
        }

        operand
            .parse::<i32>()
            .map(|integer| self.function.integer(integer))
            .map_err(|_| error(line_number, format!("invalid operand `{operand}`")))
    }
}

/// `Ok(None)` when `text` is not a temporary at all
fn parse_temp(text: &str, line_number: usize) -> Result<Option<TempId>, CompileError> {
    let Some(digits) = text.strip_prefix('%') else {
        return Ok(None);
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }

    // TempId is backed by a u32
    let index = digits
        .parse::<u32>()
        .map_err(|_| error(line_number, format!("temporary index out of range `{text}`")))?;

    Ok(Some(TempId::new(index as usize)))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn parse_error(text: &str) -> String {
        parse_program(text).unwrap_err().to_string()
    }

    #[test]
    fn reads_back_printed_program() {
        let text = indoc! {"
            fun @main(): i32 {
            %entry:
              %0 = ne 1, 0
              %1 = ne 0, 0
              %2 = or %0, %1
              ret %2
            }
        "};

        let program = parse_program(text).unwrap();

        assert_eq!(program.functions.len(), 1);
        assert_eq!(program.to_string(), text);
    }

    #[test]
    fn constants_are_not_instructions() {
        let program = parse_program("fun @main(): i32 {\n%entry:\n  ret -7\n}\n").unwrap();
        let function = &program.functions[0];
        let entry = &function.blocks()[0];

        assert_eq!(entry.instructions.len(), 1);
        let ValueKind::Return(Some(value)) = function.value(entry.instructions[0]).kind else {
            panic!("expected a return");
        };
        assert_eq!(function.value(value).kind, ValueKind::Integer(-7));
    }

    #[test]
    fn tolerates_comments_and_spacing() {
        let program = parse_program(indoc! {"
            // generated
            fun @f ( ) : i32 {
            %entry:   // only block
              %0 = add 1 ,  2
              ret %0
            }
        "})
        .unwrap();

        assert_eq!(program.functions[0].name, "@f");
    }

    #[test]
    fn rejects_inconsistent_programs() {
        assert_eq!(
            parse_error("fun @main(): i32 {\n%entry:\n  ret %3\n}\n"),
            "line 3: undefined value `%3`"
        );
        assert_eq!(
            parse_error("fun @main(): i32 {\n%entry:\n  %0 = add 1, 2\n}\n"),
            "line 4: function `@main` does not end with `ret`"
        );
        assert_eq!(
            parse_error("fun @main(): i32 {\n%entry:\n  %0 = xor 1, 2\n  ret %0\n}\n"),
            "line 3: unknown opcode `xor`"
        );
        assert_eq!(
            parse_error(
                "fun @main(): i32 {\n%entry:\n  %0 = add 1, 2\n  %0 = add 1, 2\n  ret %0\n}\n"
            ),
            "line 4: value `%0` is defined more than once"
        );
        assert_eq!(
            parse_error("fun @main(): i32 {\n  ret 0\n}\n"),
            "line 2: instruction outside of a basic block"
        );
        assert_eq!(
            parse_error("fun @main(): i32 {\n%entry:\n  ret 0\n  ret 1\n}\n"),
            "line 4: instruction after `ret`"
        );
        assert_eq!(
            parse_error("fun @main(): i64 {\n"),
            "line 1: unknown type `i64`"
        );
        assert_eq!(
            parse_error("fun @main(): i32 {\n%entry:\n  ret 0\n"),
            "line 3: function `@main` is missing its closing `}`"
        );
    }

    #[test]
    fn rejects_temporaries_past_u32() {
        assert_eq!(
            parse_error("fun @main(): i32 {\n%entry:\n  %4294967296 = add 1, 2\n  ret %4294967296\n}\n"),
            "line 3: temporary index out of range `%4294967296`"
        );
        assert_eq!(
            parse_error("fun @main(): i32 {\n%entry:\n  %0 = add 1, 2\n  ret %4294967296\n}\n"),
            "line 4: temporary index out of range `%4294967296`"
        );

        let largest = "fun @main(): i32 {\n%entry:\n  %4294967295 = add 1, 2\n  ret %4294967295\n}\n";
        assert_eq!(parse_program(largest).unwrap().to_string(), largest);
    }
}
