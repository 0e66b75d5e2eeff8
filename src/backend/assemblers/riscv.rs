/// Accumulates assembly text line by line. Directives and labels start at
/// column zero, instructions are indented.
#[derive(Debug, Default)]
pub struct Assembler {
    output: String,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn push_line(&mut self, string: impl AsRef<str>) {
        self.output.push_str(string.as_ref());
        self.output.push('\n');
    }

    pub fn emit(&mut self, string: impl AsRef<str>) {
        self.output.push_str("  ");
        self.push_line(string);
    }

    pub fn section_text(&mut self) {
        self.push_line(".text");
    }

    pub fn global_label(&mut self, name: &str) {
        self.push_line(format!(".globl {name}"));
        self.label(name);
    }

    pub fn label(&mut self, name: impl AsRef<str>) {
        self.push_line(format!("{}:", name.as_ref()));
    }

    pub fn load_immediate(&mut self, destination: RiscvRegister, value: i32) {
        self.emit(format!("li {destination}, {value}"));
    }

    pub fn ret(&mut self) {
        self.emit("ret");
    }
}

/// RV32I integer registers by ABI name
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[rustfmt::skip]
pub enum RiscvRegister {
    Zero, Ra, Sp, Gp, Tp,

    // temporaries
    T0, T1, T2, T3, T4, T5, T6,

    // saved
    S0, S1, S2, S3, S4, S5, S6, S7, S8, S9, S10, S11,

    // arguments and return values
    A0, A1, A2, A3, A4, A5, A6, A7,
}

impl RiscvRegister {
    /// Register holding an integer return value
    pub const RETURN_VALUE: Self = Self::A0;
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn formats_directives_and_instructions() {
        let mut assembler = Assembler::new();

        assembler.section_text();
        assembler.global_label("main");
        assembler.load_immediate(RiscvRegister::RETURN_VALUE, -5);
        assembler.ret();

        assert_eq!(
            assembler.into_output(),
            indoc! {"
                .text
                .globl main
                main:
                  li a0, -5
                  ret
            "}
        );
    }

    #[test]
    fn register_names_are_abi_names() {
        assert_eq!(RiscvRegister::Zero.to_string(), "zero");
        assert_eq!(RiscvRegister::S11.to_string(), "s11");
        assert_eq!(RiscvRegister::A7.to_string(), "a7");
    }
}
