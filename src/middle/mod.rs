//! The syntax tree is lowered here to a structured IR: one arena of values
//! per function and a list of basic blocks holding instruction ids. The IR has
//! a textual form which is the `-koopa` output.

pub mod ir;
pub mod lowering;
pub mod temp;
