//! The backend walks the structured IR (functions, then basic blocks, then
//! instructions) and emits target assembly text.

pub mod assemblers;
pub mod targets;
