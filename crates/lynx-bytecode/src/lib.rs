//! Bytecode IR for the Lynx language.
//!
//! This crate defines the stack-based instruction set shared by the
//! compiler and the VM, plus the class-file shaped program container the
//! compiler produces.

pub mod instruction;
pub mod program;

pub use instruction::{CmpOp, Instruction, Prim};
pub use program::{method_descriptor, type_descriptor, ClassFile, Field, Method};
