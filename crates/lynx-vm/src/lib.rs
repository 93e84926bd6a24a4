//! Lynx virtual machine: executes compiled class files.
//!
//! The VM buffers program output the same way the interpreter does, so the
//! two backends can be compared output for output.

pub mod obj;
pub mod vm;

pub use obj::{Obj, Slot};
pub use vm::Vm;
