//! Lynx bytecode compiler.

pub mod builder;
pub mod compiler;

pub use compiler::{compile, Compiler};
