//! Lynx interpreter: evaluates validated AST nodes with a tree-walking
//! interpreter.
//!
//! Output is buffered rather than written to stdout, so embedders and
//! tests observe exactly what a program printed. The equality relation and
//! the printed forms match the bytecode backend instruction for
//! instruction.

pub mod env;
pub mod flow;
pub mod interpreter;
pub mod value;

pub use env::Env;
pub use interpreter::{Execution, Interpreter};
pub use value::Value;
