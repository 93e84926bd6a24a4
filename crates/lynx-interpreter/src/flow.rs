//! Control flow for the interpreter.

use crate::value::Value;

#[derive(Debug)]
pub(crate) enum Flow {
    /// Continue normal execution
    Continue,
    /// Return from the enclosing function with the given value
    Return(Value),
}
