//! Runtime scopes and output buffering.

use std::collections::HashMap;
use std::fmt::Write;

use lynx_syntax::error::{error, Result};

use crate::value::Value;

/// The mutable machine state of a run: a stack of variable scopes plus the
/// buffered program output.
pub struct Env {
    scopes: Vec<HashMap<String, Value>>,
    output: String,
}

impl Env {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
            output: String::new(),
        }
    }

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Bind a name in the innermost scope, replacing any prior binding
    /// there.
    pub(crate) fn define(&mut self, name: String, val: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, val);
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<Value> {
        self.scopes.iter().rev().find_map(|s| s.get(name).cloned())
    }

    /// Overwrite an existing binding, searching innermost-first.
    pub(crate) fn assign(&mut self, name: &str, val: Value) -> Result<()> {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = val;
                return Ok(());
            }
        }
        error(format!("assignment to undefined variable '{}'", name))
    }

    /// Append a value's display form plus a newline to the output buffer.
    pub(crate) fn print(&mut self, val: &Value) {
        let _ = writeln!(self.output, "{}", val);
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
