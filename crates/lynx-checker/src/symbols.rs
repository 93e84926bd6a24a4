//! Lexically scoped symbol table.

use std::collections::HashMap;

use lynx_syntax::types::Type;

/// A stack of scope frames mapping variable names to their declared types.
///
/// Name lookup walks from the innermost frame outwards. Declaration
/// collision checks consult every frame, so shadowing an outer name counts
/// as a duplicate.
pub struct SymbolTable {
    frames: Vec<HashMap<String, Type>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Declare a name in the innermost frame.
    pub fn register(&mut self, name: String, ty: Type) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, ty);
        }
    }

    /// Whether the name is declared in any live frame.
    pub fn has_symbol(&self, name: &str) -> bool {
        self.frames.iter().any(|f| f.contains_key(name))
    }

    /// The declared type of the name, resolved innermost-first.
    pub fn get_symbol(&self, name: &str) -> Option<Type> {
        self.frames.iter().rev().find_map(|f| f.get(name).cloned())
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
