//! The Lynx static type system.
//!
//! Types form a small closed set: the primitives `int`, `string`, `bool`,
//! the top type `object`, the bottom-ish `null`, the function-only `void`,
//! and the parametric `list<T>`. List types are canonicalized through a
//! cache keyed by component type, so structurally equal list types share a
//! single allocation no matter how often they are requested.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A value-comparable type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    String,
    Bool,
    /// The top type: assignable from any non-void type
    Object,
    /// The type of the `null` literal, assignable to everything but void
    Null,
    /// The absence of a value; only valid as a function return type
    Void,
    /// A homogeneous list, covariant in its component type
    List(Rc<Type>),
}

thread_local! {
    // Lazily populated canonical list-type cache, keyed by component type.
    static LIST_CACHE: RefCell<HashMap<Type, Type>> = RefCell::new(HashMap::new());
}

impl Type {
    /// The canonical list type with the given component.
    ///
    /// Calling this twice with the same component returns the same shared
    /// instance; the inner `Rc` is allocated at most once per component.
    pub fn list_of(component: Type) -> Type {
        LIST_CACHE.with(|cache| {
            cache
                .borrow_mut()
                .entry(component.clone())
                .or_insert_with(|| Type::List(Rc::new(component)))
                .clone()
        })
    }

    /// The component type of a list type, if this is one.
    pub fn component(&self) -> Option<&Type> {
        match self {
            Type::List(c) => Some(c),
            _ => None,
        }
    }

    /// Whether a value of type `other` may be stored where `self` is
    /// expected.
    ///
    /// `void` accepts nothing; every other type accepts `null`; `object`
    /// accepts any non-void type; list types are covariant in their
    /// component; all remaining pairs require equality.
    pub fn is_assignable_from(&self, other: &Type) -> bool {
        if *self == Type::Void || *other == Type::Void {
            return false;
        }
        if *other == Type::Null {
            return true;
        }
        match (self, other) {
            (Type::Object, _) => true,
            (Type::List(a), Type::List(b)) => a.is_assignable_from(b),
            _ => self == other,
        }
    }

    /// Whether values of this type are carried unboxed by the bytecode
    /// backend (single-slot numeric representation).
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Int | Type::Bool)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::String => write!(f, "string"),
            Type::Bool => write!(f, "bool"),
            Type::Object => write!(f, "object"),
            Type::Null => write!(f, "null"),
            Type::Void => write!(f, "void"),
            Type::List(c) => write!(f, "list<{}>", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_types_are_canonicalized() {
        let a = Type::list_of(Type::Int);
        let b = Type::list_of(Type::Int);
        assert_eq!(a, b);
        match (&a, &b) {
            (Type::List(x), Type::List(y)) => assert!(Rc::ptr_eq(x, y)),
            _ => panic!("expected list types"),
        }
        assert_ne!(Type::list_of(Type::Int), Type::list_of(Type::String));
    }

    #[test]
    fn null_is_assignable_everywhere_except_void() {
        for target in [
            Type::Int,
            Type::String,
            Type::Bool,
            Type::Object,
            Type::list_of(Type::Int),
        ] {
            assert!(target.is_assignable_from(&Type::Null), "{}", target);
        }
        assert!(!Type::Void.is_assignable_from(&Type::Null));
    }

    #[test]
    fn object_is_the_top_type() {
        assert!(Type::Object.is_assignable_from(&Type::Int));
        assert!(Type::Object.is_assignable_from(&Type::list_of(Type::String)));
        assert!(!Type::Object.is_assignable_from(&Type::Void));
        assert!(!Type::Int.is_assignable_from(&Type::Object));
    }

    #[test]
    fn lists_are_covariant() {
        let obj_list = Type::list_of(Type::Object);
        let int_list = Type::list_of(Type::Int);
        assert!(obj_list.is_assignable_from(&int_list));
        assert!(!int_list.is_assignable_from(&obj_list));
        assert!(int_list.is_assignable_from(&Type::Null));
    }
}
