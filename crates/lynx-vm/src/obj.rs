//! Runtime object model for the Lynx VM.
//!
//! The machine works on two-tier values: [`Slot`]s live on the operand
//! stack and in locals and carry ints and bools unboxed, while [`Obj`]s
//! are the heap objects behind every reference slot.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A stack or local slot.
#[derive(Debug, Clone)]
pub enum Slot {
    Int(i64),
    Bool(bool),
    Ref(Rc<Obj>),
}

/// A heap object.
#[derive(Debug)]
pub enum Obj {
    /// A boxed int
    Int(i64),
    /// A boxed bool
    Bool(bool),
    Str(String),
    List(Vec<Rc<Obj>>),
    Null,
    /// A live list iterator; `pos` advances on every `IterNext`
    Iter { list: Rc<Obj>, pos: Cell<usize> },
}

/// The reference equality relation behind `RefCmp`.
///
/// Boxed ints, bools and null compare by value; strings and lists compare
/// by pointer identity. This matches the interpreter's relation exactly.
pub fn ref_eq(a: &Rc<Obj>, b: &Rc<Obj>) -> bool {
    match (&**a, &**b) {
        (Obj::Int(x), Obj::Int(y)) => x == y,
        (Obj::Bool(x), Obj::Bool(y)) => x == y,
        (Obj::Null, Obj::Null) => true,
        (Obj::Str(_), Obj::Str(_)) => Rc::ptr_eq(a, b),
        (Obj::List(_), Obj::List(_)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

impl fmt::Display for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obj::Int(n) => write!(f, "{}", n),
            Obj::Bool(b) => write!(f, "{}", b),
            Obj::Str(s) => write!(f, "{}", s),
            Obj::Null => write!(f, "null"),
            Obj::List(items) => {
                write!(f, "[")?;
                for (i, it) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", it)?;
                }
                write!(f, "]")
            }
            Obj::Iter { .. } => write!(f, "<iterator>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_equality_relation() {
        let a = Rc::new(Obj::Int(2));
        let b = Rc::new(Obj::Int(2));
        assert!(ref_eq(&a, &b));
        let s1 = Rc::new(Obj::Str("a".into()));
        let s2 = Rc::new(Obj::Str("a".into()));
        assert!(ref_eq(&s1, &s1.clone()));
        assert!(!ref_eq(&s1, &s2));
        assert!(ref_eq(&Rc::new(Obj::Null), &Rc::new(Obj::Null)));
        assert!(!ref_eq(&Rc::new(Obj::Int(0)), &Rc::new(Obj::Null)));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Obj::Null.to_string(), "null");
        let list = Obj::List(vec![Rc::new(Obj::Int(1)), Rc::new(Obj::Str("x".into()))]);
        assert_eq!(list.to_string(), "[1, x]");
    }
}
