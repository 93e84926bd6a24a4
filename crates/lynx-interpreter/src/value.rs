//! Value types for the Lynx interpreter.

use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer value
    Int(i64),
    /// An immutable string value
    Str(Rc<str>),
    /// A boolean value
    Bool(bool),
    /// A homogeneous list of values
    List(Rc<Vec<Value>>),
    /// The null value
    Null,
}

impl Value {
    /// The equality relation used by `==` and `!=`.
    ///
    /// Integers, booleans and null compare by value; strings and lists
    /// compare by reference identity, so two separately built lists are
    /// never equal even when their contents match. Both backends share
    /// this relation.
    pub fn identity_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, it) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", it)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        let list = Value::List(Rc::new(vec![Value::Int(1), Value::Str(Rc::from("a"))]));
        assert_eq!(list.to_string(), "[1, a]");
    }

    #[test]
    fn identity_semantics() {
        assert!(Value::Int(2).identity_eq(&Value::Int(2)));
        assert!(Value::Null.identity_eq(&Value::Null));
        let s: Rc<str> = Rc::from("a");
        assert!(Value::Str(s.clone()).identity_eq(&Value::Str(s)));
        assert!(!Value::Str(Rc::from("a")).identity_eq(&Value::Str(Rc::from("a"))));
        let l = Rc::new(vec![Value::Int(1)]);
        assert!(Value::List(l.clone()).identity_eq(&Value::List(l.clone())));
        assert!(!Value::List(l).identity_eq(&Value::List(Rc::new(vec![Value::Int(1)]))));
        assert!(!Value::Int(0).identity_eq(&Value::Null));
    }
}
