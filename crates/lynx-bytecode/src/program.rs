//! Compiled program container and signature descriptors.

use lynx_syntax::types::Type;

use crate::instruction::Instruction;

/// Descriptor of a field or value slot.
///
/// `int` and `bool` live unboxed as `I`; everything else is a reference
/// type written in class-file notation.
pub fn type_descriptor(ty: &Type) -> &'static str {
    match ty {
        Type::Int | Type::Bool => "I",
        Type::String => "Ljava/lang/String;",
        Type::List(_) => "Ljava/util/List;",
        Type::Object | Type::Null => "Ljava/lang/Object;",
        Type::Void => "V",
    }
}

/// Method descriptor in `(params)ret` notation.
pub fn method_descriptor(params: &[Type], ret: &Type) -> String {
    let mut s = String::from("(");
    for p in params {
        s.push_str(type_descriptor(p));
    }
    s.push(')');
    s.push_str(type_descriptor(ret));
    s
}

/// A class field backing a top-level program variable.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub descriptor: String,
}

/// One compiled method body.
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub descriptor: String,
    pub arity: usize,
    pub local_count: usize,
    pub code: Vec<Instruction>,
}

/// The unit of compilation: a single class holding every user function as
/// a method, the top-level statements as `main`, and the top-level
/// variables as fields.
#[derive(Debug, Clone)]
pub struct ClassFile {
    pub name: String,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub main: Method,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_descriptors() {
        assert_eq!(type_descriptor(&Type::Int), "I");
        assert_eq!(type_descriptor(&Type::Bool), "I");
        assert_eq!(type_descriptor(&Type::String), "Ljava/lang/String;");
        assert_eq!(
            type_descriptor(&Type::list_of(Type::Int)),
            "Ljava/util/List;"
        );
        assert_eq!(type_descriptor(&Type::Object), "Ljava/lang/Object;");
        assert_eq!(type_descriptor(&Type::Void), "V");
    }

    #[test]
    fn method_descriptors() {
        assert_eq!(method_descriptor(&[], &Type::Void), "()V");
        assert_eq!(
            method_descriptor(&[Type::Int, Type::String], &Type::Int),
            "(ILjava/lang/String;)I"
        );
        assert_eq!(
            method_descriptor(&[Type::list_of(Type::Object)], &Type::Object),
            "(Ljava/util/List;)Ljava/lang/Object;"
        );
    }
}
