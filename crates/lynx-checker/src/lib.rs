pub mod symbols;
pub mod validate;

pub use symbols::SymbolTable;
pub use validate::{collect, validate, Checker, FnSig};

#[cfg(test)]
mod tests {
    use super::*;
    use lynx_syntax::ast::Program;
    use lynx_syntax::diag::ErrorKind;
    use lynx_syntax::types::Type;

    fn check(input: &str) -> (Program, Vec<ErrorKind>) {
        let mut program = lynx_parser::parse(input);
        let diags = validate(&mut program);
        let kinds = diags.iter().map(|d| d.kind).collect();
        (program, kinds)
    }

    fn kinds(input: &str) -> Vec<ErrorKind> {
        check(input).1
    }

    #[test]
    fn clean_programs_have_no_diagnostics() {
        assert!(kinds("var x = 1\nprint(x + 1)").is_empty());
        assert!(kinds("print(\"a\" + 1)").is_empty());
        assert!(kinds("for (i in [1, 2, 3]) { print(i) }").is_empty());
        assert!(kinds("function f(x : int) : int { return x }\nprint(f(3))").is_empty());
    }

    #[test]
    fn expression_types_are_inferred() {
        let (program, _) = check("1 + 2");
        assert_eq!(program.expression.unwrap().static_type(), Type::Int);
        let (program, _) = check("\"a\" + 1");
        assert_eq!(program.expression.unwrap().static_type(), Type::String);
        let (program, _) = check("1 < 2");
        assert_eq!(program.expression.unwrap().static_type(), Type::Bool);
        let (program, _) = check("[1, 2]");
        assert_eq!(
            program.expression.unwrap().static_type(),
            Type::list_of(Type::Int)
        );
        let (program, _) = check("[]");
        assert_eq!(
            program.expression.unwrap().static_type(),
            Type::list_of(Type::Object)
        );
    }

    #[test]
    fn unknown_identifier() {
        assert_eq!(kinds("print(nope)"), vec![ErrorKind::UnknownName]);
    }

    #[test]
    fn unknown_assignment_target() {
        assert_eq!(kinds("nope = 1"), vec![ErrorKind::UnknownName]);
    }

    #[test]
    fn incompatible_assignment() {
        assert_eq!(
            kinds("var x = 1\nx = \"str\""),
            vec![ErrorKind::IncompatibleTypes]
        );
        // widening through an object annotation is fine
        assert!(kinds("var x : object = 1\nx = \"str\"").is_empty());
    }

    #[test]
    fn var_annotation_mismatch() {
        assert_eq!(
            kinds("var x : int = \"str\""),
            vec![ErrorKind::IncompatibleTypes]
        );
        assert!(kinds("var x : list<object> = [1, 2]").is_empty());
        assert!(kinds("var x : int = null").is_empty());
    }

    #[test]
    fn duplicate_variable_names() {
        assert_eq!(
            kinds("var x = 1\nvar x = 2"),
            vec![ErrorKind::DuplicateName]
        );
        // shadowing in a nested scope is a duplicate too
        assert_eq!(
            kinds("var x = 1\nif (true) { var x = 2 }"),
            vec![ErrorKind::DuplicateName]
        );
    }

    #[test]
    fn arithmetic_wants_ints() {
        assert_eq!(kinds("1 * true"), vec![ErrorKind::IncompatibleTypes]);
        assert_eq!(
            kinds("true - false"),
            vec![ErrorKind::IncompatibleTypes, ErrorKind::IncompatibleTypes]
        );
        assert_eq!(kinds("1 < \"a\""), vec![ErrorKind::IncompatibleTypes]);
    }

    #[test]
    fn concatenation_operands_must_be_string_int_or_null() {
        assert_eq!(
            kinds("print(\"a\" + true)"),
            vec![ErrorKind::IncompatibleTypes]
        );
        assert_eq!(
            kinds("print(\"a\" + [1])"),
            vec![ErrorKind::IncompatibleTypes]
        );
        assert_eq!(
            kinds("print(true + \"a\" + [1])"),
            vec![ErrorKind::IncompatibleTypes, ErrorKind::IncompatibleTypes]
        );
        assert!(kinds("print(\"a\" + 1)").is_empty());
        assert!(kinds("print(\"a\" + null)").is_empty());
    }

    #[test]
    fn subtraction_with_a_string_operand_concatenates() {
        assert!(kinds("print(\"a\" - 1)").is_empty());
        let (program, _) = check("\"a\" - 1");
        assert_eq!(program.expression.unwrap().static_type(), Type::String);
    }

    #[test]
    fn equality_accepts_any_operands() {
        assert!(kinds("1 == \"a\"").is_empty());
        assert!(kinds("null != [1]").is_empty());
    }

    #[test]
    fn unary_operand_types() {
        assert_eq!(kinds("-true"), vec![ErrorKind::IncompatibleTypes]);
        assert_eq!(kinds("!1"), vec![ErrorKind::IncompatibleTypes]);
        assert!(kinds("-1").is_empty());
        assert!(kinds("!false").is_empty());
    }

    #[test]
    fn if_condition_must_be_bool() {
        assert_eq!(
            kinds("if (1) { print(1) }"),
            vec![ErrorKind::IncompatibleTypes]
        );
    }

    #[test]
    fn for_source_must_be_a_list() {
        assert_eq!(
            kinds("for (x in 1) { print(x) }"),
            vec![ErrorKind::IncompatibleTypes]
        );
    }

    #[test]
    fn for_variable_gets_the_component_type() {
        let (_, diags) = check("for (x in [1, 2]) { print(x + 1) }");
        assert!(diags.is_empty());
        // a string component would make the addition a concatenation, so
        // force an int-only context instead
        assert_eq!(
            kinds("for (x in [\"a\"]) { print(x * 2) }"),
            vec![ErrorKind::IncompatibleTypes]
        );
    }

    #[test]
    fn for_variable_shadowing_is_a_duplicate() {
        assert_eq!(
            kinds("var x = 1\nfor (x in [1]) { print(x) }"),
            vec![ErrorKind::DuplicateName]
        );
    }

    #[test]
    fn duplicate_function_names() {
        assert_eq!(
            kinds("function f() {}\nfunction f() {}"),
            vec![ErrorKind::DuplicateName]
        );
    }

    #[test]
    fn duplicate_parameter_names() {
        assert_eq!(
            kinds("function f(a : int, a : int) {}"),
            vec![ErrorKind::DuplicateName]
        );
    }

    #[test]
    fn calls_resolve_forward() {
        assert!(kinds("print(f())\nfunction f() : int { return 1 }").is_empty());
    }

    #[test]
    fn unknown_function_call() {
        assert_eq!(kinds("nope()"), vec![ErrorKind::UnknownName]);
    }

    #[test]
    fn call_arity_is_checked() {
        assert_eq!(
            kinds("function f(a : int) {}\nf(1, 2)"),
            vec![ErrorKind::ArgMismatch]
        );
        assert_eq!(kinds("function f(a : int) {}\nf()"), vec![ErrorKind::ArgMismatch]);
    }

    #[test]
    fn call_argument_types_are_checked() {
        assert_eq!(
            kinds("function f(a : int) {}\nf(\"str\")"),
            vec![ErrorKind::IncompatibleTypes]
        );
        assert!(kinds("function f(a : object) {}\nf(\"str\")").is_empty());
        assert!(kinds("function f(a : int) {}\nf(null)").is_empty());
    }

    #[test]
    fn return_type_is_checked() {
        assert_eq!(
            kinds("function f() : int { return \"str\" }"),
            vec![ErrorKind::IncompatibleTypes]
        );
        // a bare return still covers the path, so only the type mismatch
        // is reported
        assert_eq!(
            kinds("function f() : int { return }"),
            vec![ErrorKind::IncompatibleTypes]
        );
    }

    #[test]
    fn missing_return_is_flagged() {
        assert_eq!(
            kinds("function f() : int { print(1) }"),
            vec![ErrorKind::MissingReturnStatement]
        );
        assert_eq!(
            kinds("function f() : int {}"),
            vec![ErrorKind::MissingReturnStatement]
        );
    }

    #[test]
    fn return_coverage_through_if_else() {
        assert!(kinds(
            "function f(x : int) : int { if (x > 0) { return 1 } else { return 2 } }"
        )
        .is_empty());
        // an if without an else never covers
        assert_eq!(
            kinds("function f(x : int) : int { if (x > 0) { return 1 } }"),
            vec![ErrorKind::MissingReturnStatement]
        );
        // one branch missing a return
        assert_eq!(
            kinds("function f(x : int) : int { if (x > 0) { return 1 } else { print(2) } }"),
            vec![ErrorKind::MissingReturnStatement]
        );
    }

    #[test]
    fn return_coverage_finds_the_first_if_anywhere_in_the_body() {
        assert!(kinds(
            "function f(x : int) : int { var y = 0\nif (x > 0) { return 1 } else { return 2 } }"
        )
        .is_empty());
        assert_eq!(
            kinds(
                "function f(x : int) : int { var y = 0\nif (x > 0) { return 1 } else { print(2) } }"
            ),
            vec![ErrorKind::MissingReturnStatement]
        );
    }

    #[test]
    fn void_functions_need_no_return() {
        assert!(kinds("function f() { print(1) }").is_empty());
        assert!(kinds("function f() { return }").is_empty());
    }

    #[test]
    fn multiple_diagnostics_surface_in_one_pass() {
        let got = kinds("var x = nope\nvar x = 1\nprint(missing)");
        assert_eq!(
            got,
            vec![
                ErrorKind::UnknownName,
                ErrorKind::DuplicateName,
                ErrorKind::UnknownName
            ]
        );
    }

    #[test]
    fn bad_type_name_flows_into_the_flat_list() {
        assert_eq!(kinds("var x : wibble = 1"), vec![ErrorKind::BadTypeName]);
    }

    #[test]
    fn var_declared_type_is_recorded() {
        let (program, _) = check("var x = [1, 2]");
        match &program.statements[0].kind {
            lynx_syntax::ast::StmtKind::Var { declared, .. } => {
                assert_eq!(declared.clone(), Some(Type::list_of(Type::Int)));
            }
            other => panic!("expected var, got {:?}", other),
        }
    }
}
