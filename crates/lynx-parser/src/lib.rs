pub mod parser;
pub mod stream;

pub use parser::Parser;
pub use stream::TokenStream;

/// Lex and parse `input` in one call.
pub fn parse(input: &str) -> lynx_syntax::ast::Program {
    Parser::new(lynx_lexer::tokenize(input)).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lynx_syntax::ast::*;
    use lynx_syntax::diag::ErrorKind;
    use lynx_syntax::types::Type;

    fn parse_expr_str(input: &str) -> Expr {
        Parser::new(lynx_lexer::tokenize(input)).parse_expr()
    }

    fn parse_program_str(input: &str) -> Program {
        parse(input)
    }

    fn all_errors(stmt: &Stmt) -> Vec<ErrorKind> {
        fn walk_expr(e: &Expr, out: &mut Vec<ErrorKind>) {
            out.extend(e.errors.iter().map(|d| d.kind));
            match &e.kind {
                ExprKind::ListLiteral(items) => items.iter().for_each(|i| walk_expr(i, out)),
                ExprKind::Parenthesized(inner) => walk_expr(inner, out),
                ExprKind::Unary { operand, .. } => walk_expr(operand, out),
                ExprKind::Binary { lhs, rhs, .. } => {
                    walk_expr(lhs, out);
                    walk_expr(rhs, out);
                }
                ExprKind::Call { args, .. } => args.iter().for_each(|a| walk_expr(a, out)),
                _ => {}
            }
        }
        fn walk_stmt(s: &Stmt, out: &mut Vec<ErrorKind>) {
            out.extend(s.errors.iter().map(|d| d.kind));
            match &s.kind {
                StmtKind::Print { value } => walk_expr(value, out),
                StmtKind::Var { explicit, init, .. } => {
                    if let Some(t) = explicit {
                        out.extend(t.errors.iter().map(|d| d.kind));
                    }
                    walk_expr(init, out);
                }
                StmtKind::Assign { value, .. } => walk_expr(value, out),
                StmtKind::If {
                    cond,
                    then_body,
                    else_body,
                } => {
                    walk_expr(cond, out);
                    then_body.iter().for_each(|s| walk_stmt(s, out));
                    else_body.iter().for_each(|s| walk_stmt(s, out));
                }
                StmtKind::For { iterable, body, .. } => {
                    walk_expr(iterable, out);
                    body.iter().for_each(|s| walk_stmt(s, out));
                }
                StmtKind::FunctionDef(f) => f.body.iter().for_each(|s| walk_stmt(s, out)),
                StmtKind::Return { value, .. } => {
                    if let Some(v) = value {
                        walk_expr(v, out);
                    }
                }
                StmtKind::Call(e) => walk_expr(e, out),
                StmtKind::SyntaxError { .. } => {}
            }
        }
        let mut out = Vec::new();
        walk_stmt(stmt, &mut out);
        out
    }

    #[test]
    fn literal_expressions() {
        assert!(matches!(parse_expr_str("42").kind, ExprKind::IntLiteral(42)));
        assert!(
            matches!(parse_expr_str("\"hello\"").kind, ExprKind::StringLiteral(s) if s == "hello")
        );
        assert!(matches!(
            parse_expr_str("true").kind,
            ExprKind::BoolLiteral(true)
        ));
        assert!(matches!(
            parse_expr_str("false").kind,
            ExprKind::BoolLiteral(false)
        ));
        assert!(matches!(parse_expr_str("null").kind, ExprKind::NullLiteral));
    }

    #[test]
    fn identifier_expressions() {
        assert!(matches!(parse_expr_str("my_var").kind, ExprKind::Identifier(s) if s == "my_var"));
    }

    #[test]
    fn binary_operators() {
        for (src, op) in [
            ("1 + 2", BinaryOp::Add),
            ("5 - 3", BinaryOp::Sub),
            ("4 * 6", BinaryOp::Mul),
            ("8 / 2", BinaryOp::Div),
            ("1 < 2", BinaryOp::Lt),
            ("1 <= 2", BinaryOp::Le),
            ("1 > 2", BinaryOp::Gt),
            ("1 >= 2", BinaryOp::Ge),
            ("1 == 2", BinaryOp::Eq),
            ("1 != 2", BinaryOp::Ne),
        ] {
            match parse_expr_str(src).kind {
                ExprKind::Binary { op: got, .. } => assert_eq!(got, op, "{}", src),
                other => panic!("{}: expected binary, got {:?}", src, other),
            }
        }
    }

    #[test]
    fn operator_precedence() {
        // The additive operator ends up at the root in both orders.
        assert!(matches!(
            parse_expr_str("1 + 2 * 3").kind,
            ExprKind::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));
        assert!(matches!(
            parse_expr_str("2 * 3 + 1").kind,
            ExprKind::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));
        assert!(matches!(
            parse_expr_str("1 < 2 == true").kind,
            ExprKind::Binary {
                op: BinaryOp::Eq,
                ..
            }
        ));
    }

    #[test]
    fn additive_folds_left() {
        // 1 + 2 - 3 parses as (1 + 2) - 3
        match parse_expr_str("1 + 2 - 3").kind {
            ExprKind::Binary {
                op: BinaryOp::Sub,
                lhs,
                ..
            } => assert!(matches!(
                lhs.kind,
                ExprKind::Binary {
                    op: BinaryOp::Add,
                    ..
                }
            )),
            other => panic!("expected subtraction at root, got {:?}", other),
        }
    }

    #[test]
    fn unary_expressions() {
        assert!(matches!(
            parse_expr_str("-9").kind,
            ExprKind::Unary {
                op: UnaryOp::Neg,
                ..
            }
        ));
        assert!(matches!(
            parse_expr_str("!true").kind,
            ExprKind::Unary {
                op: UnaryOp::Not,
                ..
            }
        ));
        // unary binds tighter than factor
        assert!(matches!(
            parse_expr_str("9 * -9").kind,
            ExprKind::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn parenthesized_expressions() {
        match parse_expr_str("(1 + 2)").kind {
            ExprKind::Parenthesized(inner) => assert!(matches!(
                inner.kind,
                ExprKind::Binary {
                    op: BinaryOp::Add,
                    ..
                }
            )),
            other => panic!("expected parenthesized, got {:?}", other),
        }
    }

    #[test]
    fn list_literals() {
        match parse_expr_str("[1, 2, 3]").kind {
            ExprKind::ListLiteral(items) => assert_eq!(items.len(), 3),
            other => panic!("expected list, got {:?}", other),
        }
        match parse_expr_str("[]").kind {
            ExprKind::ListLiteral(items) => assert!(items.is_empty()),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn call_expressions() {
        match parse_expr_str("foo(1, x)").kind {
            ExprKind::Call { name, args } => {
                assert_eq!(name, "foo");
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn bare_expression_becomes_expression_program() {
        let program = parse_program_str("1 + 1");
        assert!(program.statements.is_empty());
        assert!(program.expression.is_some());
    }

    #[test]
    fn statement_input_is_not_expression_form() {
        let program = parse_program_str("x = 1");
        assert!(program.expression.is_none());
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(
            program.statements[0].kind,
            StmtKind::Assign { .. }
        ));
    }

    #[test]
    fn print_statement() {
        let program = parse_program_str("print(\"hi\")");
        assert!(matches!(
            program.statements[0].kind,
            StmtKind::Print { .. }
        ));
    }

    #[test]
    fn var_statement_with_annotation() {
        let program = parse_program_str("var x : int = 5");
        match &program.statements[0].kind {
            StmtKind::Var { name, explicit, .. } => {
                assert_eq!(name, "x");
                assert_eq!(explicit.as_ref().map(|t| t.ty.clone()), Some(Type::Int));
            }
            other => panic!("expected var, got {:?}", other),
        }
    }

    #[test]
    fn list_type_annotations() {
        let program = parse_program_str("var x : list<list<int>> = []");
        match &program.statements[0].kind {
            StmtKind::Var { explicit, .. } => {
                let expected = Type::list_of(Type::list_of(Type::Int));
                assert_eq!(explicit.as_ref().map(|t| t.ty.clone()), Some(expected));
            }
            other => panic!("expected var, got {:?}", other),
        }
        // bare `list` defaults its component to object
        let program = parse_program_str("var x : list = []");
        match &program.statements[0].kind {
            StmtKind::Var { explicit, .. } => {
                assert_eq!(
                    explicit.as_ref().map(|t| t.ty.clone()),
                    Some(Type::list_of(Type::Object))
                );
            }
            other => panic!("expected var, got {:?}", other),
        }
    }

    #[test]
    fn bad_type_name_is_recorded() {
        let program = parse_program_str("var x : wibble = 1");
        match &program.statements[0].kind {
            StmtKind::Var { explicit, .. } => {
                let lit = explicit.as_ref().unwrap();
                assert_eq!(lit.ty, Type::Object);
                assert_eq!(lit.errors[0].kind, ErrorKind::BadTypeName);
            }
            other => panic!("expected var, got {:?}", other),
        }
    }

    #[test]
    fn function_definition_shape() {
        let program = parse_program_str("function add(a : int, b : int) : int { return a + b }");
        match &program.statements[0].kind {
            StmtKind::FunctionDef(f) => {
                assert_eq!(f.name, "add");
                assert_eq!(f.params.len(), 2);
                assert_eq!(f.param_type(0), Type::Int);
                assert_eq!(f.declared_return_type(), Type::Int);
                assert!(matches!(f.body[0].kind, StmtKind::Return { .. }));
            }
            other => panic!("expected function def, got {:?}", other),
        }
    }

    #[test]
    fn untyped_params_default_to_object_and_void() {
        let program = parse_program_str("function f(x) {}");
        match &program.statements[0].kind {
            StmtKind::FunctionDef(f) => {
                assert_eq!(f.param_type(0), Type::Object);
                assert_eq!(f.declared_return_type(), Type::Void);
            }
            other => panic!("expected function def, got {:?}", other),
        }
    }

    #[test]
    fn return_captures_enclosing_return_type() {
        let program = parse_program_str("function f() : int { return 1 }");
        match &program.statements[0].kind {
            StmtKind::FunctionDef(f) => match &f.body[0].kind {
                StmtKind::Return { fn_return, .. } => assert_eq!(*fn_return, Type::Int),
                other => panic!("expected return, got {:?}", other),
            },
            other => panic!("expected function def, got {:?}", other),
        }
    }

    #[test]
    fn return_outside_function_is_a_syntax_error() {
        let program = parse_program_str("return 1");
        assert!(matches!(
            program.statements[0].kind,
            StmtKind::SyntaxError { .. }
        ));
    }

    #[test]
    fn if_else_chains_nest() {
        let program = parse_program_str(
            "if (x > 1) { print(1) } else if (x > 0) { print(2) } else { print(3) }",
        );
        match &program.statements[0].kind {
            StmtKind::If { else_body, .. } => {
                assert_eq!(else_body.len(), 1);
                match &else_body[0].kind {
                    StmtKind::If { else_body, .. } => assert_eq!(else_body.len(), 1),
                    other => panic!("expected nested if, got {:?}", other),
                }
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn for_statement_shape() {
        let program = parse_program_str("for (x in [1, 2]) { print(x) }");
        match &program.statements[0].kind {
            StmtKind::For { var, body, .. } => {
                assert_eq!(var, "x");
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn call_statement() {
        let program = parse_program_str("foo(1)");
        // a call consuming the whole input parses as an expression program
        assert!(program.expression.is_some());
        let program = parse_program_str("foo(1)\nfoo(2)");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[0].kind, StmtKind::Call(_)));
    }

    #[test]
    fn unterminated_arg_list_is_recorded() {
        let expr = parse_expr_str("foo(1, 2");
        assert_eq!(expr.errors[0].kind, ErrorKind::UnterminatedArgList);
    }

    #[test]
    fn unterminated_list_is_recorded() {
        let expr = parse_expr_str("[1, 2");
        assert_eq!(expr.errors[0].kind, ErrorKind::UnterminatedList);
    }

    #[test]
    fn unclosed_paren_is_recorded() {
        let expr = parse_expr_str("(1 + 2");
        assert_eq!(expr.errors[0].kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn garbage_expression_yields_placeholder() {
        let expr = parse_expr_str(",");
        assert!(matches!(expr.kind, ExprKind::SyntaxError { .. }));
        assert_eq!(expr.errors[0].kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn parser_recovers_and_keeps_later_statements() {
        let program = parse_program_str("var x = ,,,\nprint(1)");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(
            program.statements[0].kind,
            StmtKind::SyntaxError { .. }
        ));
        assert!(matches!(
            program.statements[1].kind,
            StmtKind::Print { .. }
        ));
    }

    #[test]
    fn missing_paren_in_print_is_recorded_not_fatal() {
        let program = parse_program_str("print 1)");
        let errs = all_errors(&program.statements[0]);
        assert!(errs.contains(&ErrorKind::UnexpectedToken));
        assert!(matches!(
            program.statements[0].kind,
            StmtKind::Print { .. }
        ));
    }

    #[test]
    fn spans_anchor_at_the_first_token() {
        let program = parse_program_str("print(1 + 2)");
        let span = program.statements[0].span;
        assert_eq!((span.line, span.col), (1, 1));
        assert_eq!(span.start, 0);
    }
}
