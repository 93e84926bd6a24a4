//! Semantic validation and type inference.
//!
//! Validation decorates the tree in place: every expression gets its
//! inferred type, every `var` statement gets its declared type, and
//! problems are recorded on the offending nodes. The walk never stops at
//! an error, so one pass reports everything. [`validate`] finally flattens
//! the recorded diagnostics into a source-ordered list for the driver.

use std::collections::HashMap;

use lynx_syntax::ast::{Expr, ExprKind, FunctionDef, Program, Stmt, StmtKind, UnaryOp};
use lynx_syntax::diag::{Diagnostic, ErrorKind};
use lynx_syntax::types::Type;

use crate::symbols::SymbolTable;

/// Signature of a declared function.
#[derive(Debug, Clone)]
pub struct FnSig {
    pub params: Vec<Type>,
    pub ret: Type,
}

pub struct Checker {
    symbols: SymbolTable,
    functions: HashMap<String, FnSig>,
}

/// Validate a program in place and return its diagnostics, source-ordered.
pub fn validate(program: &mut Program) -> Vec<Diagnostic> {
    let mut checker = Checker::new();
    checker.check_program(program);
    collect(program)
}

impl Checker {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            functions: HashMap::new(),
        }
    }

    pub fn check_program(&mut self, program: &mut Program) {
        if let Some(expr) = &mut program.expression {
            self.check_expr(expr);
            return;
        }
        // Register every top-level function first so calls may appear
        // before the definition they reference.
        for stmt in &mut program.statements {
            if let StmtKind::FunctionDef(f) = &stmt.kind {
                if self.functions.contains_key(&f.name) {
                    stmt.errors
                        .push(Diagnostic::new(ErrorKind::DuplicateName, stmt.span));
                } else {
                    self.functions.insert(
                        f.name.clone(),
                        FnSig {
                            params: (0..f.params.len()).map(|i| f.param_type(i)).collect(),
                            ret: f.declared_return_type(),
                        },
                    );
                }
            }
        }
        for stmt in &mut program.statements {
            self.check_stmt(stmt);
        }
    }

    fn check_stmt(&mut self, stmt: &mut Stmt) {
        let span = stmt.span;
        match &mut stmt.kind {
            StmtKind::Print { value } => {
                self.check_expr(value);
            }
            StmtKind::Var {
                name,
                explicit,
                init,
                declared,
            } => {
                self.check_expr(init);
                let ty = match explicit {
                    Some(lit) => {
                        if !lit.ty.is_assignable_from(&init.static_type()) {
                            stmt.errors
                                .push(Diagnostic::new(ErrorKind::IncompatibleTypes, init.span));
                        }
                        lit.ty.clone()
                    }
                    None => init.static_type(),
                };
                if self.symbols.has_symbol(name) {
                    stmt.errors
                        .push(Diagnostic::new(ErrorKind::DuplicateName, span));
                } else {
                    self.symbols.register(name.clone(), ty.clone());
                }
                *declared = Some(ty);
            }
            StmtKind::Assign { name, value } => {
                self.check_expr(value);
                match self.symbols.get_symbol(name) {
                    Some(target) => {
                        if !target.is_assignable_from(&value.static_type()) {
                            stmt.errors
                                .push(Diagnostic::new(ErrorKind::IncompatibleTypes, value.span));
                        }
                    }
                    None => {
                        stmt.errors
                            .push(Diagnostic::new(ErrorKind::UnknownName, span));
                    }
                }
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.check_expr(cond);
                if cond.static_type() != Type::Bool {
                    cond.errors
                        .push(Diagnostic::new(ErrorKind::IncompatibleTypes, cond.span));
                }
                self.symbols.push_frame();
                for s in then_body.iter_mut() {
                    self.check_stmt(s);
                }
                self.symbols.pop_frame();
                self.symbols.push_frame();
                for s in else_body.iter_mut() {
                    self.check_stmt(s);
                }
                self.symbols.pop_frame();
            }
            StmtKind::For {
                var,
                iterable,
                body,
            } => {
                self.symbols.push_frame();
                if self.symbols.has_symbol(var) {
                    stmt.errors
                        .push(Diagnostic::new(ErrorKind::DuplicateName, span));
                } else {
                    self.check_expr(iterable);
                    let component = match iterable.static_type() {
                        Type::List(c) => (*c).clone(),
                        _ => {
                            iterable
                                .errors
                                .push(Diagnostic::new(ErrorKind::IncompatibleTypes, iterable.span));
                            Type::Object
                        }
                    };
                    self.symbols.register(var.clone(), component);
                }
                for s in body.iter_mut() {
                    self.check_stmt(s);
                }
                self.symbols.pop_frame();
            }
            StmtKind::FunctionDef(f) => {
                self.symbols.push_frame();
                for i in 0..f.params.len() {
                    let pname = f.params[i].name.clone();
                    if self.symbols.has_symbol(&pname) {
                        stmt.errors
                            .push(Diagnostic::new(ErrorKind::DuplicateName, span));
                    } else {
                        self.symbols.register(pname, f.param_type(i));
                    }
                }
                for s in f.body.iter_mut() {
                    self.check_stmt(s);
                }
                self.symbols.pop_frame();
                if f.declared_return_type() != Type::Void && !ensures_return(&f.body) {
                    stmt.errors
                        .push(Diagnostic::new(ErrorKind::MissingReturnStatement, span));
                }
            }
            StmtKind::Return { value, fn_return } => match value {
                Some(v) => {
                    self.check_expr(v);
                    if !fn_return.is_assignable_from(&v.static_type()) {
                        stmt.errors
                            .push(Diagnostic::new(ErrorKind::IncompatibleTypes, v.span));
                    }
                }
                None => {
                    if *fn_return != Type::Void {
                        stmt.errors
                            .push(Diagnostic::new(ErrorKind::IncompatibleTypes, span));
                    }
                }
            },
            StmtKind::Call(e) => {
                self.check_expr(e);
            }
            StmtKind::SyntaxError { .. } => {}
        }
    }

    fn check_expr(&mut self, expr: &mut Expr) {
        let span = expr.span;
        match &mut expr.kind {
            ExprKind::IntLiteral(_) => expr.ty = Some(Type::Int),
            ExprKind::StringLiteral(_) => expr.ty = Some(Type::String),
            ExprKind::BoolLiteral(_) => expr.ty = Some(Type::Bool),
            ExprKind::NullLiteral => expr.ty = Some(Type::Null),
            ExprKind::ListLiteral(items) => {
                for item in items.iter_mut() {
                    self.check_expr(item);
                }
                let component = items
                    .first()
                    .map(|i| i.static_type())
                    .unwrap_or(Type::Object);
                expr.ty = Some(Type::list_of(component));
            }
            ExprKind::Identifier(name) => match self.symbols.get_symbol(name) {
                Some(ty) => expr.ty = Some(ty),
                None => {
                    expr.errors
                        .push(Diagnostic::new(ErrorKind::UnknownName, span));
                }
            },
            ExprKind::Parenthesized(inner) => {
                self.check_expr(inner);
                expr.ty = inner.ty.clone();
            }
            ExprKind::Unary { op, operand } => {
                self.check_expr(operand);
                let (want, result) = match op {
                    UnaryOp::Neg => (Type::Int, Type::Int),
                    UnaryOp::Not => (Type::Bool, Type::Bool),
                };
                if operand.static_type() != want {
                    expr.errors
                        .push(Diagnostic::new(ErrorKind::IncompatibleTypes, operand.span));
                }
                expr.ty = Some(result);
            }
            ExprKind::Binary { op, lhs, rhs } => {
                self.check_expr(lhs);
                self.check_expr(rhs);
                let op = *op;
                if op.is_equality() {
                    expr.ty = Some(Type::Bool);
                } else if op.is_additive()
                    && (lhs.static_type() == Type::String || rhs.static_type() == Type::String)
                {
                    // concatenation: each operand must be a string, an int
                    // or null
                    for side in [&*lhs, &*rhs] {
                        let ty = side.static_type();
                        if !Type::String.is_assignable_from(&ty) && ty != Type::Int {
                            expr.errors
                                .push(Diagnostic::new(ErrorKind::IncompatibleTypes, side.span));
                        }
                    }
                    expr.ty = Some(Type::String);
                } else {
                    for side in [&*lhs, &*rhs] {
                        if side.static_type() != Type::Int {
                            expr.errors
                                .push(Diagnostic::new(ErrorKind::IncompatibleTypes, side.span));
                        }
                    }
                    expr.ty = Some(if op.is_comparison() {
                        Type::Bool
                    } else {
                        Type::Int
                    });
                }
            }
            ExprKind::Call { name, args } => {
                for arg in args.iter_mut() {
                    self.check_expr(arg);
                }
                match self.functions.get(name).cloned() {
                    Some(sig) => {
                        if args.len() != sig.params.len() {
                            expr.errors
                                .push(Diagnostic::new(ErrorKind::ArgMismatch, span));
                        } else {
                            for (arg, param) in args.iter().zip(&sig.params) {
                                if !param.is_assignable_from(&arg.static_type()) {
                                    expr.errors.push(Diagnostic::new(
                                        ErrorKind::IncompatibleTypes,
                                        arg.span,
                                    ));
                                }
                            }
                        }
                        expr.ty = Some(sig.ret);
                    }
                    None => {
                        expr.errors
                            .push(Diagnostic::new(ErrorKind::UnknownName, span));
                        expr.ty = Some(Type::Object);
                    }
                }
            }
            ExprKind::SyntaxError { .. } => {}
        }
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

// Whether every path through the body reaches a return statement. The last
// statement being a return settles it; otherwise the first if statement in
// the body decides: it must carry an else and both branches must cover.
fn ensures_return(body: &[Stmt]) -> bool {
    let last = match body.last() {
        Some(s) => s,
        None => return false,
    };
    if matches!(last.kind, StmtKind::Return { .. }) {
        return true;
    }
    for s in body {
        if let StmtKind::If {
            then_body,
            else_body,
            ..
        } = &s.kind
        {
            return !else_body.is_empty()
                && ensures_return(then_body)
                && ensures_return(else_body);
        }
    }
    false
}

/// Flatten every diagnostic recorded on the tree into source order.
pub fn collect(program: &Program) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    if let Some(expr) = &program.expression {
        collect_expr(expr, &mut out);
    }
    for stmt in &program.statements {
        collect_stmt(stmt, &mut out);
    }
    out
}

fn collect_stmt(stmt: &Stmt, out: &mut Vec<Diagnostic>) {
    out.extend(stmt.errors.iter().copied());
    match &stmt.kind {
        StmtKind::Print { value } => collect_expr(value, out),
        StmtKind::Var { explicit, init, .. } => {
            if let Some(lit) = explicit {
                out.extend(lit.errors.iter().copied());
            }
            collect_expr(init, out);
        }
        StmtKind::Assign { value, .. } => collect_expr(value, out),
        StmtKind::If {
            cond,
            then_body,
            else_body,
        } => {
            collect_expr(cond, out);
            then_body.iter().for_each(|s| collect_stmt(s, out));
            else_body.iter().for_each(|s| collect_stmt(s, out));
        }
        StmtKind::For { iterable, body, .. } => {
            collect_expr(iterable, out);
            body.iter().for_each(|s| collect_stmt(s, out));
        }
        StmtKind::FunctionDef(f) => collect_function(f, out),
        StmtKind::Return { value, .. } => {
            if let Some(v) = value {
                collect_expr(v, out);
            }
        }
        StmtKind::Call(e) => collect_expr(e, out),
        StmtKind::SyntaxError { .. } => {}
    }
}

fn collect_function(f: &FunctionDef, out: &mut Vec<Diagnostic>) {
    for p in &f.params {
        if let Some(lit) = &p.ty {
            out.extend(lit.errors.iter().copied());
        }
    }
    if let Some(lit) = &f.return_type {
        out.extend(lit.errors.iter().copied());
    }
    f.body.iter().for_each(|s| collect_stmt(s, out));
}

fn collect_expr(expr: &Expr, out: &mut Vec<Diagnostic>) {
    out.extend(expr.errors.iter().copied());
    match &expr.kind {
        ExprKind::ListLiteral(items) => items.iter().for_each(|i| collect_expr(i, out)),
        ExprKind::Parenthesized(inner) => collect_expr(inner, out),
        ExprKind::Unary { operand, .. } => collect_expr(operand, out),
        ExprKind::Binary { lhs, rhs, .. } => {
            collect_expr(lhs, out);
            collect_expr(rhs, out);
        }
        ExprKind::Call { args, .. } => args.iter().for_each(|a| collect_expr(a, out)),
        _ => {}
    }
}
