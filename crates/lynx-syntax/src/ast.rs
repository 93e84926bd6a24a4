//! AST types for the Lynx language.
//!
//! Nodes are closed enums matched exhaustively by the checker and both
//! backends. Every node owns its children, carries the source span it was
//! parsed from, and accumulates the diagnostics recorded against it by the
//! parser and the checker. Expressions additionally carry the type the
//! checker inferred for them; that field is `None` until validation runs
//! (or when resolution failed), and consumers fall back to `object` via
//! [`Expr::static_type`].

use crate::diag::Diagnostic;
use crate::token::{Span, Token};
use crate::types::Type;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Integer negation `-`
    Neg,
    /// Boolean negation `!`
    Not,
}

/// Binary operators, grouped by precedence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl BinaryOp {
    /// Whether this operator is `+`/`-` (the level with string semantics).
    pub fn is_additive(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub)
    }

    /// Whether this operator is `*`/`/`.
    pub fn is_factor(self) -> bool {
        matches!(self, BinaryOp::Mul | BinaryOp::Div)
    }

    /// Whether this operator is an ordering comparison.
    pub fn is_comparison(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }

    /// Whether this operator is `==`/`!=`.
    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne)
    }
}

/// Expression node kinds.
#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(i64),
    StringLiteral(String),
    BoolLiteral(bool),
    NullLiteral,
    ListLiteral(Vec<Expr>),
    Identifier(String),
    Parenthesized(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    /// Placeholder produced when an expression could not be parsed at all
    SyntaxError {
        token: Token,
    },
}

/// An expression with its span, inferred type and attached diagnostics.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Set by the checker; `None` before validation or when unresolved
    pub ty: Option<Type>,
    pub errors: Vec<Diagnostic>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: None,
            errors: Vec::new(),
        }
    }

    /// The inferred type, falling back to `object` so downstream analysis
    /// keeps working under prior errors.
    pub fn static_type(&self) -> Type {
        self.ty.clone().unwrap_or(Type::Object)
    }
}

/// A type annotation as written in source (`int`, `list<string>`, ...).
///
/// Only ever appears inside declarations: variable annotations, function
/// parameters and return types.
#[derive(Debug, Clone)]
pub struct TypeLiteral {
    pub ty: Type,
    pub span: Span,
    pub errors: Vec<Diagnostic>,
}

/// A function parameter with an optional type annotation (`object` when
/// omitted).
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeLiteral>,
}

impl Param {
    /// The declared parameter type, defaulting to `object`.
    pub fn declared_type(&self) -> Type {
        self.ty.as_ref().map(|t| t.ty.clone()).unwrap_or(Type::Object)
    }
}

/// A named function definition.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    /// `None` means no annotation, i.e. a `void` function
    pub return_type: Option<TypeLiteral>,
    pub body: Vec<Stmt>,
}

impl FunctionDef {
    /// The declared return type, defaulting to `void`.
    pub fn declared_return_type(&self) -> Type {
        self.return_type
            .as_ref()
            .map(|t| t.ty.clone())
            .unwrap_or(Type::Void)
    }

    /// The declared type of parameter `i`.
    pub fn param_type(&self, i: usize) -> Type {
        self.params
            .get(i)
            .map(Param::declared_type)
            .unwrap_or(Type::Object)
    }
}

/// Statement node kinds.
#[derive(Debug, Clone)]
pub enum StmtKind {
    Print {
        value: Expr,
    },
    Var {
        name: String,
        explicit: Option<TypeLiteral>,
        init: Expr,
        /// Filled in by the checker: the annotation when present and
        /// compatible, otherwise the initializer's inferred type
        declared: Option<Type>,
    },
    Assign {
        name: String,
        value: Expr,
    },
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        /// `else if` chains nest as a single if statement in here
        else_body: Vec<Stmt>,
    },
    For {
        var: String,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    FunctionDef(FunctionDef),
    Return {
        value: Option<Expr>,
        /// Declared return type of the enclosing function, captured by the
        /// parser so the checker and backends need no parent pointer
        fn_return: Type,
    },
    /// A call in statement position (always `ExprKind::Call` inside)
    Call(Expr),
    /// Placeholder for a statement that matched no production
    SyntaxError {
        token: Token,
    },
}

/// A statement with its span and attached diagnostics.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
    pub errors: Vec<Diagnostic>,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self {
            kind,
            span,
            errors: Vec::new(),
        }
    }
}

/// The root of a parsed source unit.
///
/// Holds either a statement sequence or a single bare expression, never
/// both: the parser commits to expression form only when an expression
/// parse succeeds and consumes the whole input.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub expression: Option<Expr>,
}

impl Program {
    pub fn from_statements(statements: Vec<Stmt>) -> Self {
        Self {
            statements,
            expression: None,
        }
    }

    pub fn from_expression(expression: Expr) -> Self {
        Self {
            statements: Vec::new(),
            expression: Some(expression),
        }
    }

    /// Iterate the top-level function definitions.
    pub fn function_defs(&self) -> impl Iterator<Item = &FunctionDef> {
        self.statements.iter().filter_map(|s| match &s.kind {
            StmtKind::FunctionDef(f) => Some(f),
            _ => None,
        })
    }
}
