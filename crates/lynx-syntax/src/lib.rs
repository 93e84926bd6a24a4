//! Syntax definitions shared by every stage of the Lynx toolchain: tokens,
//! the AST, the static type system, diagnostics and the host error type.

pub mod ast;
pub mod diag;
pub mod error;
pub mod token;
pub mod types;

pub use ast::{
    BinaryOp, Expr, ExprKind, FunctionDef, Param, Program, Stmt, StmtKind, TypeLiteral, UnaryOp,
};
pub use diag::{Diagnostic, ErrorKind};
pub use error::{Error, Result};
pub use token::{Span, Token, TokenKind};
pub use types::Type;
