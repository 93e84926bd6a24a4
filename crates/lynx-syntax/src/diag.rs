//! Static-analysis diagnostics.
//!
//! Parse and validation problems are not fatal: they are recorded on the
//! offending node and analysis continues, so a single pass surfaces every
//! error in the source unit. A program carrying any diagnostic is refused
//! execution and compilation by the driver.

use std::fmt;

use crate::token::Span;

/// The closed set of static error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required token was missing at this position
    UnexpectedToken,
    /// A type annotation named no known type
    BadTypeName,
    /// An argument list was never closed with `)`
    UnterminatedArgList,
    /// A list literal was never closed with `]`
    UnterminatedList,
    /// An identifier or function name did not resolve
    UnknownName,
    /// A call supplied the wrong number of arguments
    ArgMismatch,
    /// A value's type is not assignable where it was used
    IncompatibleTypes,
    /// A name was declared twice in overlapping scopes
    DuplicateName,
    /// A non-void function body has a path with no return
    MissingReturnStatement,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::UnexpectedToken => "unexpected token",
            ErrorKind::BadTypeName => "bad type name",
            ErrorKind::UnterminatedArgList => "unterminated argument list",
            ErrorKind::UnterminatedList => "unterminated list literal",
            ErrorKind::UnknownName => "unknown name",
            ErrorKind::ArgMismatch => "wrong number of arguments",
            ErrorKind::IncompatibleTypes => "incompatible types",
            ErrorKind::DuplicateName => "duplicate name",
            ErrorKind::MissingReturnStatement => "missing return statement",
        };
        write!(f, "{}", s)
    }
}

/// One recorded static error: what went wrong and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.kind, self.span.line, self.span.col)
    }
}
