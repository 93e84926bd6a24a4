//! Host-level error type shared across the Lynx toolchain.
//!
//! This is deliberately distinct from [`crate::diag::Diagnostic`]: a
//! `Diagnostic` records a problem in the *user's* program and never aborts
//! a pass, while an [`Error`] signals a failure of the toolchain itself:
//! a VM fault, an attempt to execute an unvalidated tree, an I/O problem.
//!
//! # Examples
//!
//! ```rust
//! use lynx_syntax::error::{Error, Result, error};
//!
//! fn checked_div(a: i64, b: i64) -> Result<i64> {
//!     if b == 0 {
//!         error("division by zero")
//!     } else {
//!         Ok(a / b)
//!     }
//! }
//!
//! let located = Error::with_span("unexpected character '&'", 3, 14);
//! assert_eq!(located.to_string(), "unexpected character '&' at 3:14");
//! ```

use std::fmt;

/// An error raised by the Lynx toolchain, with optional source location.
#[derive(Debug, Clone)]
pub struct Error {
    /// Human-readable error message
    pub msg: String,
    /// Optional 1-based line number in the source file
    pub line: Option<usize>,
    /// Optional 1-based column number in the source file
    pub col: Option<usize>,
}

impl Error {
    /// Create an error with no source location.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Create an error anchored at a source position.
    pub fn with_span(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.msg, l, c)
        } else {
            write!(f, "{}", self.msg)
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::new(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::new(s)
    }
}

/// A specialized `Result` using [`Error`], used throughout the toolchain.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(msg))`.
pub fn error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::new(msg))
}

/// Shorthand for `Err(Error::with_span(msg, line, col))`.
pub fn error_at<T>(line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(msg, line, col))
}
