//! Token definitions for the Lynx language.
//!
//! Tokens are the smallest meaningful units of Lynx source code. Each token
//! carries its lexical category, the literal text it was scanned from, and
//! its position in the source (byte offset range plus line and column).
//! Tokens are produced once by the lexer and never modified afterwards.

use std::fmt;

/// Lexical categories produced by the Lynx lexer.
///
/// The kind is a plain tag; the text of literals and identifiers lives in
/// [`Token::lexeme`]. This keeps lookahead-by-kind cheap in the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // === Literals ===
    /// An integer literal such as `42`
    Integer,
    /// A string literal such as `"hello"` (lexeme holds the unquoted text)
    String,
    /// An identifier such as `foo` or `my_var`
    Identifier,

    // === Keywords ===
    /// The `print` keyword
    Print,
    /// The `var` keyword
    Var,
    /// The `function` keyword
    Function,
    /// The `if` keyword
    If,
    /// The `else` keyword
    Else,
    /// The `for` keyword
    For,
    /// The `in` keyword
    In,
    /// The `return` keyword
    Return,
    /// The `true` literal keyword
    True,
    /// The `false` literal keyword
    False,
    /// The `null` literal keyword
    Null,

    // === Punctuation ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,

    // === Operators ===
    /// `=`
    Equal,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `!`
    Bang,

    // === Special ===
    /// A character sequence the lexer could not classify
    Error,
    /// End-of-input marker; every token stream ends with exactly one
    Eof,
}

/// A token with its literal text and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical category of this token
    pub kind: TokenKind,
    /// The literal text the token was scanned from
    pub lexeme: String,
    /// Byte offset of the first character in the source
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Line number in the source file (1-based)
    pub line: usize,
    /// Column number in the source file (1-based)
    pub col: usize,
}

impl Token {
    /// The source span covered by this single token.
    pub fn span(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
            line: self.line,
            col: self.col,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}['{}']", self.kind, self.lexeme)
    }
}

/// A contiguous region of source text, anchored at the position of its first
/// token. Nodes built from several tokens span from the leftmost start to
/// the rightmost end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the first covered character
    pub start: usize,
    /// Byte offset one past the last covered character
    pub end: usize,
    /// Line of the first covered character (1-based)
    pub line: usize,
    /// Column of the first covered character (1-based)
    pub col: usize,
}

impl Span {
    /// Span from the start of `first` to the end of `last`.
    pub fn between(first: &Token, last: &Token) -> Span {
        Span {
            start: first.start,
            end: last.end,
            line: first.line,
            col: first.col,
        }
    }

    /// Combine two spans, keeping the left anchor of `self`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
            line: self.line,
            col: self.col,
        }
    }
}
