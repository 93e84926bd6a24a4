//! Cursor over a lexed token vector.

use lynx_syntax::token::{Token, TokenKind};

/// A token cursor with single-token lookahead and rewind support.
///
/// The stream always holds at least the Eof token the lexer appends, and
/// the cursor sticks at Eof instead of running past the end.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof)));
        Self { tokens, pos: 0 }
    }

    /// The token under the cursor.
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// The kind of the token under the cursor.
    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    /// The kind of the token one past the cursor.
    pub fn next_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// The most recently consumed token.
    pub fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Whether the cursor sits on a token of the given kind.
    pub fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Consume and return the current token; the cursor never moves past
    /// Eof.
    pub fn consume(&mut self) -> Token {
        let tok = self.current().clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    /// Consume the current token only if it has the given kind.
    pub fn match_and_consume(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.consume())
        } else {
            None
        }
    }

    /// Whether any tokens other than Eof remain.
    pub fn has_more(&self) -> bool {
        !self.check(TokenKind::Eof)
    }

    /// Rewind the cursor to the first token.
    pub fn reset(&mut self) {
        self.pos = 0;
    }
}
