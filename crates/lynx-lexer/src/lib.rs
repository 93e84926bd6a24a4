//! Lynx lexer: converts source text into tokens.
//!
//! The lexer is total. Stray characters and unterminated strings become
//! [`TokenKind::Error`] tokens instead of aborting the scan, so the parser
//! always receives a complete stream ending in [`TokenKind::Eof`].

use lynx_syntax::token::{Token, TokenKind};

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    offset: usize,
    line: usize,
    col: usize,
}

// Position of a token's first character, captured before scanning it.
struct Mark {
    offset: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            self.offset += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn mark(&self) -> Mark {
        Mark {
            offset: self.offset,
            line: self.line,
            col: self.col,
        }
    }

    fn make_token(&self, mark: Mark, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token {
            kind,
            lexeme: lexeme.into(),
            start: mark.offset,
            end: self.offset,
            line: mark.line,
            col: mark.col,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.peek_next() == Some('/') {
                while let Some(c2) = self.peek() {
                    if c2 == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Token {
        let mark = self.mark();
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        self.make_token(mark, TokenKind::Integer, s)
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let mark = self.mark();
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = match s.as_str() {
            "print" => TokenKind::Print,
            "var" => TokenKind::Var,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "return" => TokenKind::Return,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Identifier,
        };
        self.make_token(mark, kind, s)
    }

    // The opening quote has already been consumed; `mark` points at it.
    fn read_string(&mut self, mark: Mark) -> Token {
        let mut s = String::new();
        while let Some(c) = self.advance() {
            match c {
                '"' => return self.make_token(mark, TokenKind::String, s),
                '\\' => {
                    if let Some(n) = self.advance() {
                        let esc = match n {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            '\\' => '\\',
                            '"' => '"',
                            other => other,
                        };
                        s.push(esc);
                    } else {
                        break;
                    }
                }
                other => s.push(other),
            }
        }
        self.make_token(mark, TokenKind::Error, s)
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let mark = self.mark();
            let tk = match self.peek() {
                None => {
                    tokens.push(self.make_token(mark, TokenKind::Eof, ""));
                    break;
                }
                Some('(') => {
                    self.advance();
                    self.make_token(mark, TokenKind::LeftParen, "(")
                }
                Some(')') => {
                    self.advance();
                    self.make_token(mark, TokenKind::RightParen, ")")
                }
                Some('{') => {
                    self.advance();
                    self.make_token(mark, TokenKind::LeftBrace, "{")
                }
                Some('}') => {
                    self.advance();
                    self.make_token(mark, TokenKind::RightBrace, "}")
                }
                Some('[') => {
                    self.advance();
                    self.make_token(mark, TokenKind::LeftBracket, "[")
                }
                Some(']') => {
                    self.advance();
                    self.make_token(mark, TokenKind::RightBracket, "]")
                }
                Some(',') => {
                    self.advance();
                    self.make_token(mark, TokenKind::Comma, ",")
                }
                Some(':') => {
                    self.advance();
                    self.make_token(mark, TokenKind::Colon, ":")
                }
                Some('=') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        self.make_token(mark, TokenKind::EqualEqual, "==")
                    } else {
                        self.make_token(mark, TokenKind::Equal, "=")
                    }
                }
                Some('!') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        self.make_token(mark, TokenKind::BangEqual, "!=")
                    } else {
                        self.make_token(mark, TokenKind::Bang, "!")
                    }
                }
                Some('<') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        self.make_token(mark, TokenKind::LessEqual, "<=")
                    } else {
                        self.make_token(mark, TokenKind::Less, "<")
                    }
                }
                Some('>') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        self.make_token(mark, TokenKind::GreaterEqual, ">=")
                    } else {
                        self.make_token(mark, TokenKind::Greater, ">")
                    }
                }
                Some('+') => {
                    self.advance();
                    self.make_token(mark, TokenKind::Plus, "+")
                }
                Some('-') => {
                    self.advance();
                    self.make_token(mark, TokenKind::Minus, "-")
                }
                Some('*') => {
                    self.advance();
                    self.make_token(mark, TokenKind::Star, "*")
                }
                Some('/') => {
                    self.advance();
                    self.make_token(mark, TokenKind::Slash, "/")
                }
                Some('"') => {
                    self.advance();
                    self.read_string(mark)
                }
                Some(c) if c.is_ascii_digit() => self.read_number(),
                Some(c) if c.is_ascii_alphabetic() || c == '_' => self.read_ident_or_keyword(),
                Some(other) => {
                    self.advance();
                    self.make_token(mark, TokenKind::Error, other.to_string())
                }
            };
            tokens.push(tk);
        }
        tokens
    }
}

/// Tokenize `input` in one call.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lynx_syntax::token::TokenKind::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn arithmetic_expression() {
        assert_eq!(
            kinds("1+1-12"),
            vec![Integer, Plus, Integer, Minus, Integer, Eof]
        );
    }

    #[test]
    fn brace_runs_tokenize_individually() {
        assert_eq!(
            kinds("{{})"),
            vec![LeftBrace, LeftBrace, RightBrace, RightParen, Eof]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("var x = true"),
            vec![Var, Identifier, Equal, True, Eof]
        );
        assert_eq!(kinds("printx print"), vec![Identifier, Print, Eof]);
        let tokens = tokenize("for item in items");
        assert_eq!(tokens[1].lexeme, "item");
        assert_eq!(tokens[3].lexeme, "items");
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(
            kinds("== != <= >= < > = !"),
            vec![
                EqualEqual,
                BangEqual,
                LessEqual,
                GreaterEqual,
                Less,
                Greater,
                Equal,
                Bang,
                Eof
            ]
        );
    }

    #[test]
    fn string_literals_decode_escapes() {
        let tokens = tokenize(r#""hello\nworld""#);
        assert_eq!(tokens[0].kind, String);
        assert_eq!(tokens[0].lexeme, "hello\nworld");
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        let tokens = tokenize("\"oops");
        assert_eq!(tokens[0].kind, Error);
        assert_eq!(tokens[1].kind, Eof);
    }

    #[test]
    fn stray_character_is_an_error_token() {
        assert_eq!(kinds("1 & 2"), vec![Integer, Error, Integer, Eof]);
    }

    #[test]
    fn line_comments_are_skipped() {
        assert_eq!(
            kinds("1 // everything after\n2"),
            vec![Integer, Integer, Eof]
        );
        assert_eq!(kinds("// only a comment"), vec![Eof]);
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let tokens = tokenize("var x\nprint x");
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (1, 5));
        assert_eq!((tokens[2].line, tokens[2].col), (2, 1));
        assert_eq!((tokens[3].line, tokens[3].col), (2, 7));
    }

    #[test]
    fn byte_offsets_cover_the_lexeme() {
        let tokens = tokenize("print \"hi\"");
        assert_eq!((tokens[0].start, tokens[0].end), (0, 5));
        // string offsets include the quotes
        assert_eq!((tokens[1].start, tokens[1].end), (6, 10));
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(kinds(""), vec![Eof]);
    }
}
