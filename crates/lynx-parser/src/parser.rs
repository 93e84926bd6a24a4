//! Recursive-descent parser for the Lynx language.
//!
//! The parser is total: it always yields a [`Program`], recording problems
//! as [`Diagnostic`]s on the offending nodes rather than aborting. A source
//! unit is first attempted as a single bare expression; only when that
//! parse fails or leaves tokens behind does the parser rewind and read a
//! statement sequence.

use lynx_syntax::ast::{
    BinaryOp, Expr, ExprKind, FunctionDef, Param, Program, Stmt, StmtKind, TypeLiteral, UnaryOp,
};
use lynx_syntax::diag::{Diagnostic, ErrorKind};
use lynx_syntax::token::{Token, TokenKind};
use lynx_syntax::types::Type;

use crate::stream::TokenStream;

/// Raised when expression parsing hits a token no production accepts.
/// Carries the offending token, which has already been consumed.
pub(crate) struct ParseInterrupt {
    pub token: Token,
}

type ExprResult = Result<Expr, ParseInterrupt>;

pub struct Parser {
    stream: TokenStream,
    // Declared return types of the enclosing function definitions; return
    // statements are only legal while this is non-empty.
    fn_stack: Vec<Type>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            fn_stack: Vec::new(),
        }
    }

    /// Parse the whole token stream into a program.
    pub fn parse_program(&mut self) -> Program {
        if let Ok(expr) = self.expression() {
            if !self.stream.has_more() {
                return Program::from_expression(expr);
            }
        }
        self.stream.reset();
        let mut statements = Vec::new();
        while self.stream.has_more() {
            statements.push(self.statement());
        }
        Program::from_statements(statements)
    }

    /// Parse a single expression, yielding a syntax-error placeholder when
    /// no production matches.
    pub fn parse_expr(&mut self) -> Expr {
        match self.expression() {
            Ok(e) => e,
            Err(ParseInterrupt { token }) => {
                let span = token.span();
                let mut e = Expr::new(ExprKind::SyntaxError { token }, span);
                e.errors.push(Diagnostic::new(ErrorKind::UnexpectedToken, span));
                e
            }
        }
    }

    // === Statements ===

    fn statement(&mut self) -> Stmt {
        match self.stream.kind() {
            TokenKind::Print => self.print_statement(),
            TokenKind::Var => self.var_statement(),
            TokenKind::Function => self.function_definition(),
            TokenKind::If => self.if_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Return if !self.fn_stack.is_empty() => self.return_statement(),
            TokenKind::Identifier => self.assignment_or_call_statement(),
            _ => {
                let token = self.stream.consume();
                self.syntax_error_statement(token)
            }
        }
    }

    fn print_statement(&mut self) -> Stmt {
        let start = self.stream.consume();
        let mut errors = Vec::new();
        self.require(TokenKind::LeftParen, &mut errors, ErrorKind::UnexpectedToken);
        let value = match self.expression() {
            Ok(e) => e,
            Err(i) => return self.recover_statement(i.token),
        };
        self.require(TokenKind::RightParen, &mut errors, ErrorKind::UnexpectedToken);
        let span = start.span().to(self.stream.previous().span());
        let mut stmt = Stmt::new(StmtKind::Print { value }, span);
        stmt.errors = errors;
        stmt
    }

    fn var_statement(&mut self) -> Stmt {
        let start = self.stream.consume();
        let mut errors = Vec::new();
        let name = self.require(TokenKind::Identifier, &mut errors, ErrorKind::UnexpectedToken);
        let explicit = if self.stream.match_and_consume(TokenKind::Colon).is_some() {
            Some(self.type_literal())
        } else {
            None
        };
        self.require(TokenKind::Equal, &mut errors, ErrorKind::UnexpectedToken);
        let init = match self.expression() {
            Ok(e) => e,
            Err(i) => return self.recover_statement(i.token),
        };
        let span = start.span().to(init.span);
        let mut stmt = Stmt::new(
            StmtKind::Var {
                name: name.lexeme,
                explicit,
                init,
                declared: None,
            },
            span,
        );
        stmt.errors = errors;
        stmt
    }

    fn assignment_or_call_statement(&mut self) -> Stmt {
        let name = self.stream.consume();
        if self.stream.check(TokenKind::LeftParen) {
            return match self.call_expression(name) {
                Ok(call) => {
                    let span = call.span;
                    Stmt::new(StmtKind::Call(call), span)
                }
                Err(i) => self.recover_statement(i.token),
            };
        }
        let mut errors = Vec::new();
        self.require(TokenKind::Equal, &mut errors, ErrorKind::UnexpectedToken);
        let value = match self.expression() {
            Ok(e) => e,
            Err(i) => return self.recover_statement(i.token),
        };
        let span = name.span().to(value.span);
        let mut stmt = Stmt::new(
            StmtKind::Assign {
                name: name.lexeme,
                value,
            },
            span,
        );
        stmt.errors = errors;
        stmt
    }

    fn if_statement(&mut self) -> Stmt {
        let start = self.stream.consume();
        let mut errors = Vec::new();
        self.require(TokenKind::LeftParen, &mut errors, ErrorKind::UnexpectedToken);
        let cond = match self.expression() {
            Ok(e) => e,
            Err(i) => return self.recover_statement(i.token),
        };
        self.require(TokenKind::RightParen, &mut errors, ErrorKind::UnexpectedToken);
        self.require(TokenKind::LeftBrace, &mut errors, ErrorKind::UnexpectedToken);
        let then_body = self.block_body();
        self.require(TokenKind::RightBrace, &mut errors, ErrorKind::UnexpectedToken);
        let else_body = if self.stream.match_and_consume(TokenKind::Else).is_some() {
            if self.stream.check(TokenKind::If) {
                vec![self.if_statement()]
            } else {
                self.require(TokenKind::LeftBrace, &mut errors, ErrorKind::UnexpectedToken);
                let body = self.block_body();
                self.require(TokenKind::RightBrace, &mut errors, ErrorKind::UnexpectedToken);
                body
            }
        } else {
            Vec::new()
        };
        let span = start.span().to(self.stream.previous().span());
        let mut stmt = Stmt::new(
            StmtKind::If {
                cond,
                then_body,
                else_body,
            },
            span,
        );
        stmt.errors = errors;
        stmt
    }

    fn for_statement(&mut self) -> Stmt {
        let start = self.stream.consume();
        let mut errors = Vec::new();
        self.require(TokenKind::LeftParen, &mut errors, ErrorKind::UnexpectedToken);
        let var = self.require(TokenKind::Identifier, &mut errors, ErrorKind::UnexpectedToken);
        self.require(TokenKind::In, &mut errors, ErrorKind::UnexpectedToken);
        let iterable = match self.expression() {
            Ok(e) => e,
            Err(i) => return self.recover_statement(i.token),
        };
        self.require(TokenKind::RightParen, &mut errors, ErrorKind::UnexpectedToken);
        self.require(TokenKind::LeftBrace, &mut errors, ErrorKind::UnexpectedToken);
        let body = self.block_body();
        self.require(TokenKind::RightBrace, &mut errors, ErrorKind::UnexpectedToken);
        let span = start.span().to(self.stream.previous().span());
        let mut stmt = Stmt::new(
            StmtKind::For {
                var: var.lexeme,
                iterable,
                body,
            },
            span,
        );
        stmt.errors = errors;
        stmt
    }

    fn function_definition(&mut self) -> Stmt {
        let start = self.stream.consume();
        let mut errors = Vec::new();
        let name = self.require(TokenKind::Identifier, &mut errors, ErrorKind::UnexpectedToken);
        self.require(TokenKind::LeftParen, &mut errors, ErrorKind::UnexpectedToken);
        let mut params = Vec::new();
        if !self.stream.check(TokenKind::RightParen) && self.stream.has_more() {
            loop {
                let pname =
                    self.require(TokenKind::Identifier, &mut errors, ErrorKind::UnexpectedToken);
                let ty = if self.stream.match_and_consume(TokenKind::Colon).is_some() {
                    Some(self.type_literal())
                } else {
                    None
                };
                params.push(Param {
                    name: pname.lexeme,
                    ty,
                });
                if self.stream.match_and_consume(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.require(TokenKind::RightParen, &mut errors, ErrorKind::UnexpectedToken);
        let return_type = if self.stream.match_and_consume(TokenKind::Colon).is_some() {
            Some(self.type_literal())
        } else {
            None
        };
        let ret = return_type
            .as_ref()
            .map(|t| t.ty.clone())
            .unwrap_or(Type::Void);
        self.require(TokenKind::LeftBrace, &mut errors, ErrorKind::UnexpectedToken);
        self.fn_stack.push(ret);
        let body = self.block_body();
        self.fn_stack.pop();
        self.require(TokenKind::RightBrace, &mut errors, ErrorKind::UnexpectedToken);
        let span = start.span().to(self.stream.previous().span());
        let mut stmt = Stmt::new(
            StmtKind::FunctionDef(FunctionDef {
                name: name.lexeme,
                params,
                return_type,
                body,
            }),
            span,
        );
        stmt.errors = errors;
        stmt
    }

    fn return_statement(&mut self) -> Stmt {
        let start = self.stream.consume();
        let fn_return = self.fn_stack.last().cloned().unwrap_or(Type::Void);
        let value = if self.stream.check(TokenKind::RightBrace) || !self.stream.has_more() {
            None
        } else {
            match self.expression() {
                Ok(e) => Some(e),
                Err(i) => return self.recover_statement(i.token),
            }
        };
        let end = value
            .as_ref()
            .map(|e| e.span)
            .unwrap_or_else(|| start.span());
        let span = start.span().to(end);
        Stmt::new(StmtKind::Return { value, fn_return }, span)
    }

    fn block_body(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        while self.stream.has_more() && !self.stream.check(TokenKind::RightBrace) {
            stmts.push(self.statement());
        }
        stmts
    }

    fn syntax_error_statement(&mut self, token: Token) -> Stmt {
        let span = token.span();
        let mut stmt = Stmt::new(StmtKind::SyntaxError { token }, span);
        stmt.errors.push(Diagnostic::new(ErrorKind::UnexpectedToken, span));
        stmt
    }

    // Statement-level recovery after a failed expression parse: record the
    // offending token and scan forward to a token that can begin a
    // statement (or close the enclosing block).
    fn recover_statement(&mut self, token: Token) -> Stmt {
        let stmt = self.syntax_error_statement(token);
        while self.stream.has_more() {
            match self.stream.kind() {
                TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Print
                | TokenKind::Function
                | TokenKind::Return
                | TokenKind::RightBrace => break,
                _ => {
                    self.stream.consume();
                }
            }
        }
        stmt
    }

    // Consume a token of the given kind, or record a diagnostic at the
    // current token without consuming it.
    fn require(
        &mut self,
        kind: TokenKind,
        errors: &mut Vec<Diagnostic>,
        err: ErrorKind,
    ) -> Token {
        if let Some(tok) = self.stream.match_and_consume(kind) {
            tok
        } else {
            let cur = self.stream.current().clone();
            errors.push(Diagnostic::new(err, cur.span()));
            cur
        }
    }

    // === Type annotations ===

    fn type_literal(&mut self) -> TypeLiteral {
        let tok = self.stream.consume();
        let mut errors = Vec::new();
        let mut span = tok.span();
        let ty = if tok.kind == TokenKind::Identifier {
            match tok.lexeme.as_str() {
                "int" => Type::Int,
                "string" => Type::String,
                "bool" => Type::Bool,
                "object" => Type::Object,
                "list" => {
                    if self.stream.match_and_consume(TokenKind::Less).is_some() {
                        let inner = self.type_literal();
                        errors.extend(inner.errors.iter().copied());
                        self.require(TokenKind::Greater, &mut errors, ErrorKind::UnexpectedToken);
                        span = span.to(self.stream.previous().span());
                        Type::list_of(inner.ty)
                    } else {
                        Type::list_of(Type::Object)
                    }
                }
                _ => {
                    errors.push(Diagnostic::new(ErrorKind::BadTypeName, tok.span()));
                    Type::Object
                }
            }
        } else {
            errors.push(Diagnostic::new(ErrorKind::BadTypeName, tok.span()));
            Type::Object
        };
        TypeLiteral { ty, span, errors }
    }

    // === Expressions ===

    fn expression(&mut self) -> ExprResult {
        self.equality()
    }

    fn equality(&mut self) -> ExprResult {
        let mut e = self.comparison()?;
        loop {
            let op = match self.stream.kind() {
                TokenKind::EqualEqual => BinaryOp::Eq,
                TokenKind::BangEqual => BinaryOp::Ne,
                _ => break,
            };
            self.stream.consume();
            let rhs = self.comparison()?;
            e = binary(op, e, rhs);
        }
        Ok(e)
    }

    fn comparison(&mut self) -> ExprResult {
        let mut e = self.additive()?;
        loop {
            let op = match self.stream.kind() {
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::LessEqual => BinaryOp::Le,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::GreaterEqual => BinaryOp::Ge,
                _ => break,
            };
            self.stream.consume();
            let rhs = self.additive()?;
            e = binary(op, e, rhs);
        }
        Ok(e)
    }

    fn additive(&mut self) -> ExprResult {
        let mut e = self.factor()?;
        loop {
            let op = match self.stream.kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.stream.consume();
            let rhs = self.factor()?;
            e = binary(op, e, rhs);
        }
        Ok(e)
    }

    fn factor(&mut self) -> ExprResult {
        let mut e = self.unary()?;
        loop {
            let op = match self.stream.kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.stream.consume();
            let rhs = self.unary()?;
            e = binary(op, e, rhs);
        }
        Ok(e)
    }

    fn unary(&mut self) -> ExprResult {
        let op = match self.stream.kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.primary(),
        };
        let tok = self.stream.consume();
        let operand = self.unary()?;
        let span = tok.span().to(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn primary(&mut self) -> ExprResult {
        let tok = self.stream.consume();
        let span = tok.span();
        match tok.kind {
            TokenKind::Integer => Ok(Expr::new(
                ExprKind::IntLiteral(tok.lexeme.parse().unwrap_or_default()),
                span,
            )),
            TokenKind::String => Ok(Expr::new(ExprKind::StringLiteral(tok.lexeme), span)),
            TokenKind::True => Ok(Expr::new(ExprKind::BoolLiteral(true), span)),
            TokenKind::False => Ok(Expr::new(ExprKind::BoolLiteral(false), span)),
            TokenKind::Null => Ok(Expr::new(ExprKind::NullLiteral, span)),
            TokenKind::Identifier => {
                if self.stream.check(TokenKind::LeftParen) {
                    self.call_expression(tok)
                } else {
                    Ok(Expr::new(ExprKind::Identifier(tok.lexeme), span))
                }
            }
            TokenKind::LeftParen => {
                let inner = self.expression()?;
                let mut errors = Vec::new();
                self.require(TokenKind::RightParen, &mut errors, ErrorKind::UnexpectedToken);
                let span = span.to(self.stream.previous().span());
                let mut e = Expr::new(ExprKind::Parenthesized(Box::new(inner)), span);
                e.errors = errors;
                Ok(e)
            }
            TokenKind::LeftBracket => self.list_literal(tok),
            _ => Err(ParseInterrupt { token: tok }),
        }
    }

    // `name` has been consumed and the cursor sits on the opening paren.
    fn call_expression(&mut self, name: Token) -> ExprResult {
        self.stream.consume();
        let mut errors = Vec::new();
        let mut args = Vec::new();
        if !self.stream.check(TokenKind::RightParen) && self.stream.has_more() {
            loop {
                args.push(self.expression()?);
                if self.stream.match_and_consume(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        if self.stream.match_and_consume(TokenKind::RightParen).is_none() {
            errors.push(Diagnostic::new(
                ErrorKind::UnterminatedArgList,
                self.stream.current().span(),
            ));
        }
        let span = name.span().to(self.stream.previous().span());
        let mut e = Expr::new(
            ExprKind::Call {
                name: name.lexeme,
                args,
            },
            span,
        );
        e.errors = errors;
        Ok(e)
    }

    fn list_literal(&mut self, open: Token) -> ExprResult {
        let mut errors = Vec::new();
        let mut items = Vec::new();
        if !self.stream.check(TokenKind::RightBracket) && self.stream.has_more() {
            loop {
                items.push(self.expression()?);
                if self.stream.match_and_consume(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        if self
            .stream
            .match_and_consume(TokenKind::RightBracket)
            .is_none()
        {
            errors.push(Diagnostic::new(
                ErrorKind::UnterminatedList,
                self.stream.current().span(),
            ));
        }
        let span = open.span().to(self.stream.previous().span());
        let mut e = Expr::new(ExprKind::ListLiteral(items), span);
        e.errors = errors;
        Ok(e)
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let span = lhs.span.to(rhs.span);
    Expr::new(
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        span,
    )
}
