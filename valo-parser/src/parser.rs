use crate::ast::{Expr, ExprKind};
use crate::lexer::{Token, TokenKind};
use std::mem;
use valo_source::{Error, ErrorKind, Result};

mod expr;

/// Expression nesting bound. Parsing past it is reported as resource
/// exhaustion instead of crashing on a blown call stack.
const MAX_DEPTH: u32 = 256;

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Current expression nesting depth, bounded by [`MAX_DEPTH`].
    depth: u32,
    /// Synthesized when reading past the end of the stream, reusing the
    /// final real token's location so errors still point somewhere.
    eof: Token,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let eof_loc = tokens.last().map(|token| token.loc).unwrap_or_default();
        Self {
            tokens,
            pos: 0,
            depth: 0,
            eof: Token::new(TokenKind::Eof, eof_loc),
        }
    }

    /// Parses the whole token stream as one implicit top-level block, so
    /// `;`-sequencing and the trailing-value rule apply at top level too.
    /// Every token must be consumed; leftovers are a syntax error.
    pub fn parse_program(&mut self) -> Result<Expr> {
        let loc = self.peek().loc;
        let body = self.parse_block_body(&TokenKind::Eof)?;
        Ok(Expr::new(ExprKind::Block(body), loc))
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Predicate that tests whether the next token has the same discriminant
    /// as `kind`.
    fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.peek().kind) == mem::discriminant(kind)
    }

    /// Like [`Self::check`], but eats the next token on a match.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.check(kind) {
            Ok(self.next())
        } else {
            Err(self.expected(&kind.to_string()))
        }
    }

    /// An unexpected-token error naming what was expected instead.
    fn expected(&self, what: &str) -> Error {
        let found = self.peek();
        Error::new(
            ErrorKind::Syntax,
            format!("expected {}, found {}", what, found.kind),
            found.loc,
        )
    }

    /// Whether the previously consumed token was a `}`. The `;` separator
    /// is optional after a statement that ends in a closing brace.
    fn after_close_brace(&self) -> bool {
        self.pos > 0 && self.tokens[self.pos - 1].kind == TokenKind::CloseBrace
    }
}
