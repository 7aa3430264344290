use super::*;
use crate::ast::UnOp;
use valo_source::Loc;

/// Binding power above every binary operator: a unary operator's argument
/// is the term that follows it and nothing more.
const UNARY_BP: u8 = 15;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_expr_bp(0) // 0 to accept any expression
    }

    /// Parses an expression with the specified `min_bp`, guarding the
    /// recursion depth.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::new(
                ErrorKind::ResourceExhaustion,
                "expression nesting too deep",
                self.peek().loc,
            ));
        }
        self.depth += 1;
        let result = self.parse_expr_bp_inner(min_bp);
        self.depth -= 1;
        result
    }

    fn parse_expr_bp_inner(&mut self, min_bp: u8) -> Result<Expr> {
        let mut lhs = self.parse_primary_expr()?;

        loop {
            let (op, l_bp, r_bp) = match self.peek().kind.binop_bp() {
                Some(bp) => bp,
                None => break, // not a valid binop, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            // self.peek() is a valid binop
            let loc = self.next().loc;
            let rhs = self.parse_expr_bp(r_bp)?;

            lhs = Expr::new(
                ExprKind::Binary {
                    lhs: Box::new(lhs),
                    op,
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }

        Ok(lhs)
    }

    /// Parses a term. Unary `-` and `not` bind to the term that follows
    /// them only, never to a whole operator chain, and may be chained.
    fn parse_primary_expr(&mut self) -> Result<Expr> {
        let token = self.peek().clone();
        let loc = token.loc;
        match token.kind {
            TokenKind::Int(value) => {
                self.next();
                Ok(Expr::new(ExprKind::IntLit(value), loc))
            }
            TokenKind::Minus => {
                self.next();
                Ok(Expr::new(
                    ExprKind::Unary {
                        op: UnOp::Neg,
                        arg: Box::new(self.parse_expr_bp(UNARY_BP)?),
                    },
                    loc,
                ))
            }
            TokenKind::Ident(name) => match name.as_str() {
                "true" => {
                    self.next();
                    Ok(Expr::new(ExprKind::BoolLit(true), loc))
                }
                "false" => {
                    self.next();
                    Ok(Expr::new(ExprKind::BoolLit(false), loc))
                }
                "not" => {
                    self.next();
                    Ok(Expr::new(
                        ExprKind::Unary {
                            op: UnOp::Not,
                            arg: Box::new(self.parse_expr_bp(UNARY_BP)?),
                        },
                        loc,
                    ))
                }
                _ => self.parse_identifier_or_call_expr(),
            },
            TokenKind::OpenParen => {
                self.next();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::CloseParen)?;
                Ok(expr)
            }
            TokenKind::OpenBrace => self.parse_block_expr(),
            TokenKind::If => self.parse_if_expr(),
            TokenKind::While => self.parse_while_expr(),
            _ => Err(self.expected("a term")),
        }
    }

    /* Expressions.Identifier */
    /// Parses an identifier or a call expression. Calls are dispatched by
    /// name at evaluation time; an empty argument list is fine.
    fn parse_identifier_or_call_expr(&mut self) -> Result<Expr> {
        let (ident, loc) = self.expect_ident()?;

        if self.eat(&TokenKind::OpenParen) {
            // parse call expression
            let mut args = Vec::new();

            if !self.eat(&TokenKind::CloseParen) {
                loop {
                    args.push(self.parse_expr()?);

                    if self.eat(&TokenKind::CloseParen) {
                        break;
                    }
                    if !self.eat(&TokenKind::Comma) {
                        return Err(self.expected("\")\" or \",\""));
                    }
                }
            }

            Ok(Expr::new(ExprKind::Call { ident, args }, loc))
        } else {
            Ok(Expr::new(ExprKind::Identifier(ident), loc))
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Loc)> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Ident(ident) => {
                self.next();
                Ok((ident, token.loc))
            }
            _ => Err(self.expected("an identifier")),
        }
    }

    /* Expressions.Blocks */
    fn parse_block_expr(&mut self) -> Result<Expr> {
        let loc = self.expect(&TokenKind::OpenBrace)?.loc;
        let body = self.parse_block_body(&TokenKind::CloseBrace)?;
        self.expect(&TokenKind::CloseBrace)?;
        Ok(Expr::new(ExprKind::Block(body), loc))
    }

    /// Parses `;`-separated statements until `end` (exclusive). A trailing
    /// `;` or an empty body makes the block's value unit; this is encoded
    /// by appending an [`ExprKind::Empty`] statement.
    pub(crate) fn parse_block_body(&mut self, end: &TokenKind) -> Result<Vec<Expr>> {
        let mut body = Vec::new();
        if self.check(end) {
            return Ok(body);
        }

        loop {
            body.push(self.parse_statement()?);

            if self.eat(&TokenKind::Semi) {
                if self.check(end) {
                    body.push(Expr::new(ExprKind::Empty, self.peek().loc));
                    break;
                }
                continue;
            }
            if self.check(end) {
                break;
            }
            if !self.after_close_brace() {
                return Err(self.expected(&format!("\";\" or {}", end)));
            }
        }

        Ok(body)
    }

    /// Parses a statement: a `var` declaration or an expression. `var` is
    /// only legal directly inside a block body.
    fn parse_statement(&mut self) -> Result<Expr> {
        if self.check(&TokenKind::Var) {
            self.parse_var_declaration()
        } else {
            self.parse_expr()
        }
    }

    fn parse_var_declaration(&mut self) -> Result<Expr> {
        let loc = self.expect(&TokenKind::Var)?.loc;
        let (ident, _) = self.expect_ident()?;
        self.expect(&TokenKind::Equals)?;
        let initializer = self.parse_expr()?;
        Ok(Expr::new(
            ExprKind::VarDeclaration {
                ident,
                initializer: Box::new(initializer),
            },
            loc,
        ))
    }

    /* Expressions.Control flow */
    fn parse_if_expr(&mut self) -> Result<Expr> {
        let loc = self.expect(&TokenKind::If)?.loc;
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::Then)?;
        let then = self.parse_expr()?;
        let otherwise = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        Ok(Expr::new(
            ExprKind::If {
                condition: Box::new(condition),
                then: Box::new(then),
                otherwise,
            },
            loc,
        ))
    }

    fn parse_while_expr(&mut self) -> Result<Expr> {
        let loc = self.expect(&TokenKind::While)?.loc;
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::Do)?;
        let body = self.parse_expr()?;
        Ok(Expr::new(
            ExprKind::While {
                condition: Box::new(condition),
                body: Box::new(body),
            },
            loc,
        ))
    }
}
