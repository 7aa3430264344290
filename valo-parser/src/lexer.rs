use crate::ast::BinOp;
use logos::{Lexer, Logos, Skip};
use std::fmt;
use valo_source::{Error, ErrorKind, Loc, Result};

/// Skips a `/*` block comment. The first `*/` terminates the comment; an
/// unterminated comment silently consumes the rest of the input.
fn skip_block_comment<'s>(lex: &mut Lexer<'s, TokenKind>) -> Skip {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(rest.len()),
    }
    Skip
}

#[derive(Debug, Logos, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // literals
    #[regex(r"[0-9]+", |lex| lex.slice().parse())]
    Int(i64),

    // identifiers
    //
    // `and`, `or`, `not`, `true` and `false` are *not* keywords; they lex as
    // plain identifiers and the parser gives them meaning.
    #[regex(r"[a-z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // keywords
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("var")]
    Var,

    // operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Equals,
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanEquals,
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterThanEquals,

    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    // misc
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[regex(r"#[^\n]*", logos::skip)]
    #[token("/*", skip_block_comment)]
    #[error]
    Error,

    /// Only synthesized in the parse phase when reading past the last token.
    Eof,
}

impl TokenKind {
    /// Returns the binary operator and its binding powers, or `None` if the
    /// token is not a valid binop. Binding power `0` accepts any expression.
    /// Assignment has the lowest powers and is the only right-associative
    /// operator; `and` and `or` are identifiers matched by text.
    pub fn binop_bp(&self) -> Option<(BinOp, u8, u8)> {
        let bp = match self {
            /* Assignment */
            TokenKind::Equals => (BinOp::Assign, 2, 1),
            /* Logical */
            TokenKind::Ident(name) if name == "or" => (BinOp::Or, 3, 4),
            TokenKind::Ident(name) if name == "and" => (BinOp::And, 5, 6),
            /* Equality */
            TokenKind::EqualsEquals => (BinOp::Eq, 7, 8),
            TokenKind::NotEquals => (BinOp::Ne, 7, 8),
            /* Ordering */
            TokenKind::LessThan => (BinOp::Lt, 9, 10),
            TokenKind::LessThanEquals => (BinOp::Le, 9, 10),
            TokenKind::GreaterThan => (BinOp::Gt, 9, 10),
            TokenKind::GreaterThanEquals => (BinOp::Ge, 9, 10),
            /* Additive */
            TokenKind::Plus => (BinOp::Add, 11, 12),
            TokenKind::Minus => (BinOp::Sub, 11, 12),
            /* Multiplicative */
            TokenKind::Star => (BinOp::Mul, 13, 14),
            TokenKind::Slash => (BinOp::Div, 13, 14),
            TokenKind::Percent => (BinOp::Rem, 13, 14),
            _ => return None,
        };
        Some(bp)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(value) => write!(f, "\"{}\"", value),
            TokenKind::Ident(name) => write!(f, "\"{}\"", name),
            TokenKind::If => f.write_str("\"if\""),
            TokenKind::Then => f.write_str("\"then\""),
            TokenKind::Else => f.write_str("\"else\""),
            TokenKind::While => f.write_str("\"while\""),
            TokenKind::Do => f.write_str("\"do\""),
            TokenKind::Var => f.write_str("\"var\""),
            TokenKind::Plus => f.write_str("\"+\""),
            TokenKind::Minus => f.write_str("\"-\""),
            TokenKind::Star => f.write_str("\"*\""),
            TokenKind::Slash => f.write_str("\"/\""),
            TokenKind::Percent => f.write_str("\"%\""),
            TokenKind::Equals => f.write_str("\"=\""),
            TokenKind::EqualsEquals => f.write_str("\"==\""),
            TokenKind::NotEquals => f.write_str("\"!=\""),
            TokenKind::LessThan => f.write_str("\"<\""),
            TokenKind::LessThanEquals => f.write_str("\"<=\""),
            TokenKind::GreaterThan => f.write_str("\">\""),
            TokenKind::GreaterThanEquals => f.write_str("\">=\""),
            TokenKind::OpenParen => f.write_str("\"(\""),
            TokenKind::CloseParen => f.write_str("\")\""),
            TokenKind::OpenBrace => f.write_str("\"{\""),
            TokenKind::CloseBrace => f.write_str("\"}\""),
            TokenKind::Comma => f.write_str("\",\""),
            TokenKind::Semi => f.write_str("\";\""),
            TokenKind::Error => f.write_str("invalid input"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

/// A token with the location it was found at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: Loc,
}

impl Token {
    pub fn new(kind: TokenKind, loc: Loc) -> Self {
        Self { kind, loc }
    }
}

/// Turns `source` into an ordered token sequence.
///
/// Whitespace and comments are skipped without producing tokens. Fails with
/// a syntax error at the offending location when no lexical pattern matches.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let line_starts = line_starts(source);
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(kind) = lexer.next() {
        let loc = loc_at(&line_starts, lexer.span().start);
        if kind == TokenKind::Error {
            return Err(Error::new(
                ErrorKind::Syntax,
                format!("invalid syntax: \"{}\"", lexer.slice()),
                loc,
            ));
        }
        tokens.push(Token::new(kind, loc));
    }

    Ok(tokens)
}

/// Byte offsets at which each line starts.
fn line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (offset, byte) in source.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(offset + 1);
        }
    }
    starts
}

fn loc_at(line_starts: &[usize], offset: usize) -> Loc {
    let line = match line_starts.binary_search(&offset) {
        Ok(line) => line,
        Err(line) => line - 1,
    };
    Loc::new(line as u32, (offset - line_starts[line]) as u32)
}
