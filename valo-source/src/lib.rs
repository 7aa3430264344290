//! Source locations and the shared error type.

use std::fmt;

/// A position in the source text. Both `line` and `column` are 0-based.
///
/// Locations are attached to tokens and AST nodes for diagnostics only;
/// they never influence semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Loc {
    pub line: u32,
    pub column: u32,
}

impl Loc {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The category of a failure. See [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No lexical pattern matched, or the parser found an unexpected token.
    Syntax,
    /// An identifier could not be resolved through the scope chain.
    Name,
    /// An operand, condition or assignment had the wrong runtime kind.
    Type,
    /// Wrong argument count for a builtin, or an unknown call target.
    Arity,
    /// Division or modulo by zero, or integer overflow.
    Arithmetic,
    /// `read_int` was given a line that is not an integer.
    InputFormat,
    /// A stream read or write failed.
    Io,
    /// Nesting exceeded the recursion bound. Fatal, the run cannot continue.
    ResourceExhaustion,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Name => "name error",
            ErrorKind::Type => "type error",
            ErrorKind::Arity => "arity error",
            ErrorKind::Arithmetic => "arithmetic error",
            ErrorKind::InputFormat => "input format error",
            ErrorKind::Io => "io error",
            ErrorKind::ResourceExhaustion => "resource exhaustion",
        };
        f.write_str(name)
    }
}

/// An error raised by the tokenizer, the parser or the interpreter.
///
/// The first error aborts the run; there is no recovery inside the core.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    /// Location of the offending token or node, when one exists.
    pub loc: Option<Loc>,
}

impl Error {
    /// Create a new error with the specified `kind`, `message` and location.
    pub fn new(kind: ErrorKind, message: impl ToString, loc: Loc) -> Self {
        Self {
            kind,
            message: message.to_string(),
            loc: Some(loc),
        }
    }

    /// Create a new error that has no meaningful source location.
    pub fn without_loc(kind: ErrorKind, message: impl ToString) -> Self {
        Self {
            kind,
            message: message.to_string(),
            loc: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.loc {
            Some(loc) => write!(f, "{}: {}: {}", loc, self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
