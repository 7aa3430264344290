use std::fmt;
use valo_source::Loc;

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// Floor division (rounds toward negative infinity).
    Div,
    /// Remainder with floor semantics, matching [`BinOp::Div`].
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    Assign,
}

impl BinOp {
    /// The operator as written in the source.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Assign => "=",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

impl UnOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "not",
        }
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An expression together with the location it starts at.
///
/// The tree is built once by the parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLit(i64),
    BoolLit(bool),
    /// An identifier (e.g. `foo`).
    Identifier(String),
    /// A binary expression (e.g. `1+1`). Assignment is a binary expression
    /// whose left side must be an identifier; the interpreter enforces this.
    Binary {
        lhs: Box<Expr>,
        op: BinOp,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnOp,
        arg: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Option<Box<Expr>>,
    },
    While {
        condition: Box<Expr>,
        body: Box<Expr>,
    },
    /// A call of a builtin function (e.g. `print_int(1)`).
    Call {
        ident: String,
        args: Vec<Expr>,
    },
    /// A `{ ... }` block. When the source block is empty or ends with `;`,
    /// the parser appends an [`ExprKind::Empty`] statement so that the last
    /// statement always carries the block's value.
    Block(Vec<Expr>),
    VarDeclaration {
        ident: String,
        initializer: Box<Expr>,
    },
    /// The absence-of-value expression; evaluates to the unit value.
    Empty,
}

impl Expr {
    pub fn new(kind: ExprKind, loc: Loc) -> Self {
        Self { kind, loc }
    }

    /// Returns a copy of the tree with every location zeroed out.
    ///
    /// Locations carry no semantics, so comparisons that only care about
    /// tree shape (tests, mostly) should compare stripped trees instead of
    /// making distinct locations compare equal.
    pub fn strip_loc(&self) -> Expr {
        let kind = match &self.kind {
            ExprKind::IntLit(value) => ExprKind::IntLit(*value),
            ExprKind::BoolLit(value) => ExprKind::BoolLit(*value),
            ExprKind::Identifier(name) => ExprKind::Identifier(name.clone()),
            ExprKind::Binary { lhs, op, rhs } => ExprKind::Binary {
                lhs: Box::new(lhs.strip_loc()),
                op: *op,
                rhs: Box::new(rhs.strip_loc()),
            },
            ExprKind::Unary { op, arg } => ExprKind::Unary {
                op: *op,
                arg: Box::new(arg.strip_loc()),
            },
            ExprKind::If {
                condition,
                then,
                otherwise,
            } => ExprKind::If {
                condition: Box::new(condition.strip_loc()),
                then: Box::new(then.strip_loc()),
                otherwise: otherwise.as_ref().map(|e| Box::new(e.strip_loc())),
            },
            ExprKind::While { condition, body } => ExprKind::While {
                condition: Box::new(condition.strip_loc()),
                body: Box::new(body.strip_loc()),
            },
            ExprKind::Call { ident, args } => ExprKind::Call {
                ident: ident.clone(),
                args: args.iter().map(Expr::strip_loc).collect(),
            },
            ExprKind::Block(body) => ExprKind::Block(body.iter().map(Expr::strip_loc).collect()),
            ExprKind::VarDeclaration { ident, initializer } => ExprKind::VarDeclaration {
                ident: ident.clone(),
                initializer: Box::new(initializer.strip_loc()),
            },
            ExprKind::Empty => ExprKind::Empty,
        };
        Expr::new(kind, Loc::default())
    }
}
