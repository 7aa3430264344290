use crate::builtins;
use crate::scope::ScopeChain;
use crate::value::Value;
use std::io::{BufRead, Write};
use valo_parser::ast::{BinOp, Expr, ExprKind, UnOp};
use valo_source::{Error, ErrorKind, Loc, Result};

/// Evaluation nesting bound. Nested blocks, ifs, parentheses and operators
/// consume one frame per level; exceeding the bound is fatal. `while` loops
/// iterate without recursing and do not count toward it.
const MAX_DEPTH: u32 = 512;

/// A tree-walking evaluator.
///
/// Each run evaluates an AST against a fresh scope chain. All I/O performed
/// by the builtin functions goes through the two streams handed in here.
pub struct Interpreter<'a> {
    scopes: ScopeChain,
    /// Current evaluation depth, bounded by [`MAX_DEPTH`].
    depth: u32,
    input: &'a mut dyn BufRead,
    output: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(input: &'a mut dyn BufRead, output: &'a mut dyn Write) -> Self {
        Self {
            scopes: ScopeChain::new(),
            depth: 0,
            input,
            output,
        }
    }

    /// Evaluates `ast` against a new root scope, producing the program's
    /// final value. The first error aborts the run.
    pub fn interpret(&mut self, ast: &Expr) -> Result<Value> {
        self.scopes = ScopeChain::new();
        self.depth = 0;
        self.eval(ast)
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::new(
                ErrorKind::ResourceExhaustion,
                "evaluation nesting too deep",
                expr.loc,
            ));
        }
        self.depth += 1;
        let result = self.eval_inner(expr);
        self.depth -= 1;
        result
    }

    fn eval_inner(&mut self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::IntLit(value) => Ok(Value::Int(*value)),
            ExprKind::BoolLit(value) => Ok(Value::Bool(*value)),
            ExprKind::Empty => Ok(Value::Unit),
            ExprKind::Identifier(name) => match self.scopes.get(name) {
                Some(value) => Ok(value),
                None => Err(self.unknown_identifier(name, expr.loc)),
            },
            ExprKind::Block(body) => {
                self.scopes.push();
                let result = self.eval_block_body(body);
                self.scopes.pop();
                result
            }
            ExprKind::VarDeclaration { ident, initializer } => {
                let value = self.eval(initializer)?;
                self.scopes.declare(ident, value);
                Ok(Value::Unit)
            }
            ExprKind::Unary { op, arg } => self.eval_unary(*op, arg),
            ExprKind::Binary { lhs, op, rhs } => self.eval_binary(expr.loc, lhs, *op, rhs),
            ExprKind::If {
                condition,
                then,
                otherwise,
            } => match self.eval_condition(condition)? {
                true => self.eval(then),
                false => match otherwise {
                    Some(otherwise) => self.eval(otherwise),
                    None => Ok(Value::Unit),
                },
            },
            ExprKind::While { condition, body } => {
                // the condition is re-checked before every iteration; the
                // body runs for its side effects only
                while self.eval_condition(condition)? {
                    self.eval(body)?;
                }
                Ok(Value::Unit)
            }
            ExprKind::Call { ident, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                builtins::call(ident, &values, expr.loc, self.input, self.output)
            }
        }
    }

    /// A block's value is its last statement's value; the parser appends an
    /// `Empty` statement when the source block ends in `;`.
    fn eval_block_body(&mut self, body: &[Expr]) -> Result<Value> {
        let mut last = Value::Unit;
        for statement in body {
            last = self.eval(statement)?;
        }
        Ok(last)
    }

    fn eval_condition(&mut self, condition: &Expr) -> Result<bool> {
        match self.eval(condition)? {
            Value::Bool(value) => Ok(value),
            other => Err(Error::new(
                ErrorKind::Type,
                format!("condition must be a bool, got {}", other.kind_name()),
                condition.loc,
            )),
        }
    }

    fn eval_unary(&mut self, op: UnOp, arg: &Expr) -> Result<Value> {
        let value = self.eval(arg)?;
        match (op, value) {
            (UnOp::Neg, Value::Int(value)) => {
                let negated = value.checked_neg().ok_or_else(|| {
                    Error::new(ErrorKind::Arithmetic, "integer overflow in unary \"-\"", arg.loc)
                })?;
                Ok(Value::Int(negated))
            }
            (UnOp::Not, Value::Bool(value)) => Ok(Value::Bool(!value)),
            (UnOp::Neg, other) => Err(self.operand_type_error("int", op.symbol(), other, arg.loc)),
            (UnOp::Not, other) => Err(self.operand_type_error("bool", op.symbol(), other, arg.loc)),
        }
    }

    fn eval_binary(&mut self, loc: Loc, lhs: &Expr, op: BinOp, rhs: &Expr) -> Result<Value> {
        match op {
            BinOp::Assign => self.eval_assign(lhs, rhs),
            BinOp::And | BinOp::Or => {
                // both operands are always evaluated; `and` and `or` do not
                // short-circuit
                let left = self.eval_bool_operand(lhs, op)?;
                let right = self.eval_bool_operand(rhs, op)?;
                let result = match op {
                    BinOp::And => left && right,
                    _ => left || right,
                };
                Ok(Value::Bool(result))
            }
            _ => {
                let left = self.eval_int_operand(lhs, op)?;
                let right = self.eval_int_operand(rhs, op)?;
                self.eval_int_binary(loc, left, op, right)
            }
        }
    }

    fn eval_int_binary(&self, loc: Loc, left: i64, op: BinOp, right: i64) -> Result<Value> {
        let overflow =
            |symbol: &str| Error::new(ErrorKind::Arithmetic, format!("integer overflow in \"{}\"", symbol), loc);
        match op {
            BinOp::Add => left
                .checked_add(right)
                .map(Value::Int)
                .ok_or_else(|| overflow("+")),
            BinOp::Sub => left
                .checked_sub(right)
                .map(Value::Int)
                .ok_or_else(|| overflow("-")),
            BinOp::Mul => left
                .checked_mul(right)
                .map(Value::Int)
                .ok_or_else(|| overflow("*")),
            BinOp::Div => self.floor_div(left, right, loc).map(Value::Int),
            BinOp::Rem => self.floor_rem(left, right, loc).map(Value::Int),
            BinOp::Lt => Ok(Value::Bool(left < right)),
            BinOp::Le => Ok(Value::Bool(left <= right)),
            BinOp::Gt => Ok(Value::Bool(left > right)),
            BinOp::Ge => Ok(Value::Bool(left >= right)),
            BinOp::Eq => Ok(Value::Bool(left == right)),
            BinOp::Ne => Ok(Value::Bool(left != right)),
            // handled in eval_binary
            BinOp::And | BinOp::Or | BinOp::Assign => unreachable!(),
        }
    }

    /// Division rounding toward negative infinity. A deliberate language
    /// choice, not the default truncating division.
    fn floor_div(&self, left: i64, right: i64, loc: Loc) -> Result<i64> {
        if right == 0 {
            return Err(Error::new(ErrorKind::Arithmetic, "division by zero", loc));
        }
        let quotient = left.checked_div(right).ok_or_else(|| {
            Error::new(ErrorKind::Arithmetic, "integer overflow in \"/\"", loc)
        })?;
        if left % right != 0 && (left < 0) != (right < 0) {
            Ok(quotient - 1)
        } else {
            Ok(quotient)
        }
    }

    /// Remainder with floor semantics, matching [`Self::floor_div`]: the
    /// result has the divisor's sign.
    fn floor_rem(&self, left: i64, right: i64, loc: Loc) -> Result<i64> {
        if right == 0 {
            return Err(Error::new(ErrorKind::Arithmetic, "modulo by zero", loc));
        }
        let remainder = match left.checked_rem(right) {
            Some(remainder) => remainder,
            // i64::MIN % -1 overflows checked_rem but is 0 mathematically
            None => return Ok(0),
        };
        if remainder != 0 && (remainder < 0) != (right < 0) {
            Ok(remainder + right)
        } else {
            Ok(remainder)
        }
    }

    /// `=` rebinds the nearest existing binding of its identifier target.
    /// The binding keeps its kind: rebinding an int to a bool (or the other
    /// way around) is rejected.
    fn eval_assign(&mut self, lhs: &Expr, rhs: &Expr) -> Result<Value> {
        let name = match &lhs.kind {
            ExprKind::Identifier(name) => name.clone(),
            _ => {
                return Err(Error::new(
                    ErrorKind::Type,
                    "assignment target is not an identifier",
                    lhs.loc,
                ))
            }
        };
        let value = self.eval(rhs)?;
        match self.scopes.get(&name) {
            None => Err(self.unknown_identifier(&name, lhs.loc)),
            Some(existing) if !existing.same_kind(&value) => Err(Error::new(
                ErrorKind::Type,
                format!(
                    "cannot change \"{}\" from {} to {}",
                    name,
                    existing.kind_name(),
                    value.kind_name()
                ),
                lhs.loc,
            )),
            Some(_) => {
                self.scopes.set(&name, value);
                Ok(Value::Unit)
            }
        }
    }

    fn eval_int_operand(&mut self, expr: &Expr, op: BinOp) -> Result<i64> {
        match self.eval(expr)? {
            Value::Int(value) => Ok(value),
            other => Err(self.operand_type_error("int", op.symbol(), other, expr.loc)),
        }
    }

    fn eval_bool_operand(&mut self, expr: &Expr, op: BinOp) -> Result<bool> {
        match self.eval(expr)? {
            Value::Bool(value) => Ok(value),
            other => Err(self.operand_type_error("bool", op.symbol(), other, expr.loc)),
        }
    }

    fn operand_type_error(&self, expected: &str, symbol: &str, found: Value, loc: Loc) -> Error {
        Error::new(
            ErrorKind::Type,
            format!(
                "expected {} for \"{}\", got {}",
                expected,
                symbol,
                found.kind_name()
            ),
            loc,
        )
    }

    fn unknown_identifier(&self, name: &str, loc: Loc) -> Error {
        Error::new(
            ErrorKind::Name,
            format!("unknown identifier \"{}\"", name),
            loc,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use valo_parser::lexer::tokenize;
    use valo_parser::parser::Parser;

    fn run(source: &str) -> Result<Value> {
        let tokens = tokenize(source).unwrap();
        let ast = Parser::new(&tokens).parse_program().unwrap();
        let mut input = Cursor::new(String::new());
        let mut output = Vec::new();
        Interpreter::new(&mut input, &mut output).interpret(&ast)
    }

    fn value(source: &str) -> Value {
        run(source).unwrap()
    }

    fn error_kind(source: &str) -> ErrorKind {
        run(source).unwrap_err().kind
    }

    #[test]
    fn test_literals_and_arithmetic() {
        assert_eq!(value("1+2+3*2"), Value::Int(9));
        assert_eq!(value("2 * -3"), Value::Int(-6));
        assert_eq!(value("true"), Value::Bool(true));
        assert_eq!(value(""), Value::Unit);
    }

    #[test]
    fn test_floor_division() {
        assert_eq!(value("7 / 2"), Value::Int(3));
        assert_eq!(value("-7 / 2"), Value::Int(-4));
        assert_eq!(value("7 / -2"), Value::Int(-4));
        assert_eq!(value("-7 / -2"), Value::Int(3));
        assert_eq!(value("-6 / 2"), Value::Int(-3));
    }

    #[test]
    fn test_floor_remainder() {
        assert_eq!(value("7 % 3"), Value::Int(1));
        assert_eq!(value("-7 % 3"), Value::Int(2));
        assert_eq!(value("7 % -3"), Value::Int(-2));
        assert_eq!(value("-7 % -3"), Value::Int(-1));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(error_kind("1 / 0"), ErrorKind::Arithmetic);
        assert_eq!(error_kind("1 % 0"), ErrorKind::Arithmetic);
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert_eq!(
            error_kind("9223372036854775807 + 1"),
            ErrorKind::Arithmetic
        );
        assert_eq!(
            error_kind("(0 - 9223372036854775807 - 1) / -1"),
            ErrorKind::Arithmetic
        );
    }

    #[test]
    fn test_comparison_and_logic() {
        assert_eq!(value("1 < 2"), Value::Bool(true));
        assert_eq!(value("2 <= 1"), Value::Bool(false));
        assert_eq!(value("1 == 1 and 2 != 1"), Value::Bool(true));
        assert_eq!(value("1 > 2 or 2 >= 2"), Value::Bool(true));
        assert_eq!(value("not (1 == 2)"), Value::Bool(true));
    }

    #[test]
    fn test_operand_type_errors() {
        assert_eq!(error_kind("1 + true"), ErrorKind::Type);
        assert_eq!(error_kind("true < false"), ErrorKind::Type);
        assert_eq!(error_kind("1 and true"), ErrorKind::Type);
        assert_eq!(error_kind("-true"), ErrorKind::Type);
        assert_eq!(error_kind("not 1"), ErrorKind::Type);
        assert_eq!(error_kind("if 1 then 2"), ErrorKind::Type);
    }

    #[test]
    fn test_logical_operators_do_not_short_circuit() {
        assert_eq!(
            value("var x = 0; false and {x = x + 1; true}; x"),
            Value::Int(1)
        );
        assert_eq!(
            value("var x = 0; true or {x = x + 1; true}; x"),
            Value::Int(1)
        );
        // a type error on the right side surfaces even when the left side
        // already decides the result
        assert_eq!(error_kind("false and 1"), ErrorKind::Type);
    }

    #[test]
    fn test_declarations_and_scope() {
        assert_eq!(value("var a = 6; {var a = 7}; a"), Value::Int(6));
        assert_eq!(value("var a = 1; {a = 2}; a"), Value::Int(2));
        assert_eq!(value("var a = 1; var a = true; a"), Value::Bool(true));
        assert_eq!(value("var a = 1"), Value::Unit);
        // block bindings do not escape their block
        assert_eq!(error_kind("{var a = 1}; a"), ErrorKind::Name);
    }

    #[test]
    fn test_assignment() {
        assert_eq!(value("var a = 1; a = 41 + 1; a"), Value::Int(42));
        assert_eq!(value("var a = 1; a = 2"), Value::Unit);
        assert_eq!(error_kind("var a = 1; a = true"), ErrorKind::Type);
        assert_eq!(error_kind("a = 1"), ErrorKind::Name);
        assert_eq!(error_kind("1 = 2"), ErrorKind::Type);
    }

    #[test]
    fn test_unknown_identifier_location() {
        let error = run("var a = 1;\na + x").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Name);
        assert_eq!(error.loc, Some(Loc::new(1, 4)));
    }

    #[test]
    fn test_if_values() {
        assert_eq!(value("if true then 1 else 2"), Value::Int(1));
        assert_eq!(value("if false then 1 else 2"), Value::Int(2));
        assert_eq!(value("if false then 1"), Value::Unit);
    }

    #[test]
    fn test_while_value_is_unit() {
        assert_eq!(
            value("var i = 0; while i < 3 do i = i + 1"),
            Value::Unit
        );
    }

    #[test]
    fn test_while_condition_is_reevaluated_every_iteration() {
        // checked iterations + 1 times, the last check being false
        assert_eq!(
            value("var n = 0; var i = 0; while {n = n + 1; i < 3} do i = i + 1; n"),
            Value::Int(4)
        );
    }

    #[test]
    fn test_block_value_rules() {
        assert_eq!(value("{1}"), Value::Int(1));
        assert_eq!(value("{1;}"), Value::Unit);
        assert_eq!(value("{}"), Value::Unit);
        assert_eq!(value("1 + {2} * 3"), Value::Int(7));
    }

    #[test]
    fn test_evaluation_depth_is_bounded() {
        // built by hand so the parser's own depth guard does not trip first
        let mut expr = Expr::new(ExprKind::IntLit(1), Loc::default());
        for _ in 0..600 {
            expr = Expr::new(
                ExprKind::Binary {
                    lhs: Box::new(expr),
                    op: BinOp::Add,
                    rhs: Box::new(Expr::new(ExprKind::IntLit(1), Loc::default())),
                },
                Loc::default(),
            );
        }
        let mut input = Cursor::new(String::new());
        let mut output = Vec::new();
        let error = Interpreter::new(&mut input, &mut output)
            .interpret(&expr)
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::ResourceExhaustion);
    }
}
