use std::fmt;
use std::mem;

/// A runtime value.
///
/// Unit is the value of declarations, assignments, loops and an `if` whose
/// condition is false with no `else` branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Unit,
}

impl Value {
    /// The name of the value's runtime kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Unit => "unit",
        }
    }

    /// Whether `self` and `other` have the same runtime kind. A binding may
    /// only be reassigned to a value of the same kind.
    pub fn same_kind(&self, other: &Value) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Unit => f.write_str("unit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert!(Value::Int(1).same_kind(&Value::Int(-4)));
        assert!(Value::Bool(true).same_kind(&Value::Bool(false)));
        assert!(!Value::Int(0).same_kind(&Value::Bool(false)));
        assert!(!Value::Unit.same_kind(&Value::Int(0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Unit.to_string(), "unit");
    }
}
