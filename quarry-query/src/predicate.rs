//! Comparison operators, connectors, and the field predicate value object.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::value::Value;

/// A field-level comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// Equals.
    Eq,
    /// Not equals.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl CompareOp {
    /// SQL token for this operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// How the predicates of one filter, or two filters, combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connector {
    /// All parts must hold.
    #[default]
    And,
    /// Any part may hold.
    Or,
}

impl Connector {
    /// SQL keyword for this connector.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One field comparison inside a filter.
///
/// Predicates are value objects: two predicates are the same when they
/// name the same field (ASCII case-insensitive), carry the same
/// operator, and hold an equal value. Predicate sets deduplicate on
/// that identity, not on reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPredicate {
    field: SmolStr,
    op: CompareOp,
    value: Value,
}

impl FieldPredicate {
    /// Create a predicate from its parts.
    pub fn new(field: impl Into<SmolStr>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// The field name as written at construction.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The comparison operator.
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// The comparison operand.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl PartialEq for FieldPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.field.eq_ignore_ascii_case(&other.field)
            && self.op == other.op
            && self.value == other.value
    }
}

impl Eq for FieldPredicate {}

impl Hash for FieldPredicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // field hashes case-folded so it agrees with eq
        for b in self.field.as_bytes() {
            b.to_ascii_lowercase().hash(state);
        }
        self.op.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Display for FieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.field, self.op, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(pred: &FieldPredicate) -> u64 {
        let mut hasher = DefaultHasher::new();
        pred.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_compare_op_sql() {
        assert_eq!(CompareOp::Eq.as_sql(), "=");
        assert_eq!(CompareOp::Ne.as_sql(), "!=");
        assert_eq!(CompareOp::Gte.as_sql(), ">=");
    }

    #[test]
    fn test_connector_defaults_to_and() {
        assert_eq!(Connector::default(), Connector::And);
        assert_eq!(Connector::Or.as_sql(), "OR");
    }

    #[test]
    fn test_predicate_identity_ignores_field_case() {
        let a = FieldPredicate::new("Name", CompareOp::Eq, "alice");
        let b = FieldPredicate::new("name", CompareOp::Eq, "alice");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_predicate_identity_is_exact_on_op_and_value() {
        let base = FieldPredicate::new("age", CompareOp::Gt, 21);
        assert_ne!(base, FieldPredicate::new("age", CompareOp::Gte, 21));
        assert_ne!(base, FieldPredicate::new("age", CompareOp::Gt, 22));
    }

    #[test]
    fn test_predicate_null_values_compare_equal() {
        let a = FieldPredicate::new("deleted_at", CompareOp::Eq, Value::Null);
        let b = FieldPredicate::new("deleted_at", CompareOp::Eq, Value::Null);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}
