//! Filter trees: deduplicated predicate sets and AND/OR combinations.
//!
//! A [`QueryFilter`] is either a [`SingleFilter`] (a set of predicates
//! over one entity, combined by one connector) or a [`CombinedFilter`]
//! (two filters joined by a connector). Trees nest to arbitrary depth
//! through repeated combination and are immutable once built.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

use crate::predicate::{CompareOp, Connector, FieldPredicate};
use crate::sql::SqlDialect;
use crate::value::Value;

/// A deduplicated set of predicates combined by a single connector.
///
/// Insertion funnels through the predicate's structural identity:
/// adding a structurally identical predicate twice is a no-op, not an
/// error. Insertion order is kept so rendering is deterministic, but
/// order never affects identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleFilter {
    predicates: IndexSet<FieldPredicate>,
    connector: Connector,
}

impl SingleFilter {
    /// Create an empty filter combining with AND.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty filter with an explicit connector.
    pub fn with_connector(connector: Connector) -> Self {
        Self {
            predicates: IndexSet::new(),
            connector,
        }
    }

    /// The connector joining this filter's predicates.
    pub fn connector(&self) -> Connector {
        self.connector
    }

    /// Insert a predicate; returns `false` when an identical predicate
    /// was already present.
    pub fn insert(&mut self, predicate: FieldPredicate) -> bool {
        self.predicates.insert(predicate)
    }

    /// Insert a predicate built from its parts.
    pub fn push(
        &mut self,
        field: impl Into<SmolStr>,
        op: CompareOp,
        value: impl Into<Value>,
    ) -> bool {
        self.insert(FieldPredicate::new(field, op, value))
    }

    /// Insert every predicate from an iterator.
    pub fn extend(&mut self, predicates: impl IntoIterator<Item = FieldPredicate>) {
        for predicate in predicates {
            self.insert(predicate);
        }
    }

    /// Add an equals predicate.
    pub fn eq(mut self, field: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.push(field, CompareOp::Eq, value);
        self
    }

    /// Add a not-equals predicate.
    pub fn ne(mut self, field: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.push(field, CompareOp::Ne, value);
        self
    }

    /// Add a greater-than predicate.
    pub fn gt(mut self, field: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.push(field, CompareOp::Gt, value);
        self
    }

    /// Add a greater-or-equal predicate.
    pub fn gte(mut self, field: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.push(field, CompareOp::Gte, value);
        self
    }

    /// Add a less-than predicate.
    pub fn lt(mut self, field: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.push(field, CompareOp::Lt, value);
        self
    }

    /// Add a less-or-equal predicate.
    pub fn lte(mut self, field: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.push(field, CompareOp::Lte, value);
        self
    }

    /// Whether any predicate is present.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Number of distinct predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether a structurally identical predicate is present.
    pub fn contains(&self, predicate: &FieldPredicate) -> bool {
        self.predicates.contains(predicate)
    }

    /// Iterate predicates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldPredicate> {
        self.predicates.iter()
    }
}

impl FromIterator<FieldPredicate> for SingleFilter {
    fn from_iter<I: IntoIterator<Item = FieldPredicate>>(iter: I) -> Self {
        let mut filter = Self::new();
        filter.extend(iter);
        filter
    }
}

/// Two filters joined by a connector. Both children are mandatory and
/// owned, so a half-built combination cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedFilter {
    left: QueryFilter,
    right: QueryFilter,
    connector: Connector,
}

impl CombinedFilter {
    /// Join two filters.
    pub fn new(
        left: impl Into<QueryFilter>,
        right: impl Into<QueryFilter>,
        connector: Connector,
    ) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            connector,
        }
    }

    /// The left child.
    pub fn left(&self) -> &QueryFilter {
        &self.left
    }

    /// The right child.
    pub fn right(&self) -> &QueryFilter {
        &self.right
    }

    /// The connector joining the children.
    pub fn connector(&self) -> Connector {
        self.connector
    }
}

/// A compiled filter tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryFilter {
    /// One deduplicated predicate set.
    Single(SingleFilter),
    /// Two filters joined by a connector.
    Combined(Box<CombinedFilter>),
}

impl QueryFilter {
    /// Join two filters with AND.
    pub fn and(left: impl Into<QueryFilter>, right: impl Into<QueryFilter>) -> Self {
        Self::combine(left, right, Connector::And)
    }

    /// Join two filters with OR.
    pub fn or(left: impl Into<QueryFilter>, right: impl Into<QueryFilter>) -> Self {
        Self::combine(left, right, Connector::Or)
    }

    /// Join two filters with an explicit connector.
    pub fn combine(
        left: impl Into<QueryFilter>,
        right: impl Into<QueryFilter>,
        connector: Connector,
    ) -> Self {
        Self::Combined(Box::new(CombinedFilter::new(left, right, connector)))
    }

    /// Whether the tree holds no predicate at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(single) => single.is_empty(),
            Self::Combined(combined) => combined.left.is_empty() && combined.right.is_empty(),
        }
    }

    /// Total number of predicates across the tree.
    pub fn predicate_count(&self) -> usize {
        match self {
            Self::Single(single) => single.len(),
            Self::Combined(combined) => {
                combined.left.predicate_count() + combined.right.predicate_count()
            }
        }
    }

    /// Render this filter as a WHERE fragment for `dialect`.
    ///
    /// Returns the SQL text and the values to bind, in placeholder
    /// order. Values never appear in the text itself.
    pub fn to_sql(&self, dialect: &dyn SqlDialect) -> (String, Vec<Value>) {
        self.to_sql_offset(dialect, 0)
    }

    /// Render with placeholder numbering starting after `param_offset`
    /// already-bound parameters, for embedding in a larger statement.
    pub fn to_sql_offset(
        &self,
        dialect: &dyn SqlDialect,
        param_offset: usize,
    ) -> (String, Vec<Value>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        self.render(dialect, &mut sql, &mut params, param_offset);
        debug!(
            dialect = dialect.name(),
            sql = %sql,
            params = params.len(),
            "rendered filter"
        );
        (sql, params)
    }

    fn render(
        &self,
        dialect: &dyn SqlDialect,
        sql: &mut String,
        params: &mut Vec<Value>,
        offset: usize,
    ) {
        match self {
            Self::Single(single) => {
                if single.is_empty() {
                    sql.push_str("1=1");
                    return;
                }
                for (i, predicate) in single.iter().enumerate() {
                    if i > 0 {
                        sql.push(' ');
                        sql.push_str(single.connector().as_sql());
                        sql.push(' ');
                    }
                    render_predicate(predicate, dialect, sql, params, offset);
                }
            }
            Self::Combined(combined) => {
                sql.push('(');
                combined.left.render(dialect, sql, params, offset);
                sql.push(' ');
                sql.push_str(combined.connector().as_sql());
                sql.push(' ');
                combined.right.render(dialect, sql, params, offset);
                sql.push(')');
            }
        }
    }
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self::Single(SingleFilter::new())
    }
}

impl From<SingleFilter> for QueryFilter {
    fn from(filter: SingleFilter) -> Self {
        Self::Single(filter)
    }
}

impl From<CombinedFilter> for QueryFilter {
    fn from(filter: CombinedFilter) -> Self {
        Self::Combined(Box::new(filter))
    }
}

fn render_predicate(
    predicate: &FieldPredicate,
    dialect: &dyn SqlDialect,
    sql: &mut String,
    params: &mut Vec<Value>,
    offset: usize,
) {
    sql.push_str(&dialect.quote_ident(predicate.field()));
    match (predicate.op(), predicate.value()) {
        (CompareOp::Eq, Value::Null) => sql.push_str(" IS NULL"),
        (CompareOp::Ne, Value::Null) => sql.push_str(" IS NOT NULL"),
        (op, value) => {
            params.push(value.clone());
            sql.push(' ');
            sql.push_str(op.as_sql());
            sql.push(' ');
            sql.push_str(&dialect.placeholder(offset + params.len()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::testing::TestDialect;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_duplicate_insertion_is_a_noop() {
        let mut filter = SingleFilter::new();
        assert!(filter.push("age", CompareOp::Gt, 21));
        assert!(!filter.push("age", CompareOp::Gt, 21));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_field_case_collapses_duplicates() {
        let filter = SingleFilter::new().eq("Name", "alice").eq("name", "alice");
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_distinct_values_do_not_collapse() {
        let filter = SingleFilter::new().eq("name", "alice").eq("name", "bob");
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_single_renders_with_own_connector() {
        let filter: QueryFilter = SingleFilter::with_connector(Connector::Or)
            .eq("status", "active")
            .eq("status", "pending")
            .into();
        let (sql, params) = filter.to_sql(&TestDialect);
        assert_eq!(sql, "\"status\" = $1 OR \"status\" = $2");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_combined_renders_parenthesized() {
        let left = SingleFilter::new().eq("a", 1);
        let right = SingleFilter::new().eq("b", 2);
        let filter = QueryFilter::and(left, right);
        let (sql, params) = filter.to_sql(&TestDialect);
        assert_eq!(sql, "(\"a\" = $1 AND \"b\" = $2)");
        assert_eq!(params, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_nested_combination_keeps_grouping() {
        let a = SingleFilter::new().eq("a", 1);
        let b = SingleFilter::new().eq("b", 2);
        let c = SingleFilter::new().eq("c", 3);
        let filter = QueryFilter::or(QueryFilter::and(a, b), c);
        let (sql, params) = filter.to_sql(&TestDialect);
        assert_eq!(sql, "((\"a\" = $1 AND \"b\" = $2) OR \"c\" = $3)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_null_predicates_render_is_null() {
        let filter: QueryFilter = SingleFilter::new()
            .eq("deleted_at", Value::Null)
            .ne("archived_at", Value::Null)
            .into();
        let (sql, params) = filter.to_sql(&TestDialect);
        assert_eq!(sql, "\"deleted_at\" IS NULL AND \"archived_at\" IS NOT NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn test_param_offset_shifts_placeholders() {
        let filter: QueryFilter = SingleFilter::new().eq("a", 1).into();
        let (sql, _) = filter.to_sql_offset(&TestDialect, 2);
        assert_eq!(sql, "\"a\" = $3");
    }

    #[test]
    fn test_empty_filter_renders_neutral() {
        let filter = QueryFilter::default();
        assert!(filter.is_empty());
        let (sql, params) = filter.to_sql(&TestDialect);
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn test_is_empty_recurses() {
        let filter = QueryFilter::and(SingleFilter::new(), SingleFilter::new());
        assert!(filter.is_empty());
        let filter = QueryFilter::and(SingleFilter::new(), SingleFilter::new().eq("a", 1));
        assert!(!filter.is_empty());
        assert_eq!(filter.predicate_count(), 1);
    }

    #[test]
    fn test_serde_round_trip_preserves_identity() {
        let filter = QueryFilter::and(
            SingleFilter::new().eq("name", "alice").gt("age", 21),
            SingleFilter::with_connector(Connector::Or).eq("role", "admin"),
        );
        let json = serde_json::to_string(&filter).unwrap();
        let back: QueryFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(filter, back);
    }
}
