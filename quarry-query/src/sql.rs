//! The dialect contract shared by every SQL backend.
//!
//! A dialect owns everything that differs between engines: identifier
//! quoting, parameter placeholders, paginated SELECT assembly, and the
//! multi-row INSERT form. Filter rendering in [`crate::filter`] is
//! generic over this trait, so one compiled filter serves any backend.

use smol_str::SmolStr;

use crate::error::QueryResult;
use crate::value::Value;

/// One named parameter emitted by a batch insert.
///
/// Names come from a monotonic counter rather than column text, so a
/// column literally named `a0` can never collide with a generated
/// name. The row/column pair is the authoritative mapping back to the
/// value slot; callers should bind by it, not by parsing the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchParam {
    /// Generated parameter name, without the dialect sigil.
    pub name: SmolStr,
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based column index.
    pub column: usize,
}

/// Binder callback for batch inserts, fired once per parameter in
/// emission order: columns left to right within a row, rows in
/// sequence.
pub type ParamBinder<'a> = dyn FnMut(&BatchParam, &Value) + 'a;

/// Behavior one SQL engine dialect must provide.
///
/// Implementations live in the per-engine crates; this crate only
/// consumes the trait. All methods are synchronous and pure.
pub trait SqlDialect {
    /// Dialect name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Opening identifier quote.
    fn quote_prefix(&self) -> char;

    /// Closing identifier quote.
    fn quote_suffix(&self) -> char;

    /// Sigil prefixed to named parameters in SQL text.
    fn param_sigil(&self) -> char;

    /// Positional placeholder for the 1-based parameter `index`.
    fn placeholder(&self, index: usize) -> String;

    /// Quote an identifier, doubling any embedded closing quote.
    ///
    /// Every identifier a dialect emits goes through here; names are
    /// never interpolated raw, even when they look harmless.
    fn quote_ident(&self, ident: &str) -> String {
        let suffix = self.quote_suffix();
        let mut quoted = String::with_capacity(ident.len() + 2);
        quoted.push(self.quote_prefix());
        for ch in ident.chars() {
            quoted.push(ch);
            if ch == suffix {
                quoted.push(suffix);
            }
        }
        quoted.push(suffix);
        quoted
    }

    /// Whether multi-row INSERT generation is available.
    fn supports_batch_insert(&self) -> bool;

    /// Expression yielding the identifier generated by the last INSERT
    /// on the current connection.
    fn last_insert_id_expr(&self) -> &'static str;

    /// Build a paginated SELECT around `select`.
    ///
    /// `page_index` is zero-based. `order_by` and `where_clause` are
    /// complete clauses (`ORDER BY ...`, `WHERE ...`) or empty; whether
    /// an ordering is mandatory is up to the dialect.
    fn build_pagination_sql(
        &self,
        page_index: u64,
        page_size: u64,
        select: &str,
        order_by: &str,
        where_clause: Option<&str>,
    ) -> QueryResult<String>;

    /// Build one multi-row INSERT for `table`, feeding every generated
    /// parameter to `bind`.
    ///
    /// Returns `Ok(None)` when the dialect has no batch form: that is
    /// "not applicable", not a failure, and the binder is never called.
    fn build_batch_insert_sql(
        &self,
        table: &str,
        columns: &[&str],
        rows: &[Vec<Value>],
        bind: &mut ParamBinder<'_>,
    ) -> QueryResult<Option<String>>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! A minimal ANSI-flavored dialect for exercising rendering paths
    //! without pulling in a backend crate.

    use super::*;

    pub(crate) struct TestDialect;

    impl SqlDialect for TestDialect {
        fn name(&self) -> &'static str {
            "test"
        }

        fn quote_prefix(&self) -> char {
            '"'
        }

        fn quote_suffix(&self) -> char {
            '"'
        }

        fn param_sigil(&self) -> char {
            '$'
        }

        fn placeholder(&self, index: usize) -> String {
            format!("${index}")
        }

        fn supports_batch_insert(&self) -> bool {
            false
        }

        fn last_insert_id_expr(&self) -> &'static str {
            "NULL"
        }

        fn build_pagination_sql(
            &self,
            page_index: u64,
            page_size: u64,
            select: &str,
            order_by: &str,
            where_clause: Option<&str>,
        ) -> QueryResult<String> {
            let mut sql = String::from(select);
            if let Some(where_clause) = where_clause.filter(|w| !w.is_empty()) {
                sql.push(' ');
                sql.push_str(where_clause);
            }
            if !order_by.is_empty() {
                sql.push(' ');
                sql.push_str(order_by);
            }
            sql.push_str(&format!(
                " LIMIT {page_size} OFFSET {}",
                page_index * page_size
            ));
            Ok(sql)
        }

        fn build_batch_insert_sql(
            &self,
            _table: &str,
            _columns: &[&str],
            _rows: &[Vec<Value>],
            _bind: &mut ParamBinder<'_>,
        ) -> QueryResult<Option<String>> {
            Ok(None)
        }
    }
}
