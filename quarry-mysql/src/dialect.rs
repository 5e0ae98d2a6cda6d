//! MySQL SQL generation: offset pagination and multi-row INSERT.

use smol_str::format_smolstr;
use tracing::debug;

use quarry_query::error::{QueryError, QueryResult};
use quarry_query::sql::{BatchParam, ParamBinder, SqlDialect};
use quarry_query::value::Value;

/// MySQL-flavored SQL generation.
///
/// Pagination uses `LIMIT offset, count`; batch inserts emit one
/// multi-tuple `INSERT` with counter-named parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create the dialect.
    pub const fn new() -> Self {
        Self
    }
}

impl SqlDialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_prefix(&self) -> char {
        '`'
    }

    fn quote_suffix(&self) -> char {
        '`'
    }

    fn param_sigil(&self) -> char {
        ':'
    }

    fn placeholder(&self, _index: usize) -> String {
        // binding is positional, every slot renders the same
        "?".to_string()
    }

    fn supports_batch_insert(&self) -> bool {
        true
    }

    fn last_insert_id_expr(&self) -> &'static str {
        "LAST_INSERT_ID()"
    }

    fn build_pagination_sql(
        &self,
        page_index: u64,
        page_size: u64,
        select: &str,
        order_by: &str,
        where_clause: Option<&str>,
    ) -> QueryResult<String> {
        let mut sql = String::with_capacity(select.len() + order_by.len() + 32);

        if !select.is_empty() {
            sql.push(' ');
            sql.push_str(select);
        }
        if let Some(where_clause) = where_clause.filter(|w| !w.is_empty()) {
            sql.push(' ');
            sql.push_str(where_clause);
        }
        if !order_by.is_empty() {
            sql.push(' ');
            sql.push_str(order_by);
        }

        if page_index == 0 {
            sql.push_str(&format!(" LIMIT {page_size}"));
        } else {
            sql.push_str(&format!(" LIMIT {}, {page_size}", page_index * page_size));
        }

        debug!(page_index, page_size, "built mysql pagination sql");
        Ok(sql)
    }

    fn build_batch_insert_sql(
        &self,
        table: &str,
        columns: &[&str],
        rows: &[Vec<Value>],
        bind: &mut ParamBinder<'_>,
    ) -> QueryResult<Option<String>> {
        if columns.is_empty() {
            return Err(QueryError::invalid_argument(
                "batch insert requires at least one column",
            ));
        }
        if rows.is_empty() {
            return Err(QueryError::invalid_argument(
                "batch insert requires at least one row",
            ));
        }
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(QueryError::invalid_argument(format!(
                    "mismatched column/value counts: row {index} has {} values for {} columns",
                    row.len(),
                    columns.len()
                )));
            }
        }

        let mut sql =
            String::with_capacity(32 + columns.len() * 8 + rows.len() * (columns.len() * 6 + 4));
        sql.push_str("INSERT INTO ");
        sql.push_str(&self.quote_ident(table));
        sql.push_str(" (");
        for (index, column) in columns.iter().enumerate() {
            if index > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&self.quote_ident(column));
        }
        sql.push_str(") VALUES ");

        let mut counter = 0usize;
        for (row_index, row) in rows.iter().enumerate() {
            if row_index > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            for (column_index, value) in row.iter().enumerate() {
                if column_index > 0 {
                    sql.push_str(", ");
                }
                let param = BatchParam {
                    name: format_smolstr!("p{counter}"),
                    row: row_index,
                    column: column_index,
                };
                counter += 1;
                sql.push(self.param_sigil());
                sql.push_str(&param.name);
                bind(&param, value);
            }
            sql.push(')');
        }

        debug!(rows = rows.len(), params = counter, "built mysql batch insert");
        Ok(Some(sql))
    }
}
