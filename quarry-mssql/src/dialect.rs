//! SQL Server SQL generation: windowed pagination over `ROW_NUMBER()`.

use tracing::debug;

use quarry_query::error::{QueryError, QueryResult};
use quarry_query::sql::{ParamBinder, SqlDialect};
use quarry_query::value::Value;

/// SQL-Server-flavored SQL generation.
///
/// Pagination wraps the select in a `ROW_NUMBER()` window over the
/// mandatory ordering; there is no multi-row INSERT form.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Create the dialect.
    pub const fn new() -> Self {
        Self
    }
}

impl SqlDialect for MssqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn quote_prefix(&self) -> char {
        '['
    }

    fn quote_suffix(&self) -> char {
        ']'
    }

    fn param_sigil(&self) -> char {
        '@'
    }

    fn placeholder(&self, index: usize) -> String {
        format!("@P{index}")
    }

    fn supports_batch_insert(&self) -> bool {
        false
    }

    fn last_insert_id_expr(&self) -> &'static str {
        "SCOPE_IDENTITY()"
    }

    fn build_pagination_sql(
        &self,
        page_index: u64,
        page_size: u64,
        select: &str,
        order_by: &str,
        where_clause: Option<&str>,
    ) -> QueryResult<String> {
        if order_by.trim().is_empty() {
            return Err(QueryError::invalid_argument(
                "windowed pagination requires an ORDER BY clause",
            ));
        }

        let from_at = find_top_level_from(select).ok_or_else(|| {
            QueryError::invalid_argument("select clause has no top-level FROM")
        })?;
        let select_list = select[..from_at].trim_end();
        if select_list.is_empty() {
            return Err(QueryError::invalid_argument(
                "select clause has no select list before FROM",
            ));
        }
        let source = select[from_at..].trim_end();

        let lower = page_index * page_size + 1;
        let upper = (page_index + 1) * page_size;

        let mut inner = String::with_capacity(select.len() + order_by.len() + 48);
        inner.push_str(select_list);
        inner.push_str(", ROW_NUMBER() OVER (");
        inner.push_str(order_by.trim());
        inner.push_str(") AS [__row_number] ");
        inner.push_str(source);
        if let Some(where_clause) = where_clause.map(str::trim).filter(|w| !w.is_empty()) {
            inner.push(' ');
            inner.push_str(where_clause);
        }

        debug!(page_index, page_size, "built mssql pagination sql");
        Ok(format!(
            "SELECT * FROM ({inner}) AS [__paged] WHERE [__row_number] BETWEEN {lower} AND {upper}"
        ))
    }

    fn build_batch_insert_sql(
        &self,
        _table: &str,
        _columns: &[&str],
        _rows: &[Vec<Value>],
        _bind: &mut ParamBinder<'_>,
    ) -> QueryResult<Option<String>> {
        // no multi-row INSERT form; "not applicable" rather than an error
        Ok(None)
    }
}

/// Byte offset of the first top-level `FROM` keyword in `select`.
///
/// Skips string literals, quoted identifiers (brackets and double
/// quotes), and parenthesized subexpressions; the keyword must stand
/// alone as a word.
fn find_top_level_from(select: &str) -> Option<usize> {
    let bytes = select.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => i = skip_quoted(bytes, i, b'\''),
            b'"' => i = skip_quoted(bytes, i, b'"'),
            b'[' => i = skip_bracketed(bytes, i),
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b'F' | b'f' if depth == 0 => {
                if is_keyword_at(bytes, i, b"from") {
                    return Some(i);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Advance past a quoted region opened at `start`; a doubled quote is
/// an escape, not a terminator.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
            } else {
                return i + 1;
            }
        } else {
            i += 1;
        }
    }
    i
}

fn skip_bracketed(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b']' {
            if bytes.get(i + 1) == Some(&b']') {
                i += 2;
            } else {
                return i + 1;
            }
        } else {
            i += 1;
        }
    }
    i
}

fn is_keyword_at(bytes: &[u8], at: usize, keyword: &[u8]) -> bool {
    if at + keyword.len() > bytes.len() {
        return false;
    }
    if !bytes[at..at + keyword.len()].eq_ignore_ascii_case(keyword) {
        return false;
    }
    let before = at.checked_sub(1).map(|p| bytes[p]);
    let after = bytes.get(at + keyword.len()).copied();
    !before.is_some_and(is_word_byte) && !after.is_some_and(is_word_byte)
}

fn is_word_byte(b: u8) -> bool {
    // bytes past 0x7f are UTF-8 tails, treat them as identifier text
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}
