//! Conversions from filter values to SQL Server parameters.

use tiberius::ToSql;

use quarry_query::value::Value;

/// Convert a filter value to a boxed SQL Server parameter.
pub fn value_to_sql(value: &Value) -> Box<dyn ToSql> {
    match value {
        Value::Null => Box::new(Option::<String>::None),
        Value::Bool(b) => Box::new(*b),
        Value::Int(i) => Box::new(*i),
        Value::Float(f) => Box::new(*f),
        // UNIQUEIDENTIFIER, no text round trip needed
        Value::Uuid(u) => Box::new(*u),
        Value::DateTime(dt) => Box::new(*dt),
        // SQL Server has no interval type; durations travel as BIGINT
        // microseconds
        Value::Duration(d) => Box::new(d.as_micros() as i64),
        Value::Text(s) => Box::new(s.clone()),
    }
}

/// Convert a slice of filter values to boxed SQL Server parameters.
pub fn values_to_sql(values: &[Value]) -> Vec<Box<dyn ToSql>> {
    values.iter().map(value_to_sql).collect()
}
