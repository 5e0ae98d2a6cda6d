//! Conversions from filter values to MySQL driver values.

use chrono::{Datelike, Timelike};
use mysql_async::{Params, Value as MysqlValue};
use smol_str::SmolStr;

use quarry_query::value::Value;

/// Convert a filter value to a MySQL driver value.
pub fn value_to_mysql(value: &Value) -> MysqlValue {
    match value {
        Value::Null => MysqlValue::NULL,
        Value::Bool(b) => MysqlValue::from(*b),
        Value::Int(i) => MysqlValue::from(*i),
        Value::Float(f) => MysqlValue::from(*f),
        // UUIDs travel as their canonical hyphenated text form
        Value::Uuid(u) => MysqlValue::from(u.to_string()),
        // MySQL DATETIME has no calendar before year 1; range is the
        // caller's responsibility
        Value::DateTime(dt) => MysqlValue::Date(
            dt.year() as u16,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.timestamp_subsec_micros().min(999_999),
        ),
        Value::Duration(d) => {
            let secs = d.as_secs();
            MysqlValue::Time(
                false,
                (secs / 86_400) as u32,
                ((secs % 86_400) / 3_600) as u8,
                ((secs % 3_600) / 60) as u8,
                (secs % 60) as u8,
                d.subsec_micros(),
            )
        }
        Value::Text(s) => MysqlValue::from(s.as_str()),
    }
}

/// Convert a slice of filter values to MySQL driver values.
pub fn values_to_mysql(values: &[Value]) -> Vec<MysqlValue> {
    values.iter().map(value_to_mysql).collect()
}

/// Collect batch-binder output into named driver parameters.
///
/// Pairs come straight from the `(BatchParam.name, value)` stream the
/// dialect's batch insert feeds its binder.
pub fn named_params(pairs: impl IntoIterator<Item = (SmolStr, Value)>) -> Params {
    Params::from(
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value_to_mysql(&value)))
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;
    use uuid::Uuid;

    #[test]
    fn test_null() {
        assert!(matches!(value_to_mysql(&Value::Null), MysqlValue::NULL));
    }

    #[test]
    fn test_bool_becomes_int() {
        assert!(matches!(
            value_to_mysql(&Value::Bool(true)),
            MysqlValue::Int(1)
        ));
    }

    #[test]
    fn test_int() {
        assert!(matches!(
            value_to_mysql(&Value::Int(42)),
            MysqlValue::Int(42)
        ));
    }

    #[test]
    fn test_float_becomes_double() {
        assert!(matches!(
            value_to_mysql(&Value::Float(2.5)),
            MysqlValue::Double(_)
        ));
    }

    #[test]
    fn test_text_becomes_bytes() {
        let converted = value_to_mysql(&Value::from("hello"));
        assert!(matches!(converted, MysqlValue::Bytes(ref b) if b == b"hello"));
    }

    #[test]
    fn test_uuid_becomes_hyphenated_text() {
        let id = Uuid::new_v4();
        let converted = value_to_mysql(&Value::Uuid(id));
        let expected = id.to_string().into_bytes();
        assert!(matches!(converted, MysqlValue::Bytes(ref b) if *b == expected));
    }

    #[test]
    fn test_datetime_becomes_date_tuple() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap();
        let converted = value_to_mysql(&Value::DateTime(dt));
        assert_eq!(converted, MysqlValue::Date(2024, 3, 1, 12, 30, 45, 0));
    }

    #[test]
    fn test_duration_becomes_time_tuple() {
        let d = Duration::new(90_061, 500_000_000);
        let converted = value_to_mysql(&Value::Duration(d));
        assert_eq!(converted, MysqlValue::Time(false, 1, 1, 1, 1, 500_000));
    }

    #[test]
    fn test_values_to_mysql() {
        let converted = values_to_mysql(&[Value::Int(1), Value::Null]);
        assert_eq!(converted, vec![MysqlValue::Int(1), MysqlValue::NULL]);
    }

    #[test]
    fn test_named_params() {
        let params = named_params(vec![
            (SmolStr::new("p0"), Value::Int(1)),
            (SmolStr::new("p1"), Value::from("x")),
        ]);
        let expected = Params::from(vec![
            ("p0".to_string(), MysqlValue::Int(1)),
            ("p1".to_string(), MysqlValue::Bytes(b"x".to_vec())),
        ]);
        assert_eq!(params, expected);
    }
}
