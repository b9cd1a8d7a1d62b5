//! Numeric coercion boundary for source values.
//!
//! The source database stores numbers in an arbitrary-precision decimal
//! format that arrives here either as a native JSON number or as an
//! extended-JSON wrapper object carrying the decimal as a string. The search
//! index only accepts standard floats, so coercion happens explicitly at this
//! boundary rather than through implicit conversions downstream.

use serde_json::Value;

/// A numeric value as it appears in a source record.
///
/// Tagged union over the two representations the source produces: a native
/// float or an arbitrary-precision decimal carried as a string.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNumber {
    /// Native JSON number.
    Float(f64),
    /// Decimal carried as a string, e.g. from `{"$numberDecimal": "80.00"}`.
    Decimal(String),
}

/// Extended-JSON wrapper keys that carry a numeric value as a string.
const EXTENDED_NUMBER_KEYS: &[&str] = &[
    "$numberDecimal",
    "$numberDouble",
    "$numberLong",
    "$numberInt",
];

impl SourceNumber {
    /// Recognize a numeric value in any of the shapes the source produces.
    ///
    /// Accepts:
    /// - native JSON numbers;
    /// - extended-JSON wrappers (`$numberDecimal`, `$numberDouble`,
    ///   `$numberLong`, `$numberInt`);
    /// - bare numeric strings.
    ///
    /// Returns `None` for anything else; callers decide whether that is a
    /// structural failure.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Float),
            Value::Object(obj) => EXTENDED_NUMBER_KEYS.iter().find_map(|key| {
                obj.get(*key)
                    .and_then(Value::as_str)
                    .map(|s| Self::Decimal(s.to_string()))
            }),
            Value::String(s) => Some(Self::Decimal(s.clone())),
            _ => None,
        }
    }

    /// Coerce to a standard float.
    ///
    /// Decimal strings that do not parse as a float yield `None` - the value
    /// was shaped like a number but does not carry one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Decimal(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_native_number() {
        let n = SourceNumber::from_value(&json!(80.5)).unwrap();
        assert_eq!(n, SourceNumber::Float(80.5));
        assert_eq!(n.as_f64(), Some(80.5));
    }

    #[test]
    fn test_extended_json_decimal() {
        let n = SourceNumber::from_value(&json!({"$numberDecimal": "5000"})).unwrap();
        assert_eq!(n, SourceNumber::Decimal("5000".to_string()));
        assert_eq!(n.as_f64(), Some(5000.0));
    }

    #[test]
    fn test_extended_json_int_and_long() {
        let int = SourceNumber::from_value(&json!({"$numberInt": "3"})).unwrap();
        assert_eq!(int.as_f64(), Some(3.0));

        let long = SourceNumber::from_value(&json!({"$numberLong": "123456789"})).unwrap();
        assert_eq!(long.as_f64(), Some(123456789.0));
    }

    #[test]
    fn test_numeric_string() {
        let n = SourceNumber::from_value(&json!("42.25")).unwrap();
        assert_eq!(n.as_f64(), Some(42.25));
    }

    #[test]
    fn test_garbage_decimal_does_not_coerce() {
        let n = SourceNumber::from_value(&json!("not a number")).unwrap();
        assert_eq!(n.as_f64(), None);
    }

    #[test]
    fn test_non_numeric_shapes_rejected() {
        assert_eq!(SourceNumber::from_value(&json!(true)), None);
        assert_eq!(SourceNumber::from_value(&json!([1])), None);
        assert_eq!(SourceNumber::from_value(&json!({"price": 3})), None);
        assert_eq!(SourceNumber::from_value(&Value::Null), None);
    }
}
