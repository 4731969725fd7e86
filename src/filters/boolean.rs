use serde_json::Value;

use crate::error::Error;
use crate::filter::Filter;
use crate::rule::Rule;

/// Returns the truthiness of a value.
///
/// `null`, `false`, `""`, `"0"`, zero numbers and empty arrays or objects
/// are false; everything else is true.
///
/// # Examples
///
/// ```
/// use rulefilter::filters::is_truthy;
/// use serde_json::json;
///
/// assert!(is_truthy(&json!("My Text")));
/// assert!(!is_truthy(&json!("0")));
/// assert!(!is_truthy(&json!(0.0)));
/// ```
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Coerces any value to a boolean. Takes no options.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanScalar;

impl Filter for BooleanScalar {
    fn apply(&self, _rule: &Rule, value: Value) -> Result<Value, Error> {
        Ok(Value::Bool(is_truthy(&value)))
    }
}
