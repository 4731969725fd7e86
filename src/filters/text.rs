use serde_json::Value;

use crate::error::Error;
use crate::filter::Filter;
use crate::rule::Rule;

/// Applies `f` to string values and passes everything else through.
fn map_string(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

/// Trims both ends of a string.
///
/// Without options, Unicode whitespace is trimmed. With `charlist`, every
/// character in the list is trimmed instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trim;

impl Filter for Trim {
    fn apply(&self, rule: &Rule, value: Value) -> Result<Value, Error> {
        match rule.option("charlist") {
            None | Some(Value::Null) => Ok(map_string(value, |s| s.trim().to_string())),
            Some(Value::String(charlist)) => Ok(map_string(value, |s| {
                s.trim_matches(|c| charlist.contains(c)).to_string()
            })),
            Some(other) => Err(Error::filter_failure(
                rule.name(),
                format!("charlist must be a string, got {}", other),
            )),
        }
    }
}

/// Lowercases a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToLower;

impl Filter for ToLower {
    fn apply(&self, _rule: &Rule, value: Value) -> Result<Value, Error> {
        Ok(map_string(value, str::to_lowercase))
    }
}

/// Uppercases a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToUpper;

impl Filter for ToUpper {
    fn apply(&self, _rule: &Rule, value: Value) -> Result<Value, Error> {
        Ok(map_string(value, str::to_uppercase))
    }
}

/// Removes `\r` and `\n` from a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripNewlines;

impl Filter for StripNewlines {
    fn apply(&self, _rule: &Rule, value: Value) -> Result<Value, Error> {
        Ok(map_string(value, |s| s.replace(['\r', '\n'], "")))
    }
}
