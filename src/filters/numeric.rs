use serde_json::{Number, Value};

use crate::error::Error;
use crate::filter::Filter;
use crate::rule::Rule;

/// Length of the leading `[+-]?digits` run of `s`.
fn integer_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = bytes[sign..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        0
    } else {
        sign + digits
    }
}

/// Length of the leading decimal float literal of `s`, exponent included.
fn float_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = bytes[exp.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    end
}

fn parse_int(s: &str) -> i64 {
    let s = s.trim_start();
    let prefix = &s[..integer_prefix_len(s)];
    if prefix.is_empty() {
        return 0;
    }
    prefix.parse::<i64>().unwrap_or_else(|_| {
        if prefix.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

fn parse_float(s: &str) -> f64 {
    let s = s.trim_start();
    s[..float_prefix_len(s)].parse::<f64>().unwrap_or(0.0)
}

/// Clamps infinities to the largest finite float of the same sign.
fn saturate(f: f64) -> f64 {
    if f.is_infinite() {
        if f > 0.0 {
            f64::MAX
        } else {
            f64::MIN
        }
    } else {
        f
    }
}

fn number_to_int(n: &Number) -> i64 {
    if let Some(i) = n.as_i64() {
        i
    } else if let Some(u) = n.as_u64() {
        i64::try_from(u).unwrap_or(i64::MAX)
    } else {
        // Saturating cast; NaN becomes 0.
        n.as_f64().map_or(0, |f| f.trunc() as i64)
    }
}

fn collection_flag(is_empty: bool) -> i64 {
    i64::from(!is_empty)
}

/// Coerces a value to an integer.
///
/// `null` is 0, booleans are 0 or 1, floats are truncated, strings yield
/// their leading integer (0 if there is none) and arrays or objects yield 1
/// when non-empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Int;

impl Filter for Int {
    fn apply(&self, _rule: &Rule, value: Value) -> Result<Value, Error> {
        let int = match &value {
            Value::Null => 0,
            Value::Bool(b) => i64::from(*b),
            Value::Number(n) => number_to_int(n),
            Value::String(s) => parse_int(s),
            Value::Array(items) => collection_flag(items.is_empty()),
            Value::Object(map) => collection_flag(map.is_empty()),
        };
        Ok(Value::from(int))
    }
}

/// Coerces a value to a float, following the same shape as [`Int`].
///
/// Strings yield their leading decimal literal, exponent included. Literals
/// out of range saturate to `f64::MAX` or `f64::MIN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Float;

impl Filter for Float {
    fn apply(&self, _rule: &Rule, value: Value) -> Result<Value, Error> {
        let float = match &value {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => saturate(parse_float(s)),
            Value::Array(items) => collection_flag(items.is_empty()) as f64,
            Value::Object(map) => collection_flag(map.is_empty()) as f64,
        };
        Ok(Value::from(float))
    }
}
