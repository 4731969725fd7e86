use serde_json::Value;

use super::boolean::is_truthy;
use crate::error::Error;
use crate::filter::Filter;
use crate::rule::Rule;

fn keep_chars(rule: &Rule, value: Value, allow_whitespace: bool, keep: fn(char) -> bool) -> Value {
    let allow_whitespace = rule
        .option("allow_whitespace")
        .map_or(allow_whitespace, is_truthy);
    match value {
        Value::String(s) => Value::String(
            s.chars()
                .filter(|c| keep(*c) || (allow_whitespace && c.is_whitespace()))
                .collect(),
        ),
        other => other,
    }
}

/// Keeps alphabetic characters. Whitespace is kept unless `allow_whitespace`
/// is false.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alpha;

impl Filter for Alpha {
    fn apply(&self, rule: &Rule, value: Value) -> Result<Value, Error> {
        Ok(keep_chars(rule, value, true, char::is_alphabetic))
    }
}

/// Keeps alphanumeric characters. Whitespace is kept unless
/// `allow_whitespace` is false.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alnum;

impl Filter for Alnum {
    fn apply(&self, rule: &Rule, value: Value) -> Result<Value, Error> {
        Ok(keep_chars(rule, value, true, char::is_alphanumeric))
    }
}

/// Keeps ASCII digits. Whitespace is dropped unless `allow_whitespace` is true.
#[derive(Debug, Clone, Copy, Default)]
pub struct Digits;

impl Filter for Digits {
    fn apply(&self, rule: &Rule, value: Value) -> Result<Value, Error> {
        Ok(keep_chars(rule, value, false, |c| c.is_ascii_digit()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{ALNUM, ALPHA, DIGITS};
    use serde_json::json;

    #[test]
    fn alpha_keeps_letters_and_whitespace() {
        let rule = Rule::of(ALPHA).unwrap();

        assert_eq!(Alpha.apply(&rule, json!("My Text 42!")).unwrap(), json!("My Text "));
        assert_eq!(Alpha.apply(&rule, json!("Çava")).unwrap(), json!("Çava"));
    }

    #[test]
    fn alpha_without_whitespace() {
        let rule = Rule::new(ALPHA, json!(false)).unwrap();

        assert_eq!(Alpha.apply(&rule, json!("My Text 42!")).unwrap(), json!("MyText"));
    }

    #[test]
    fn alnum_keeps_letters_and_digits() {
        let rule = Rule::new(ALNUM, json!({"allow_whitespace": false})).unwrap();

        assert_eq!(Alnum.apply(&rule, json!("R2-D2 & C-3PO")).unwrap(), json!("R2D2C3PO"));
    }

    #[test]
    fn digits_drop_whitespace_by_default() {
        let rule = Rule::of(DIGITS).unwrap();
        assert_eq!(Digits.apply(&rule, json!("+1 (555) 010-99")).unwrap(), json!("155501099"));

        let rule = Rule::new(DIGITS, json!(true)).unwrap();
        assert_eq!(Digits.apply(&rule, json!("12 34a")).unwrap(), json!("12 34"));
    }

    #[test]
    fn char_filters_pass_through_non_strings() {
        let rule = Rule::of(DIGITS).unwrap();

        assert_eq!(Digits.apply(&rule, json!(12.5)).unwrap(), json!(12.5));
        assert_eq!(Digits.apply(&rule, Value::Null).unwrap(), Value::Null);
    }
}
