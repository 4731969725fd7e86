use regex::Regex;
use serde_json::Value;

use crate::error::Error;
use crate::filter::Filter;
use crate::rule::Rule;

/// Replaces every match of the `pattern` option with `replacement`.
///
/// `replacement` defaults to the empty string and may reference capture
/// groups (`$1`, `${name}`). The pattern is compiled on each application;
/// an invalid pattern fails with
/// [`ErrorKind::FilterFailure`](crate::ErrorKind::FilterFailure).
#[derive(Debug, Clone, Copy, Default)]
pub struct RegExp;

impl RegExp {
    fn string_option<'a>(rule: &'a Rule, key: &str, fallback: &'a str) -> Result<&'a str, Error> {
        match rule.option(key) {
            None | Some(Value::Null) => Ok(fallback),
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(other) => Err(Error::filter_failure(
                rule.name(),
                format!("{} must be a string, got {}", key, other),
            )),
        }
    }
}

impl Filter for RegExp {
    fn apply(&self, rule: &Rule, value: Value) -> Result<Value, Error> {
        let Value::String(input) = value else {
            return Ok(value);
        };

        let pattern = Self::string_option(rule, "pattern", "")?;
        let replacement = Self::string_option(rule, "replacement", "")?;
        let regex = Regex::new(pattern).map_err(|e| Error::filter_failure(rule.name(), e))?;

        Ok(Value::String(regex.replace_all(&input, replacement).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::REGEXP;
    use crate::ErrorKind;
    use serde_json::json;

    #[test]
    fn removes_matches_by_default() {
        let rule = Rule::new(REGEXP, json!("[^a-z]")).unwrap();

        assert_eq!(RegExp.apply(&rule, json!("a1b2-c")).unwrap(), json!("abc"));
    }

    #[test]
    fn replacement_supports_capture_groups() {
        let rule = Rule::new(
            REGEXP,
            json!({"pattern": r"(\w+)@(\w+)", "replacement": "$2 at $1"}),
        )
        .unwrap();

        assert_eq!(RegExp.apply(&rule, json!("me@home")).unwrap(), json!("home at me"));
    }

    #[test]
    fn pattern_is_required() {
        let error = Rule::new(REGEXP, json!({"replacement": "x"})).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::MissingRequiredOption);
    }

    #[test]
    fn invalid_pattern_fails_at_apply_time() {
        let rule = Rule::new(REGEXP, json!("(unclosed")).unwrap();

        let error = RegExp.apply(&rule, json!("text")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FilterFailure);
        assert!(error.message().contains("regexp"));
    }

    #[test]
    fn non_string_pattern_fails() {
        let rule = Rule::new(REGEXP, json!(42)).unwrap();

        let error = RegExp.apply(&rule, json!("text")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FilterFailure);
    }

    #[test]
    fn non_string_values_pass_through() {
        let rule = Rule::new(REGEXP, json!("(unclosed")).unwrap();

        assert_eq!(RegExp.apply(&rule, json!(7)).unwrap(), json!(7));
        assert_eq!(RegExp.apply(&rule, Value::Null).unwrap(), Value::Null);
    }
}
