use std::fmt;

use serde_json::Value;

use crate::error::Error;
use crate::rule::Rule;

/// A stateless transformation executing one rule kind.
///
/// `apply` receives the rule (for its options) and the current value, and
/// returns the transformed value. Filters must not keep state between calls;
/// the same filter instance may be shared across threads and rule chains.
///
/// Filters accept `Value::Null` unless their documentation says otherwise.
///
/// # Examples
///
/// ```
/// use rulefilter::{Filter, Rule, RuleKind, Error, Value};
///
/// struct Reverse;
///
/// impl Filter for Reverse {
///     fn apply(&self, _rule: &Rule, value: Value) -> Result<Value, Error> {
///         Ok(match value {
///             Value::String(s) => Value::String(s.chars().rev().collect()),
///             other => other,
///         })
///     }
/// }
///
/// let rule = Rule::of(RuleKind::new("reverse")).unwrap();
/// assert_eq!(Reverse.apply(&rule, "abc".into()).unwrap(), Value::from("cba"));
/// ```
pub trait Filter: Send + Sync {
    /// Applies `rule` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::FilterFailure`](crate::ErrorKind::FilterFailure) when
    /// the rule's options make the transformation impossible.
    fn apply(&self, rule: &Rule, value: Value) -> Result<Value, Error>;
}

/// A [`Filter`] backed by a closure. Created with [`filter_fn`].
#[derive(Clone)]
pub struct FnFilter<F> {
    f: F,
}

impl<F> Filter for FnFilter<F>
where
    F: Fn(&Rule, Value) -> Result<Value, Error> + Send + Sync,
{
    fn apply(&self, rule: &Rule, value: Value) -> Result<Value, Error> {
        (self.f)(rule, value)
    }
}

impl<F> fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter").finish_non_exhaustive()
    }
}

/// Wraps a closure as a [`Filter`].
///
/// # Examples
///
/// ```
/// use rulefilter::{filter_fn, Filter, Rule, RuleKind, Value};
///
/// let double = filter_fn(|_rule, value| {
///     Ok(Value::from(value.as_i64().unwrap_or_default() * 2))
/// });
///
/// let rule = Rule::of(RuleKind::new("double")).unwrap();
/// assert_eq!(double.apply(&rule, Value::from(21)).unwrap(), Value::from(42));
/// ```
pub fn filter_fn<F>(f: F) -> FnFilter<F>
where
    F: Fn(&Rule, Value) -> Result<Value, Error> + Send + Sync,
{
    FnFilter { f }
}
