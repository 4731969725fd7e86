use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Error;

/// Static description of a rule kind: its name and the option keys it accepts.
///
/// A `RuleKind` plays the role of a rule "class": it declares which option a
/// bare positional argument binds to and which options must always be present.
/// Kinds are `const`-constructible so catalogs can be declared as constants.
///
/// # Examples
///
/// ```
/// use rulefilter::RuleKind;
///
/// const SLUG: RuleKind = RuleKind::new("slug")
///     .with_default_option("separator")
///     .with_options(&["separator", "max_len"])
///     .with_required_options(&["separator"]);
///
/// assert_eq!(SLUG.name(), "slug");
/// assert!(SLUG.accepts("max_len"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleKind {
    name: &'static str,
    default_option: Option<&'static str>,
    options: &'static [&'static str],
    required_options: &'static [&'static str],
}

impl RuleKind {
    /// Creates a rule kind that accepts no options.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            default_option: None,
            options: &[],
            required_options: &[],
        }
    }

    /// Sets the option that an unnamed positional argument binds to.
    pub const fn with_default_option(self, key: &'static str) -> Self {
        Self {
            default_option: Some(key),
            ..self
        }
    }

    /// Declares the option keys this kind accepts.
    pub const fn with_options(self, options: &'static [&'static str]) -> Self {
        Self { options, ..self }
    }

    /// Declares the option keys that must be present after construction.
    pub const fn with_required_options(self, required: &'static [&'static str]) -> Self {
        Self {
            required_options: required,
            ..self
        }
    }

    /// Returns the rule kind name used for filter resolution.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the default option key, if the kind has one.
    pub fn default_option(&self) -> Option<&'static str> {
        self.default_option
    }

    /// Returns the declared option keys.
    pub fn options(&self) -> &'static [&'static str] {
        self.options
    }

    /// Returns the required option keys.
    pub fn required_options(&self) -> &'static [&'static str] {
        self.required_options
    }

    /// Returns `true` if `key` is a declared, default or required option.
    pub fn accepts(&self, key: &str) -> bool {
        self.options.contains(&key)
            || self.required_options.contains(&key)
            || self.default_option == Some(key)
    }
}

/// Raw arguments attached to a rule declaration.
///
/// Converting from a JSON value normalizes the annotation shorthands:
/// `null` and `{}` mean no arguments, `{"value": x}` is the positional value
/// `x`, any other object is a set of named options and every other value is
/// positional.
///
/// # Examples
///
/// ```
/// use rulefilter::RuleArgs;
/// use serde_json::json;
///
/// assert_eq!(RuleArgs::from(json!(null)), RuleArgs::None);
/// assert_eq!(RuleArgs::from(json!(" ")), RuleArgs::Positional(json!(" ")));
/// assert_eq!(RuleArgs::from(json!({"value": "x"})), RuleArgs::Positional(json!("x")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum RuleArgs {
    /// No arguments.
    #[default]
    None,
    /// A single unnamed argument, bound to the kind's default option.
    Positional(Value),
    /// Named options.
    Named(Map<String, Value>),
}

impl From<Value> for RuleArgs {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RuleArgs::None,
            Value::Object(map) if map.is_empty() => RuleArgs::None,
            Value::Object(mut map) if map.len() == 1 && map.contains_key("value") => {
                RuleArgs::Positional(map.remove("value").unwrap_or(Value::Null))
            }
            Value::Object(map) => RuleArgs::Named(map),
            other => RuleArgs::Positional(other),
        }
    }
}

impl From<Map<String, Value>> for RuleArgs {
    fn from(map: Map<String, Value>) -> Self {
        RuleArgs::from(Value::Object(map))
    }
}

impl From<Option<Value>> for RuleArgs {
    fn from(value: Option<Value>) -> Self {
        value.map(RuleArgs::from).unwrap_or_default()
    }
}

/// An immutable, validated transformation step.
///
/// A rule couples a [`RuleKind`] with the options it was declared with. The
/// option set is checked once, at construction: a rule that exists always
/// satisfies its kind's required options.
///
/// # Examples
///
/// ```
/// use rulefilter::{filters, Rule, ErrorKind};
/// use serde_json::json;
///
/// let rule = Rule::new(filters::REGEXP, json!("[0-9]+")).unwrap();
/// assert_eq!(rule.option("pattern"), Some(&json!("[0-9]+")));
///
/// let missing = Rule::new(filters::REGEXP, json!(null)).unwrap_err();
/// assert_eq!(missing.kind(), ErrorKind::MissingRequiredOption);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    kind: RuleKind,
    options: Map<String, Value>,
}

impl Rule {
    /// Builds a rule of `kind` from raw arguments.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::NoDefaultOptionDefined`](crate::ErrorKind::NoDefaultOptionDefined)
    ///   if a positional value is given to a kind without a default option.
    /// - [`ErrorKind::InvalidOption`](crate::ErrorKind::InvalidOption) if a named
    ///   option is not declared by the kind.
    /// - [`ErrorKind::MissingRequiredOption`](crate::ErrorKind::MissingRequiredOption)
    ///   if a required option is absent after normalization.
    pub fn new(kind: RuleKind, args: impl Into<RuleArgs>) -> Result<Self, Error> {
        let options = match args.into() {
            RuleArgs::None => Map::new(),
            RuleArgs::Positional(value) => {
                let key = kind
                    .default_option
                    .ok_or_else(|| Error::no_default_option(kind.name))?;
                let mut options = Map::new();
                options.insert(key.to_string(), value);
                options
            }
            RuleArgs::Named(map) => {
                let invalid: Vec<&str> = map
                    .keys()
                    .map(String::as_str)
                    .filter(|key| !kind.accepts(key))
                    .collect();
                if !invalid.is_empty() {
                    return Err(Error::invalid_options(kind.name, &invalid));
                }
                map
            }
        };

        let missing: Vec<&str> = kind
            .required_options
            .iter()
            .copied()
            .filter(|key| !options.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(Error::missing_required_options(kind.name, &missing));
        }

        Ok(Self { kind, options })
    }

    /// Builds a rule with no arguments.
    pub fn of(kind: RuleKind) -> Result<Self, Error> {
        Self::new(kind, RuleArgs::None)
    }

    /// Returns the rule kind name.
    pub fn name(&self) -> &'static str {
        self.kind.name
    }

    /// Returns the rule kind.
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Returns the default option key of the rule kind.
    pub fn default_option(&self) -> Option<&'static str> {
        self.kind.default_option
    }

    /// Returns the required option keys of the rule kind.
    pub fn required_options(&self) -> &'static [&'static str] {
        self.kind.required_options
    }

    /// Returns all options set on this rule.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Returns the value of an option, if set.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Returns the value of an option, or `fallback` when it is not set.
    pub fn option_or<'a>(&'a self, key: &str, fallback: &'a Value) -> &'a Value {
        self.options.get(key).unwrap_or(fallback)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.options.is_empty() {
            write!(f, "{}", self.kind.name)
        } else {
            write!(f, "{}({})", self.kind.name, Value::Object(self.options.clone()))
        }
    }
}

/// Registry of rule kinds by name.
///
/// Metadata providers name rules by string; the registry turns those names
/// back into [`RuleKind`]s so rules can be constructed and validated.
#[derive(Debug, Clone, Default)]
pub struct RuleKinds {
    kinds: HashMap<&'static str, RuleKind>,
}

impl RuleKinds {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in rule kind.
    pub fn builtin() -> Self {
        let mut kinds = Self::new();
        for kind in crate::filters::BUILTIN_KINDS {
            kinds.register(*kind);
        }
        kinds
    }

    /// Registers a rule kind, replacing any kind with the same name.
    pub fn register(&mut self, kind: RuleKind) -> &mut Self {
        self.kinds.insert(kind.name, kind);
        self
    }

    /// Adds a rule kind and returns the registry, for chained construction.
    pub fn with(mut self, kind: RuleKind) -> Self {
        self.register(kind);
        self
    }

    /// Looks up a rule kind by name.
    pub fn get(&self, name: &str) -> Option<RuleKind> {
        self.kinds.get(name).copied()
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
