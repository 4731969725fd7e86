//! Shared fixtures and proptest strategies for unit tests.

use proptest::prelude::*;
use serde_json::Value;

use crate::entity::Filterable;
use crate::error::Error;
use crate::mapping::RuleDeclaration;
use crate::rule::RuleKind;

/// Rule kind with two required options and one optional one.
pub(crate) const REQUIRED_OPTIONS: RuleKind = RuleKind::new("required_options")
    .with_default_option("config")
    .with_options(&["config", "path", "url"])
    .with_required_options(&["config", "path"]);

/// Annotated entity. Counts writes so tests can tell untouched from rewritten.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Article {
    pub title: String,
    pub slug: String,
    pub published: Value,
    pub writes: usize,
}

impl Article {
    pub(crate) fn new(title: &str, slug: &str, published: impl Into<Value>) -> Self {
        Self {
            title: title.to_string(),
            slug: slug.to_string(),
            published: published.into(),
            writes: 0,
        }
    }
}

impl Filterable for Article {
    fn property_names() -> &'static [&'static str] {
        &["title", "slug", "published"]
    }

    fn rule_declarations() -> Vec<RuleDeclaration> {
        vec![
            RuleDeclaration::new("published", "boolean"),
            RuleDeclaration::new("title", "trim"),
            RuleDeclaration::new("title", "strip_newlines"),
            RuleDeclaration::new("slug", "to_lower"),
            RuleDeclaration::new("slug", "trim"),
        ]
    }

    fn class_name() -> &'static str {
        "Article"
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        match name {
            "title" => Some(Value::from(self.title.clone())),
            "slug" => Some(Value::from(self.slug.clone())),
            "published" => Some(self.published.clone()),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), Error> {
        match (name, value) {
            ("title", Value::String(s)) => self.title = s,
            ("slug", Value::String(s)) => self.slug = s,
            ("published", value) => self.published = value,
            (name, value) => {
                return Err(Error::reflection(format!(
                    "cannot set Article::{} to {}",
                    name, value
                )))
            }
        }
        self.writes += 1;
        Ok(())
    }
}

/// Entity without any rules.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Plain {
    pub note: String,
}

impl Filterable for Plain {
    fn property_names() -> &'static [&'static str] {
        &["note"]
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        (name == "note").then(|| Value::from(self.note.clone()))
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), Error> {
        match (name, value) {
            ("note", Value::String(s)) => {
                self.note = s;
                Ok(())
            }
            (name, _) => Err(Error::reflection(format!("cannot set Plain::{}", name))),
        }
    }
}

/// Strategy for option values: null, booleans, integers and short strings.
pub(crate) fn arb_option_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::from),
    ]
}

/// Strategy for filterable scalars, including finite floats and text with
/// surrounding whitespace and newlines.
pub(crate) fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[ \\t\\r\\na-zA-Z0-9-]{0,24}".prop_map(Value::from),
    ]
}
