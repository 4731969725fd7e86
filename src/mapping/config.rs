//! Declarative rule configuration.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::provider::{PropertyRuleProvider, RuleDeclaration};
use crate::entity::ClassId;
use crate::error::Error;

/// Provider reading rule declarations from a configuration document.
///
/// Classes are keyed by [`Filterable::class_name`](crate::Filterable::class_name).
/// Each class maps to its declarations in application order:
///
/// ```json
/// {
///   "classes": {
///     "User": [
///       { "property": "name",   "rule": "trim" },
///       { "property": "name",   "rule": "to_upper" },
///       { "property": "active", "rule": "boolean" }
///     ]
///   }
/// }
/// ```
///
/// A class that is not in the map cannot be introspected and fails with
/// [`ErrorKind::ReflectionFailure`](crate::ErrorKind::ReflectionFailure); list a
/// class with an empty array to declare that it has no filtered properties.
///
/// # Examples
///
/// ```
/// use rulefilter::RuleMap;
///
/// let map = RuleMap::from_json_str(r#"{"classes": {"User": []}}"#).unwrap();
/// assert!(map.contains_class("User"));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleMap {
    #[serde(default)]
    classes: HashMap<String, Vec<RuleDeclaration>>,
}

impl RuleMap {
    /// Creates an empty rule map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a rule map from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Config`](crate::ErrorKind::Config) if the document is
    /// not valid JSON or does not match the expected shape.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::config(format!("invalid rule map: {}", e)))
    }

    /// Parses a rule map from a reader yielding JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Config`](crate::ErrorKind::Config) on I/O or parse failure.
    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        serde_json::from_reader(reader)
            .map_err(|e| Error::config(format!("invalid rule map: {}", e)))
    }

    /// Reads a rule map from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Config`](crate::ErrorKind::Config) if the file cannot
    /// be opened or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::config(format!("cannot open rule map {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "loading rule map");
        Self::from_reader(BufReader::new(file))
    }

    /// Sets the declarations of a class, replacing any previous ones.
    pub fn insert(&mut self, class_name: impl Into<String>, declarations: Vec<RuleDeclaration>) {
        self.classes.insert(class_name.into(), declarations);
    }

    /// Adds a class and returns the map, for chained construction.
    pub fn with_class(
        mut self,
        class_name: impl Into<String>,
        declarations: Vec<RuleDeclaration>,
    ) -> Self {
        self.insert(class_name, declarations);
        self
    }

    /// Returns `true` if the map describes `class_name`.
    pub fn contains_class(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// Returns the number of described classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no classes are described.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl PropertyRuleProvider for RuleMap {
    fn declarations(&self, class: &ClassId) -> Result<Vec<RuleDeclaration>, Error> {
        self.classes.get(class.name()).cloned().ok_or_else(|| {
            Error::reflection(format!("class '{}' has no rule mapping", class.name()))
        })
    }
}
