use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::filter::Filter;
use crate::rule::Rule;

/// Resolves a rule to the filter that executes it.
///
/// Resolution must be deterministic: the same rule kind always resolves to a
/// filter with the same behavior. An unmapped kind is an error, never a
/// silent no-op.
pub trait FilterLoader: Send + Sync {
    /// Returns the filter for `rule`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnresolvableFilter`](crate::ErrorKind::UnresolvableFilter)
    /// if no filter corresponds to the rule's kind.
    fn filter_for_rule(&self, rule: &Rule) -> Result<Arc<dyn Filter>, Error>;
}

/// Explicit registration map from rule kind name to filter.
///
/// # Examples
///
/// ```
/// use rulefilter::{filter_fn, FilterLoader, FilterRegistry, Rule, RuleKind, ErrorKind};
///
/// let mut registry = FilterRegistry::new();
/// registry.register("identity", filter_fn(|_, value| Ok(value)));
///
/// let known = Rule::of(RuleKind::new("identity")).unwrap();
/// assert!(registry.filter_for_rule(&known).is_ok());
///
/// let unknown = Rule::of(RuleKind::new("shout")).unwrap();
/// let error = registry.filter_for_rule(&unknown).err().unwrap();
/// assert_eq!(error.kind(), ErrorKind::UnresolvableFilter);
/// ```
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, Arc<dyn Filter>>,
}

impl FilterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the filters of every built-in rule kind.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::filters::register_builtin(&mut registry);
        registry
    }

    /// Registers `filter` for rule kind `name`, replacing any previous filter.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        filter: impl Filter + 'static,
    ) -> &mut Self {
        self.register_shared(name, Arc::new(filter))
    }

    /// Registers an already shared filter for rule kind `name`.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        filter: Arc<dyn Filter>,
    ) -> &mut Self {
        self.filters.insert(name.into(), filter);
        self
    }

    /// Adds a filter and returns the registry, for chained construction.
    pub fn with(mut self, name: impl Into<String>, filter: impl Filter + 'static) -> Self {
        self.register(name, filter);
        self
    }

    /// Copies every filter of `other` into this registry, replacing filters
    /// with the same name.
    pub(crate) fn extend(&mut self, other: &FilterRegistry) {
        for (name, filter) in &other.filters {
            self.filters.insert(name.clone(), Arc::clone(filter));
        }
    }

    /// Returns `true` if a filter is registered for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Returns the number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if no filters are registered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl FilterLoader for FilterRegistry {
    fn filter_for_rule(&self, rule: &Rule) -> Result<Arc<dyn Filter>, Error> {
        match self.filters.get(rule.name()) {
            Some(filter) => Ok(Arc::clone(filter)),
            None => {
                tracing::warn!(rule = rule.name(), "no filter registered for rule");
                Err(Error::unresolvable_filter(rule.name()))
            }
        }
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FilterRegistry")
            .field("filters", &names)
            .finish()
    }
}
