use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::entity::Filterable;
use crate::error::Error;
use crate::filter::Filter;
use crate::loader::{FilterLoader, FilterRegistry};
use crate::mapping::{ClassMetadataFactory, DeclaredRules, MetadataCache, PropertyRuleProvider};
use crate::rule::{Rule, RuleKind, RuleKinds};
use crate::walker::ObjectWalker;

/// A single rule or an ordered rule chain, as accepted by
/// [`FilterEngine::filter_value`].
#[derive(Debug, Clone, Copy)]
pub enum Rules<'a> {
    /// One rule.
    One(&'a Rule),
    /// Rules applied left to right.
    Chain(&'a [Rule]),
}

impl<'a> Rules<'a> {
    /// Returns the rules as a slice, in application order.
    pub fn as_slice(&self) -> &'a [Rule] {
        match *self {
            Rules::One(rule) => std::slice::from_ref(rule),
            Rules::Chain(rules) => rules,
        }
    }
}

impl<'a> From<&'a Rule> for Rules<'a> {
    fn from(rule: &'a Rule) -> Self {
        Rules::One(rule)
    }
}

impl<'a> From<&'a [Rule]> for Rules<'a> {
    fn from(rules: &'a [Rule]) -> Self {
        Rules::Chain(rules)
    }
}

impl<'a> From<&'a Vec<Rule>> for Rules<'a> {
    fn from(rules: &'a Vec<Rule>) -> Self {
        Rules::Chain(rules)
    }
}

impl<'a, const N: usize> From<&'a [Rule; N]> for Rules<'a> {
    fn from(rules: &'a [Rule; N]) -> Self {
        Rules::Chain(rules)
    }
}

/// Entry point for filtering entities, properties and bare values.
///
/// The engine composes a [`ClassMetadataFactory`] (which rules apply where)
/// with a [`FilterLoader`] (which filter executes a rule). Filtering is
/// synchronous; the engine is `Send + Sync` and can be shared between threads.
///
/// # Examples
///
/// ```
/// use rulefilter::{filters, FilterEngine, Rule};
/// use serde_json::json;
///
/// let engine = FilterEngine::builtin();
///
/// let chain = [
///     Rule::of(filters::TRIM).unwrap(),
///     Rule::of(filters::TO_UPPER).unwrap(),
/// ];
/// let value = engine.filter_value(json!("  shout  "), &chain).unwrap();
/// assert_eq!(value, json!("SHOUT"));
///
/// let flag = engine.filter_value(json!(""), &Rule::of(filters::BOOLEAN).unwrap()).unwrap();
/// assert_eq!(flag, json!(false));
/// ```
#[derive(Clone)]
pub struct FilterEngine {
    factory: ClassMetadataFactory,
    loader: Arc<dyn FilterLoader>,
}

impl FilterEngine {
    /// Creates an engine from a metadata factory and a filter loader.
    pub fn new(factory: ClassMetadataFactory, loader: impl FilterLoader + 'static) -> Self {
        Self {
            factory,
            loader: Arc::new(loader),
        }
    }

    /// Creates an engine with in-code declarations and the built-in catalog.
    pub fn builtin() -> Self {
        Self::new(ClassMetadataFactory::builtin(), FilterRegistry::builtin())
    }

    /// Starts building an engine. Defaults match [`builtin`](Self::builtin).
    pub fn builder() -> FilterEngineBuilder {
        FilterEngineBuilder::new()
    }

    /// Filters every annotated property of `object`.
    ///
    /// # Errors
    ///
    /// Returns the first metadata, resolution or filter error. Properties
    /// filtered before the failure keep their new values.
    pub fn filter_entity<T: Filterable>(&self, object: &mut T) -> Result<(), Error> {
        self.walk_object(object, None)
    }

    /// Filters `object` if present; `None` is a no-op.
    ///
    /// # Errors
    ///
    /// See [`filter_entity`](Self::filter_entity).
    pub fn filter_optional_entity<T: Filterable>(
        &self,
        object: Option<&mut T>,
    ) -> Result<(), Error> {
        match object {
            Some(object) => self.filter_entity(object),
            None => Ok(()),
        }
    }

    /// Filters a single property of `object` with its annotated rules.
    ///
    /// A property without rules is left untouched.
    ///
    /// # Errors
    ///
    /// See [`filter_entity`](Self::filter_entity).
    pub fn filter_property<T: Filterable>(
        &self,
        object: &mut T,
        property: &str,
    ) -> Result<(), Error> {
        self.walk_object(object, Some(property))
    }

    /// Applies a rule, or a chain of rules left to right, to a bare value.
    ///
    /// No metadata is involved.
    ///
    /// # Errors
    ///
    /// Returns the first resolution or filter error.
    pub fn filter_value<'r>(
        &self,
        value: Value,
        rules: impl Into<Rules<'r>>,
    ) -> Result<Value, Error> {
        rules
            .into()
            .as_slice()
            .iter()
            .try_fold(value, |value, rule| {
                self.loader.filter_for_rule(rule)?.apply(rule, value)
            })
    }

    /// Returns the metadata factory.
    pub fn metadata_factory(&self) -> &ClassMetadataFactory {
        &self.factory
    }

    /// Returns the filter loader.
    pub fn loader(&self) -> &dyn FilterLoader {
        self.loader.as_ref()
    }

    fn walk_object<T: Filterable>(&self, object: &mut T, limit: Option<&str>) -> Result<(), Error> {
        let metadata = self.factory.get_class_metadata::<T>()?;
        let mut walker = ObjectWalker::new(object, self.loader.as_ref());

        match limit {
            Some(property) => {
                walker.apply_filter_rules(property, metadata.property_rules(property))?;
            }
            None => {
                for property in metadata.filtered_properties() {
                    walker.apply_filter_rules(property, metadata.property_rules(property))?;
                }
            }
        }

        tracing::debug!(
            class = metadata.class_name(),
            property = limit,
            "filtered entity"
        );
        Ok(())
    }
}

impl fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterEngine")
            .field("factory", &self.factory)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FilterEngine`].
///
/// Filters added with [`rule`](Self::rule) always take precedence, whether
/// the engine resolves the rest through the registry or a custom loader.
///
/// # Examples
///
/// ```
/// use rulefilter::{filter_fn, FilterEngine, Rule, RuleKind, Value};
/// use serde_json::json;
///
/// const EXCLAIM: RuleKind = RuleKind::new("exclaim");
///
/// let engine = FilterEngine::builder()
///     .rule(EXCLAIM, filter_fn(|_, value| {
///         Ok(Value::from(format!("{}!", value.as_str().unwrap_or_default())))
///     }))
///     .build();
///
/// let rule = Rule::of(EXCLAIM).unwrap();
/// assert_eq!(engine.filter_value(json!("hi"), &rule).unwrap(), json!("hi!"));
/// ```
pub struct FilterEngineBuilder {
    provider: Arc<dyn PropertyRuleProvider>,
    kinds: RuleKinds,
    registry: FilterRegistry,
    rules: FilterRegistry,
    loader: Option<Arc<dyn FilterLoader>>,
    cache: Option<Arc<MetadataCache>>,
}

impl FilterEngineBuilder {
    fn new() -> Self {
        Self {
            provider: Arc::new(DeclaredRules),
            kinds: RuleKinds::builtin(),
            registry: FilterRegistry::builtin(),
            rules: FilterRegistry::new(),
            loader: None,
            cache: None,
        }
    }

    /// Sets the source of rule declarations.
    pub fn provider(mut self, provider: impl PropertyRuleProvider + 'static) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Replaces the rule kind registry.
    pub fn rule_kinds(mut self, kinds: RuleKinds) -> Self {
        self.kinds = kinds;
        self
    }

    /// Registers a rule kind together with the filter executing it.
    pub fn rule(mut self, kind: RuleKind, filter: impl Filter + 'static) -> Self {
        self.kinds.register(kind);
        self.rules.register(kind.name(), filter);
        self
    }

    /// Replaces the filter registry. Filters added with [`rule`](Self::rule)
    /// are kept.
    pub fn registry(mut self, registry: FilterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Uses a custom filter loader instead of the registry.
    ///
    /// Filters added with [`rule`](Self::rule) are still consulted first.
    pub fn loader(mut self, loader: impl FilterLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Shares a metadata cache with other engines. Each engine only sees the
    /// metadata it built.
    pub fn cache(mut self, cache: Arc<MetadataCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Builds the engine.
    pub fn build(self) -> FilterEngine {
        let cache = self.cache.unwrap_or_default();
        let factory = ClassMetadataFactory::from_parts(self.provider, self.kinds, cache);
        let loader: Arc<dyn FilterLoader> = match self.loader {
            Some(fallback) if self.rules.is_empty() => fallback,
            Some(fallback) => Arc::new(Layered {
                rules: self.rules,
                fallback,
            }),
            None => {
                let mut registry = self.registry;
                registry.extend(&self.rules);
                Arc::new(registry)
            }
        };
        FilterEngine { factory, loader }
    }
}

/// Builder-registered filters in front of a custom loader.
struct Layered {
    rules: FilterRegistry,
    fallback: Arc<dyn FilterLoader>,
}

impl FilterLoader for Layered {
    fn filter_for_rule(&self, rule: &Rule) -> Result<Arc<dyn Filter>, Error> {
        if self.rules.contains(rule.name()) {
            self.rules.filter_for_rule(rule)
        } else {
            self.fallback.filter_for_rule(rule)
        }
    }
}

impl Default for FilterEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
