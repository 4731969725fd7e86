use std::fmt;
use std::sync::Arc;

use super::cache::{FactoryScope, MetadataCache};
use super::metadata::ClassMetadata;
use super::provider::{DeclaredRules, PropertyRuleProvider, RuleDeclaration};
use crate::entity::{ClassId, Filterable};
use crate::error::Error;
use crate::rule::{Rule, RuleKinds};

/// Builds [`ClassMetadata`] from a [`PropertyRuleProvider`] and memoizes it.
///
/// On the first request for a class the factory asks its provider for the
/// class's declarations, resolves each rule kind through its [`RuleKinds`]
/// registry, constructs and validates every [`Rule`], and caches the result.
/// Later requests return the cached instance.
///
/// A factory may share its cache with other factories; each one only sees
/// the metadata it built itself. Clones share both cache and entries.
///
/// Properties appear in the class's declared property order; rules keep
/// their declaration order within each property.
///
/// # Examples
///
/// ```
/// use rulefilter::{ClassMetadataFactory, Error, Filterable, RuleDeclaration, Value};
///
/// struct Tag { label: String }
///
/// impl Filterable for Tag {
///     fn property_names() -> &'static [&'static str] { &["label"] }
///     fn rule_declarations() -> Vec<RuleDeclaration> {
///         vec![RuleDeclaration::new("label", "trim")]
///     }
///     fn get_property(&self, _: &str) -> Option<Value> { Some(self.label.clone().into()) }
///     fn set_property(&mut self, _: &str, v: Value) -> Result<(), Error> {
///         self.label = v.as_str().unwrap_or_default().to_string();
///         Ok(())
///     }
/// }
///
/// let factory = ClassMetadataFactory::builtin();
/// let metadata = factory.get_class_metadata::<Tag>().unwrap();
/// assert_eq!(metadata.filtered_properties(), &["label"]);
/// ```
#[derive(Clone)]
pub struct ClassMetadataFactory {
    provider: Arc<dyn PropertyRuleProvider>,
    kinds: RuleKinds,
    cache: Arc<MetadataCache>,
    scope: FactoryScope,
}

impl ClassMetadataFactory {
    /// Creates a factory with its own, empty cache.
    pub fn new(provider: impl PropertyRuleProvider + 'static, kinds: RuleKinds) -> Self {
        Self::from_parts(Arc::new(provider), kinds, Arc::new(MetadataCache::new()))
    }

    pub(crate) fn from_parts(
        provider: Arc<dyn PropertyRuleProvider>,
        kinds: RuleKinds,
        cache: Arc<MetadataCache>,
    ) -> Self {
        Self {
            provider,
            kinds,
            cache,
            scope: FactoryScope::next(),
        }
    }

    /// Creates a factory reading in-code declarations with the built-in rule kinds.
    pub fn builtin() -> Self {
        Self::new(DeclaredRules, RuleKinds::builtin())
    }

    /// Replaces the cache, e.g. to share one cache between factories.
    ///
    /// Entries built by other factories stay invisible to this one.
    pub fn with_cache(mut self, cache: Arc<MetadataCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Returns the metadata cache.
    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    /// Returns the rule kind registry used to build rules.
    pub fn rule_kinds(&self) -> &RuleKinds {
        &self.kinds
    }

    /// Returns the metadata of `T`, building it on first request.
    ///
    /// # Errors
    ///
    /// See [`get_metadata_for`](Self::get_metadata_for).
    pub fn get_class_metadata<T: Filterable>(&self) -> Result<Arc<ClassMetadata>, Error> {
        self.get_metadata_for(&ClassId::of::<T>())
    }

    /// Returns the metadata of `class`, building it on first request.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::ReflectionFailure`](crate::ErrorKind::ReflectionFailure) if
    ///   the provider cannot describe the class, a declaration names a property
    ///   the class does not declare, or names an unknown rule kind.
    /// - Rule construction errors (missing, invalid or default options).
    pub fn get_metadata_for(&self, class: &ClassId) -> Result<Arc<ClassMetadata>, Error> {
        self.cache
            .get_or_try_insert(self.scope, class, || self.build(class))
    }

    fn build(&self, class: &ClassId) -> Result<ClassMetadata, Error> {
        let declarations = self.provider.declarations(class)?;
        let property_names = class.property_names();

        for declaration in &declarations {
            if !property_names.contains(&declaration.property.as_str()) {
                tracing::warn!(
                    class = %class,
                    property = %declaration.property,
                    "rule declared on unknown property"
                );
                return Err(Error::reflection(format!(
                    "class '{}' has no property '{}'",
                    class, declaration.property
                )));
            }
        }

        let mut metadata = ClassMetadata::new(class.name());
        for property in property_names {
            for declaration in declarations.iter().filter(|d| d.property == *property) {
                let rule = self.build_rule(class, declaration)?;
                metadata.add_property_rule(property, rule);
            }
        }

        tracing::debug!(
            class = %class,
            properties = metadata.filtered_properties().len(),
            rules = metadata.rule_count(),
            "built class metadata"
        );
        Ok(metadata)
    }

    fn build_rule(&self, class: &ClassId, declaration: &RuleDeclaration) -> Result<Rule, Error> {
        let kind = self.kinds.get(&declaration.rule).ok_or_else(|| {
            tracing::warn!(class = %class, rule = %declaration.rule, "unknown rule kind");
            Error::reflection(format!(
                "unknown rule '{}' on {}::{}",
                declaration.rule, class, declaration.property
            ))
        })?;
        Rule::new(kind, declaration.options.clone())
    }
}

impl fmt::Debug for ClassMetadataFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMetadataFactory")
            .field("kinds", &self.kinds.len())
            .field("cached", &self.cache.len())
            .finish()
    }
}
