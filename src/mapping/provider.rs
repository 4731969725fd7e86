use serde::Deserialize;

use crate::entity::ClassId;
use crate::error::Error;
use crate::rule::RuleArgs;

/// One rule attached to one property, as declared by a metadata source.
///
/// This is the unvalidated form of a [`Rule`](crate::Rule): the rule kind is
/// only a name and the arguments are raw. [`ClassMetadataFactory`] resolves
/// and validates declarations when it builds metadata.
///
/// [`ClassMetadataFactory`]: crate::ClassMetadataFactory
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDeclaration {
    /// Property the rule is attached to.
    pub property: String,
    /// Rule kind name.
    pub rule: String,
    /// Raw rule arguments.
    #[serde(default)]
    pub options: RuleArgs,
}

impl RuleDeclaration {
    /// Declares a rule without arguments.
    pub fn new(property: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            rule: rule.into(),
            options: RuleArgs::None,
        }
    }

    /// Sets the raw arguments of the declaration.
    pub fn with_options(mut self, options: impl Into<RuleArgs>) -> Self {
        self.options = options.into();
        self
    }
}

/// Source of rule declarations for a class.
///
/// Implementations yield `(property, rule kind, raw arguments)` triples in
/// declaration order. How they are authored (trait methods, configuration
/// files, generated code) is up to the provider.
///
/// # Errors
///
/// A provider that cannot describe a class returns
/// [`ErrorKind::ReflectionFailure`](crate::ErrorKind::ReflectionFailure).
/// An empty list means the class has no filtered properties.
pub trait PropertyRuleProvider: Send + Sync {
    /// Returns the rule declarations for `class`, in declaration order.
    fn declarations(&self, class: &ClassId) -> Result<Vec<RuleDeclaration>, Error>;
}

/// Provider reading rules declared in code via
/// [`Filterable::rule_declarations`](crate::Filterable::rule_declarations).
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredRules;

impl PropertyRuleProvider for DeclaredRules {
    fn declarations(&self, class: &ClassId) -> Result<Vec<RuleDeclaration>, Error> {
        Ok(class.declared_rules())
    }
}
