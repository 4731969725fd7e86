use std::collections::HashMap;

use crate::rule::Rule;

/// Rules attached to the properties of one class.
///
/// Property order is the class's declaration order and rule order is the
/// declaration order of the rules on each property. Both are application
/// order. Every filtered property has at least one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetadata {
    class_name: &'static str,
    properties: Vec<String>,
    rules: HashMap<String, Vec<Rule>>,
}

impl ClassMetadata {
    pub(crate) fn new(class_name: &'static str) -> Self {
        Self {
            class_name,
            properties: Vec::new(),
            rules: HashMap::new(),
        }
    }

    /// Appends a rule to the chain of `property`.
    pub(crate) fn add_property_rule(&mut self, property: &str, rule: Rule) {
        match self.rules.get_mut(property) {
            Some(chain) => chain.push(rule),
            None => {
                self.properties.push(property.to_string());
                self.rules.insert(property.to_string(), vec![rule]);
            }
        }
    }

    /// Returns the name of the described class.
    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    /// Returns the properties that have at least one rule, in order.
    pub fn filtered_properties(&self) -> &[String] {
        &self.properties
    }

    /// Returns the rule chain of `property`; empty if it has no rules.
    pub fn property_rules(&self, property: &str) -> &[Rule] {
        self.rules.get(property).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if `property` has at least one rule.
    pub fn has_property_rules(&self, property: &str) -> bool {
        self.rules.contains_key(property)
    }

    /// Returns the total number of rules across all properties.
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }
}
