//! Metadata-driven value filtering.
//!
//! Entities declare, per property, an ordered chain of [`Rule`]s. A
//! [`FilterEngine`] looks up those declarations through a
//! [`ClassMetadataFactory`], resolves each rule to a [`Filter`] through a
//! [`FilterLoader`] and writes the transformed values back.
//!
//! # Core Types
//!
//! - [`Rule`]: Immutable transformation step, validated against its [`RuleKind`]
//! - [`Filterable`]: Property read/write access an entity exposes to the engine
//! - [`ClassMetadata`]: Which rules apply to which properties of one class
//! - [`Filter`]: Executes one rule against one value
//! - [`FilterEngine`]: Filters whole entities, single properties or bare values
//!
//! Rule declarations come either from the entity itself
//! ([`Filterable::rule_declarations`]) or from a JSON [`RuleMap`].
//!
//! # Examples
//!
//! ```
//! use rulefilter::{Error, FilterEngine, Filterable, RuleDeclaration, Value};
//!
//! struct Comment {
//!     body: String,
//! }
//!
//! impl Filterable for Comment {
//!     fn property_names() -> &'static [&'static str] {
//!         &["body"]
//!     }
//!
//!     fn rule_declarations() -> Vec<RuleDeclaration> {
//!         vec![
//!             RuleDeclaration::new("body", "strip_newlines"),
//!             RuleDeclaration::new("body", "trim"),
//!         ]
//!     }
//!
//!     fn get_property(&self, name: &str) -> Option<Value> {
//!         (name == "body").then(|| Value::from(self.body.clone()))
//!     }
//!
//!     fn set_property(&mut self, name: &str, value: Value) -> Result<(), Error> {
//!         match (name, value) {
//!             ("body", Value::String(body)) => {
//!                 self.body = body;
//!                 Ok(())
//!             }
//!             _ => Err(Error::reflection(format!("cannot set Comment::{}", name))),
//!         }
//!     }
//! }
//!
//! let engine = FilterEngine::builtin();
//! let mut comment = Comment { body: "  first\nline  ".to_string() };
//!
//! engine.filter_entity(&mut comment).expect("rules resolve");
//! assert_eq!(comment.body, "firstline");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod entity;
mod error;
mod filter;
pub mod filters;
mod loader;
mod mapping;
mod rule;
mod walker;

#[cfg(test)]
mod test_utils;

pub use engine::{FilterEngine, FilterEngineBuilder, Rules};
pub use entity::{ClassId, Filterable};
pub use error::{Error, ErrorKind};
pub use filter::{filter_fn, Filter, FnFilter};
pub use loader::{FilterLoader, FilterRegistry};
pub use mapping::{
    ClassMetadata, ClassMetadataFactory, DeclaredRules, MetadataCache, PropertyRuleProvider,
    RuleDeclaration, RuleMap,
};
pub use rule::{Rule, RuleArgs, RuleKind, RuleKinds};
pub use walker::ObjectWalker;

pub use serde_json::Value;
