//! Class metadata: which rules apply to which properties of which class.
//!
//! This module provides:
//! - `PropertyRuleProvider`: source of rule declarations for a class
//! - `DeclaredRules`: provider reading declarations from [`Filterable`](crate::Filterable)
//! - `RuleMap`: provider reading declarations from a JSON document
//! - `ClassMetadata`: per-class map of property to ordered rule chain
//! - `MetadataCache`: shared, thread-safe store of built metadata
//! - `ClassMetadataFactory`: builds metadata on first request and caches it
//!
//! Metadata is immutable once built. Rebuilding a class means invalidating
//! its cache entry and requesting it again.

mod cache;
mod config;
mod factory;
mod metadata;
mod provider;

pub use cache::MetadataCache;
pub use config::RuleMap;
pub use factory::ClassMetadataFactory;
pub use metadata::ClassMetadata;
pub use provider::{DeclaredRules, PropertyRuleProvider, RuleDeclaration};
