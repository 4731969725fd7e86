use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::Value;

use crate::error::Error;
use crate::mapping::RuleDeclaration;

/// Capability implemented by every type whose properties can be filtered.
///
/// The engine never reaches into a value's fields directly. It reads and
/// writes properties through `get_property`/`set_property`, the same access
/// path any other consumer of the type uses, so setters that maintain
/// derived state keep it consistent.
///
/// Rules attached "by annotation" are returned from [`rule_declarations`].
///
/// [`rule_declarations`]: Filterable::rule_declarations
///
/// # Examples
///
/// ```
/// use rulefilter::{Error, Filterable, RuleDeclaration, Value};
///
/// struct Signup {
///     email: String,
/// }
///
/// impl Filterable for Signup {
///     fn property_names() -> &'static [&'static str] {
///         &["email"]
///     }
///
///     fn rule_declarations() -> Vec<RuleDeclaration> {
///         vec![
///             RuleDeclaration::new("email", "trim"),
///             RuleDeclaration::new("email", "to_lower"),
///         ]
///     }
///
///     fn get_property(&self, name: &str) -> Option<Value> {
///         match name {
///             "email" => Some(Value::from(self.email.clone())),
///             _ => None,
///         }
///     }
///
///     fn set_property(&mut self, name: &str, value: Value) -> Result<(), Error> {
///         match (name, value) {
///             ("email", Value::String(s)) => self.email = s,
///             (name, _) => return Err(Error::reflection(format!("cannot set '{}'", name))),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Filterable: 'static {
    /// Declared properties, in declaration order.
    fn property_names() -> &'static [&'static str]
    where
        Self: Sized;

    /// Rules attached to this type's properties, in declaration order.
    fn rule_declarations() -> Vec<RuleDeclaration>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Class name used by name-keyed metadata sources.
    fn class_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    /// Reads a property. Returns `None` if the property does not exist.
    fn get_property(&self, name: &str) -> Option<Value>;

    /// Writes a property.
    ///
    /// # Errors
    ///
    /// Implementations return [`ErrorKind::ReflectionFailure`](crate::ErrorKind::ReflectionFailure)
    /// when the property does not exist or cannot hold `value`.
    fn set_property(&mut self, name: &str, value: Value) -> Result<(), Error>;
}

/// Identity of a filterable class.
///
/// Equality and hashing use the type's `TypeId`; the name and the captured
/// introspection functions travel with the identity so metadata providers can
/// work from a `ClassId` alone.
#[derive(Clone, Copy)]
pub struct ClassId {
    type_id: TypeId,
    name: &'static str,
    property_names: fn() -> &'static [&'static str],
    declarations: fn() -> Vec<RuleDeclaration>,
}

impl ClassId {
    /// Returns the identity of `T`.
    pub fn of<T: Filterable>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::class_name(),
            property_names: T::property_names,
            declarations: T::rule_declarations,
        }
    }

    /// Returns the class name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the `TypeId` of the class.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the declared properties, in declaration order.
    pub fn property_names(&self) -> &'static [&'static str] {
        (self.property_names)()
    }

    /// Returns `true` if the class declares `property`.
    pub fn has_property(&self, property: &str) -> bool {
        self.property_names().contains(&property)
    }

    pub(crate) fn declared_rules(&self) -> Vec<RuleDeclaration> {
        (self.declarations)()
    }
}

impl PartialEq for ClassId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ClassId {}

impl Hash for ClassId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassId").field("name", &self.name).finish()
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
