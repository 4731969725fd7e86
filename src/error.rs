use std::fmt;

/// Error returned by every fallible operation in this crate.
///
/// Errors carry a [`ErrorKind`] for programmatic matching and a human-readable
/// message naming the rule, class or property involved.
///
/// # Examples
///
/// ```
/// use rulefilter::{Error, ErrorKind};
///
/// let error = Error::unresolvable_filter("shout");
/// assert_eq!(error.kind(), ErrorKind::UnresolvableFilter);
/// assert!(error.message().contains("shout"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    /// Creates a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn missing_required_options(rule: &str, missing: &[&str]) -> Self {
        Self::new(
            ErrorKind::MissingRequiredOption,
            format!(
                "rule '{}' is missing required option(s): {}",
                rule,
                missing.join(", ")
            ),
        )
    }

    pub(crate) fn no_default_option(rule: &str) -> Self {
        Self::new(
            ErrorKind::NoDefaultOptionDefined,
            format!("no default option is configured for rule '{}'", rule),
        )
    }

    pub(crate) fn invalid_options(rule: &str, invalid: &[&str]) -> Self {
        Self::new(
            ErrorKind::InvalidOption,
            format!(
                "rule '{}' does not accept option(s): {}",
                rule,
                invalid.join(", ")
            ),
        )
    }

    /// Creates a [`ErrorKind::ReflectionFailure`] error.
    ///
    /// Exposed so that [`Filterable`](crate::Filterable) implementations can
    /// reject unknown properties or values they cannot hold.
    pub fn reflection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReflectionFailure, message)
    }

    /// Creates a [`ErrorKind::UnresolvableFilter`] error for a rule name.
    pub fn unresolvable_filter(rule: &str) -> Self {
        Self::new(
            ErrorKind::UnresolvableFilter,
            format!("no filter is registered for rule '{}'", rule),
        )
    }

    /// Creates a [`ErrorKind::FilterFailure`] error.
    pub fn filter_failure(rule: &str, message: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::FilterFailure,
            format!("filter for rule '{}' failed: {}", rule, message),
        )
    }

    pub(crate) fn config(message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Config, message.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

/// Kind of filtering error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required option was absent after rule option normalization.
    MissingRequiredOption,
    /// A bare value was supplied to a rule that has no default option.
    NoDefaultOptionDefined,
    /// A named option is not declared by the rule kind.
    InvalidOption,
    /// Class or property introspection could not complete.
    ReflectionFailure,
    /// No filter corresponds to the rule kind.
    UnresolvableFilter,
    /// A filter rejected its input while applying a rule.
    FilterFailure,
    /// Rule configuration could not be read or parsed.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredOption => write!(f, "missing required option"),
            Self::NoDefaultOptionDefined => write!(f, "no default option defined"),
            Self::InvalidOption => write!(f, "invalid option"),
            Self::ReflectionFailure => write!(f, "reflection failure"),
            Self::UnresolvableFilter => write!(f, "unresolvable filter"),
            Self::FilterFailure => write!(f, "filter failure"),
            Self::Config => write!(f, "configuration error"),
        }
    }
}
