//! Built-in rule kinds and the filters that execute them.
//!
//! | Rule | Default option | Effect |
//! |---|---|---|
//! | `boolean` | | truthiness coercion |
//! | `trim` | `charlist` | strip whitespace or the given characters from both ends |
//! | `to_lower`, `to_upper` | | Unicode case mapping |
//! | `strip_newlines` | | remove `\r` and `\n` |
//! | `alpha`, `alnum`, `digits` | `allow_whitespace` | keep only letters, letters and digits, or digits |
//! | `int`, `float` | | numeric coercion |
//! | `regexp` | `pattern` | replace every match of `pattern` with `replacement` |
//!
//! String filters return non-string input unchanged.

mod boolean;
mod chars;
mod numeric;
mod regexp;
mod text;

pub use boolean::{is_truthy, BooleanScalar};
pub use chars::{Alnum, Alpha, Digits};
pub use numeric::{Float, Int};
pub use regexp::RegExp;
pub use text::{StripNewlines, ToLower, ToUpper, Trim};

use crate::loader::FilterRegistry;
use crate::rule::RuleKind;

/// Truthiness coercion.
pub const BOOLEAN: RuleKind = RuleKind::new("boolean");

/// Trims whitespace, or the characters of `charlist`, from both ends.
pub const TRIM: RuleKind = RuleKind::new("trim")
    .with_default_option("charlist")
    .with_options(&["charlist"]);

/// Lowercases strings.
pub const TO_LOWER: RuleKind = RuleKind::new("to_lower");

/// Uppercases strings.
pub const TO_UPPER: RuleKind = RuleKind::new("to_upper");

/// Removes carriage returns and line feeds.
pub const STRIP_NEWLINES: RuleKind = RuleKind::new("strip_newlines");

/// Keeps alphabetic characters (and whitespace unless disabled).
pub const ALPHA: RuleKind = RuleKind::new("alpha")
    .with_default_option("allow_whitespace")
    .with_options(&["allow_whitespace"]);

/// Keeps alphanumeric characters (and whitespace unless disabled).
pub const ALNUM: RuleKind = RuleKind::new("alnum")
    .with_default_option("allow_whitespace")
    .with_options(&["allow_whitespace"]);

/// Keeps decimal digits (and whitespace if enabled).
pub const DIGITS: RuleKind = RuleKind::new("digits")
    .with_default_option("allow_whitespace")
    .with_options(&["allow_whitespace"]);

/// Integer coercion.
pub const INT: RuleKind = RuleKind::new("int");

/// Float coercion.
pub const FLOAT: RuleKind = RuleKind::new("float");

/// Regular expression replacement. Requires `pattern`.
pub const REGEXP: RuleKind = RuleKind::new("regexp")
    .with_default_option("pattern")
    .with_options(&["pattern", "replacement"])
    .with_required_options(&["pattern"]);

/// Every built-in rule kind.
pub const BUILTIN_KINDS: &[RuleKind] = &[
    BOOLEAN,
    TRIM,
    TO_LOWER,
    TO_UPPER,
    STRIP_NEWLINES,
    ALPHA,
    ALNUM,
    DIGITS,
    INT,
    FLOAT,
    REGEXP,
];

pub(crate) fn register_builtin(registry: &mut FilterRegistry) {
    registry
        .register(BOOLEAN.name(), BooleanScalar)
        .register(TRIM.name(), Trim)
        .register(TO_LOWER.name(), ToLower)
        .register(TO_UPPER.name(), ToUpper)
        .register(STRIP_NEWLINES.name(), StripNewlines)
        .register(ALPHA.name(), Alpha)
        .register(ALNUM.name(), Alnum)
        .register(DIGITS.name(), Digits)
        .register(INT.name(), Int)
        .register(FLOAT.name(), Float)
        .register(REGEXP.name(), RegExp);
}
