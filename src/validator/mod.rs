//! The validator engine.
//!
//! Validators are built from the [`Validator`] factory, configured through
//! builder methods, and run through the [`Validate`] trait:
//!
//! ```rust
//! use serde_json::json;
//! use stillwater::Validation;
//! use trellis::{Validate, Validator};
//!
//! let username = Validator::string().trim().lowercase().length(3, 20).required();
//! match username.validate(&json!("  Gandalf ")) {
//!     Validation::Success(Some(v)) => assert_eq!(v, json!("gandalf")),
//!     _ => panic!("expected success"),
//! }
//! ```
//!
//! Each typed validator runs a [`Gate`] (required/optional/conditional), a
//! type check with coercion, and then its [`Chain`] of transform steps in
//! declaration order, stopping at the first failure. Object and array
//! validators recurse and report *all* child failures in one error tree.

mod array;
mod boolean;
mod chain;
mod date;
mod enumeration;
mod gate;
mod number;
mod object;
mod string;
mod traits;

pub use array::ArrayValidator;
pub use boolean::BooleanValidator;
pub use chain::Chain;
pub use date::{DateValidator, TimeRef};
pub use enumeration::EnumValidator;
pub use gate::Gate;
pub use number::NumberValidator;
pub use object::{ObjectValidator, Strictness};
pub use string::StringValidator;
pub use traits::{validator_fn, Validate, Validated};

use serde_json::Value;

use crate::error::ErrorNode;

/// Factory for the typed validators.
pub struct Validator;

impl Validator {
    /// A validator for string values.
    pub fn string() -> StringValidator {
        StringValidator::new()
    }

    /// A validator for numbers, coercing numeric strings.
    pub fn number() -> NumberValidator {
        NumberValidator::new()
    }

    /// A validator for booleans, coercing `"true"`/`"false"` and 0/1/-1.
    pub fn boolean() -> BooleanValidator {
        BooleanValidator::new()
    }

    /// A validator for dates, coercing common formats to RFC 3339 strings.
    pub fn date() -> DateValidator {
        DateValidator::new()
    }

    /// A validator accepting only members of the given value set.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn enumeration(values: impl IntoIterator<Item = Value>) -> EnumValidator {
        EnumValidator::new(values)
    }

    /// A validator for arrays, optionally applying an element validator.
    pub fn array() -> ArrayValidator {
        ArrayValidator::new()
    }

    /// A validator for objects with per-field validators.
    pub fn object() -> ObjectValidator {
        ObjectValidator::new()
    }
}

/// Attaches the validator's display name to an error, when one is set.
pub(crate) fn named(node: ErrorNode, name: Option<&str>) -> ErrorNode {
    match name {
        Some(n) => node.with_friendly_name(n),
        None => node,
    }
}
