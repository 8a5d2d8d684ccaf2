//! The validation contract.

use serde_json::Value;
use stillwater::Validation;

use crate::error::ErrorNode;

/// The outcome of validating one value.
///
/// `Success(Some(v))` carries the coerced output, `Success(None)` means the
/// value was absent and acceptably so (an optional or conditional field left
/// empty), and `Failure` carries the error tree.
pub type Validated = Validation<Option<Value>, ErrorNode>;

/// A validator over untrusted input.
///
/// Implementors take a borrowed input value and produce a [`Validated`]
/// outcome. Container validators (objects, arrays) additionally support
/// *partial validity*: [`accumulator`](Validate::accumulator) hands out an
/// empty container and [`validate_into`](Validate::validate_into) fills it
/// with the children that did pass, so a caller holding a failure still
/// knows which parts of the input were fine.
pub trait Validate: Send + Sync {
    /// Validates `value`, producing the coerced output or an error tree.
    fn validate(&self, value: &Value) -> Validated;

    /// Validates `value`, writing partial output into `out`.
    ///
    /// Scalar validators have no partial output; the default implementation
    /// ignores `out` and delegates to [`validate`](Validate::validate).
    fn validate_into(&self, value: &Value, out: &mut Value) -> Validated {
        let _ = out;
        self.validate(value)
    }

    /// Returns an empty accumulator for partial output, or `None` for
    /// validators without one.
    fn accumulator(&self) -> Option<Value> {
        None
    }
}

impl<V: Validate + ?Sized> Validate for Box<V> {
    fn validate(&self, value: &Value) -> Validated {
        (**self).validate(value)
    }

    fn validate_into(&self, value: &Value, out: &mut Value) -> Validated {
        (**self).validate_into(value, out)
    }

    fn accumulator(&self) -> Option<Value> {
        (**self).accumulator()
    }
}

/// Wraps a validator into a plain closure.
///
/// Useful for handing a configured validator to code that expects a
/// function rather than a trait object.
pub fn validator_fn<V: Validate>(validator: V) -> impl Fn(&Value) -> Validated + Send + Sync {
    move |value| validator.validate(value)
}
