//! The required/optional/conditional pre-check.
//!
//! A [`Gate`] runs before a validator's transform chain and decides whether
//! the chain runs at all. "Empty" input is `Null` (which also stands for an
//! absent object field) or the empty string.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{kind, ErrorNode};

use super::named;
use super::traits::Validated;

/// Pre-check applied before a validator's transform chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gate {
    /// No pre-check; the chain always runs and type-checking is the first
    /// chain concern.
    #[default]
    None,
    /// Empty input yields a `REQUIRED` error; otherwise the value passes.
    Required,
    /// Empty input short-circuits to "absent" with no error.
    Optional,
    /// Empty input short-circuits to "absent"; non-empty input yields a
    /// `CONDITIONAL` error — the field must not be set at all.
    Conditional,
}

/// Outcome of running a gate.
pub(crate) enum GateResult {
    /// The value passes through to the type check and chain.
    Proceed(Value),
    /// The gate resolved the validation by itself.
    Short(Validated),
}

impl Gate {
    pub(crate) fn check(&self, value: &Value, name: Option<&str>) -> GateResult {
        let empty = is_empty(value);
        match self {
            Gate::None => GateResult::Proceed(value.clone()),
            Gate::Required => {
                if empty {
                    GateResult::Short(Validation::Failure(named(
                        ErrorNode::invalid(kind::REQUIRED, "Value is required."),
                        name,
                    )))
                } else {
                    GateResult::Proceed(value.clone())
                }
            }
            Gate::Optional => {
                if empty {
                    GateResult::Short(Validation::Success(None))
                } else {
                    GateResult::Proceed(value.clone())
                }
            }
            Gate::Conditional => {
                if empty {
                    GateResult::Short(Validation::Success(None))
                } else {
                    GateResult::Short(Validation::Failure(named(
                        ErrorNode::invalid(kind::CONDITIONAL, "This field should not be set."),
                        name,
                    )))
                }
            }
        }
    }
}

/// The empty-input sentinel: null (also standing for absent) or `""`.
pub(crate) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
