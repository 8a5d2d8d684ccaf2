//! Boolean validation with lenient coercion.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{kind, ErrorNode};

use super::chain::Chain;
use super::gate::{Gate, GateResult};
use super::named;
use super::traits::{Validate, Validated};

/// Validates booleans, coercing common textual and numeric forms.
///
/// Accepted inputs are real booleans, the strings `"true"`/`"false"`
/// (trimmed, any case), and the numbers 1 (true), 0 and -1 (false).
/// The chain runs on the coerced boolean.
pub struct BooleanValidator {
    name: Option<String>,
    gate: Gate,
    chain: Chain,
}

impl BooleanValidator {
    pub fn new() -> Self {
        Self {
            name: None,
            gate: Gate::None,
            chain: Chain::new(),
        }
    }

    /// Sets the display name attached to errors from this validator.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Empty input (null or `""`) fails with a `REQUIRED` error.
    pub fn required(mut self) -> Self {
        self.gate = Gate::Required;
        self
    }

    /// Empty input passes as absent.
    pub fn optional(mut self) -> Self {
        self.gate = Gate::Optional;
        self
    }

    /// Empty input passes as absent; non-empty input fails.
    pub fn conditional(mut self) -> Self {
        self.gate = Gate::Conditional;
        self
    }

    /// Requires the coerced value to be true.
    pub fn force_true(mut self) -> Self {
        self.chain.add(|value, name| {
            if value.as_bool() == Some(true) {
                Ok(Value::Bool(true))
            } else {
                Err(named(
                    ErrorNode::invalid(kind::TRUE, "Value must be true."),
                    name,
                ))
            }
        });
        self
    }

    /// Requires the coerced value to be false.
    pub fn force_false(mut self) -> Self {
        self.chain.add(|value, name| {
            if value.as_bool() == Some(false) {
                Ok(Value::Bool(false))
            } else {
                Err(named(
                    ErrorNode::invalid(kind::FALSE, "Value must be false."),
                    name,
                ))
            }
        });
        self
    }
}

impl Default for BooleanValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validate for BooleanValidator {
    fn validate(&self, value: &Value) -> Validated {
        let name = self.name.as_deref();
        let value = match self.gate.check(value, name) {
            GateResult::Proceed(v) => v,
            GateResult::Short(result) => return result,
        };

        let Some(coerced) = coerce(&value) else {
            return Validation::Failure(named(
                ErrorNode::invalid(kind::TYPE_BOOLEAN, "Value must be boolean."),
                name,
            ));
        };

        match self.chain.run(Value::Bool(coerced), name) {
            Ok(v) => Validation::Success(Some(v)),
            Err(err) => Validation::Failure(err),
        }
    }
}

fn coerce(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 || f == -1.0 => Some(false),
            _ => None,
        },
        _ => None,
    }
}
