//! Membership validation against a fixed value set.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{kind, ErrorNode};

use super::chain::Chain;
use super::gate::{Gate, GateResult};
use super::named;
use super::traits::{Validate, Validated};

/// Validates that a value is a member of a fixed set.
///
/// Membership is by structural equality, so the set may mix types —
/// `[json!("auto"), json!(0), json!(false)]` is a valid set.
pub struct EnumValidator {
    name: Option<String>,
    gate: Gate,
    chain: Chain,
    allowed: Vec<Value>,
}

impl EnumValidator {
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        let allowed: Vec<Value> = values.into_iter().collect();
        if allowed.is_empty() {
            panic!("EnumValidator requires at least one enumeration value.");
        }
        Self {
            name: None,
            gate: Gate::None,
            chain: Chain::new(),
            allowed,
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
}

impl Validate for EnumValidator {
    fn validate(&self, value: &Value) -> Validated {
        let name = self.name.as_deref();
        let value = match self.gate.check(value, name) {
            GateResult::Proceed(v) => v,
            GateResult::Short(result) => return result,
        };

        if !self.allowed.contains(&value) {
            return Validation::Failure(named(
                ErrorNode::invalid(kind::ENUM, "Invalid value."),
                name,
            ));
        }

        match self.chain.run(value, name) {
            Ok(v) => Validation::Success(Some(v)),
            Err(err) => Validation::Failure(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_membership() {
        let v = EnumValidator::new([json!("red"), json!("green"), json!(7)]);
        assert!(matches!(
            v.validate(&json!("red")),
            Validation::Success(Some(_))
        ));
        assert!(matches!(v.validate(&json!(7)), Validation::Success(Some(_))));

        match v.validate(&json!("blue")) {
            Validation::Failure(err) => {
                assert_eq!(err.kind(), kind::ENUM);
                assert_eq!(err.message(), "Invalid value.");
            }
            Validation::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_equality_is_structural() {
        // Distinct types never compare equal.
        let v = EnumValidator::new([json!("1")]);
        assert!(matches!(v.validate(&json!(1)), Validation::Failure(_)));
    }

    #[test]
    #[should_panic]
    fn test_empty_set_panics() {
        let _ = EnumValidator::new(Vec::<Value>::new());
    }

    #[test]
    fn test_optional_empty_is_absent() {
        let v = EnumValidator::new([json!("x")]).optional();
        match v.validate(&Value::Null) {
            Validation::Success(absent) => assert!(absent.is_none()),
            Validation::Failure(_) => panic!("expected absent"),
        }
    }
}
