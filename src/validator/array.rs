//! Array validation with per-element recursion.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{kind, ErrorNode};
use crate::path::FieldPath;

use super::chain::Chain;
use super::gate::{Gate, GateResult};
use super::named;
use super::traits::{Validate, Validated};

/// Validates arrays, optionally running an element validator over every
/// entry.
///
/// Element failures do not short-circuit: every element is validated and
/// all failures are collected into one error tree, keyed by decimal index.
/// Elements that passed are still written into the accumulator, so callers
/// holding a failure know which entries were fine.
pub struct ArrayValidator {
    name: Option<String>,
    gate: Gate,
    chain: Chain,
    element: Option<Box<dyn Validate>>,
}

impl ArrayValidator {
    pub fn new() -> Self {
        Self {
            name: None,
            gate: Gate::None,
            chain: Chain::new(),
            element: None,
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

    /// Sets the validator applied to every element.
    pub fn of(mut self, element: impl Validate + 'static) -> Self {
        self.element = Some(Box::new(element));
        self
    }

    /// Requires the element count to fall within `min..=max`.
    ///
    /// # Panics
    ///
    /// Panics if `max` is less than `min`.
    pub fn length(mut self, min: usize, max: usize) -> Self {
        if max < min {
            panic!("ArrayValidator::length() invalid bounds.");
        }
        self.chain.add(move |value, name| {
            let count = value.as_array().map(Vec::len).unwrap_or(0);
            if count < min {
                return Err(named(
                    ErrorNode::invalid(kind::LENGTH_MIN, "Not enough values."),
                    name,
                ));
            }
            if count > max {
                return Err(named(
                    ErrorNode::invalid(kind::LENGTH_MAX, "Too many values."),
                    name,
                ));
            }
            Ok(value)
        });
        self
    }

    /// Requires the element count to be at most `max`.
    pub fn max_length(self, max: usize) -> Self {
        self.length(0, max)
    }
}

impl Default for ArrayValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validate for ArrayValidator {
    fn validate(&self, value: &Value) -> Validated {
        let mut out = Value::Array(Vec::new());
        self.validate_into(value, &mut out)
    }

    fn validate_into(&self, value: &Value, out: &mut Value) -> Validated {
        let name = self.name.as_deref();
        let value = match self.gate.check(value, name) {
            GateResult::Proceed(v) => v,
            GateResult::Short(result) => return result,
        };

        if !value.is_array() {
            return Validation::Failure(named(
                ErrorNode::invalid(kind::TYPE_ARRAY, "Value must be an Array."),
                name,
            ));
        }

        // Without an element validator only the chain applies and the input
        // passes through as-is.
        let Some(element) = &self.element else {
            return match self.chain.run(value, name) {
                Ok(v) => Validation::Success(Some(v)),
                Err(err) => Validation::Failure(err),
            };
        };

        // A chain failure still becomes the root the element errors attach
        // to, and is returned even when no element fails.
        let (mut seed, from_chain) = match self.chain.run(value.clone(), name) {
            Ok(_) => (
                named(
                    ErrorNode::invalid(kind::ARRAY_FIELDS, "Please check the following values:"),
                    name,
                )
                .generic(),
                false,
            ),
            Err(err) => (err, true),
        };

        if !out.is_array() {
            *out = Value::Array(Vec::new());
        }

        let items = value.as_array().cloned().unwrap_or_default();
        for (index, item) in items.iter().enumerate() {
            match element.accumulator() {
                Some(mut acc) => match element.validate_into(item, &mut acc) {
                    Validation::Success(Some(v)) => set_index(out, index, v),
                    Validation::Success(None) => {}
                    Validation::Failure(err) => {
                        // Containers that failed per-child keep their
                        // partially valid accumulator.
                        let partial = err.kind() == kind::OBJECT_FIELDS
                            || err.kind() == kind::ARRAY_FIELDS;
                        seed = seed.combine_path(FieldPath::index(index), err);
                        if partial {
                            set_index(out, index, acc);
                        }
                    }
                },
                None => match element.validate(item) {
                    Validation::Success(Some(v)) => set_index(out, index, v),
                    Validation::Success(None) => {}
                    Validation::Failure(err) => {
                        seed = seed.combine_path(FieldPath::index(index), err);
                    }
                },
            }
        }

        if from_chain || !seed.fields().is_empty() {
            return Validation::Failure(seed);
        }
        Validation::Success(Some(std::mem::take(out)))
    }

    fn accumulator(&self) -> Option<Value> {
        Some(Value::Array(Vec::new()))
    }
}

// Writes at an index, padding holes with null so earlier failures do not
// shift later successes.
fn set_index(out: &mut Value, index: usize, value: Value) {
    if let Some(entries) = out.as_array_mut() {
        while entries.len() <= index {
            entries.push(Value::Null);
        }
        entries[index] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;
    use serde_json::json;

    fn err(result: Validated) -> ErrorNode {
        match result {
            Validation::Failure(err) => err,
            Validation::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_type_check() {
        let v = ArrayValidator::new();
        assert_eq!(err(v.validate(&json!("nope"))).kind(), kind::TYPE_ARRAY);
        assert_eq!(
            err(v.validate(&json!("nope"))).message(),
            "Value must be an Array."
        );
    }

    #[test]
    fn test_no_element_validator_passes_input_through() {
        let v = ArrayValidator::new();
        match v.validate(&json!([1, "two", null])) {
            Validation::Success(Some(out)) => assert_eq!(out, json!([1, "two", null])),
            _ => panic!("expected success"),
        }
    }

    #[test]
    fn test_length() {
        let v = ArrayValidator::new().length(1, 2);
        assert_eq!(err(v.validate(&json!([]))).kind(), kind::LENGTH_MIN);
        assert_eq!(err(v.validate(&json!([1, 2, 3]))).kind(), kind::LENGTH_MAX);
        assert!(matches!(
            v.validate(&json!([1])),
            Validation::Success(Some(_))
        ));
    }

    #[test]
    fn test_elements_collected_not_short_circuited() {
        let v = ArrayValidator::new().of(Validator::string());
        let e = err(v.validate(&json!([1, "ok", true])));

        assert_eq!(e.kind(), kind::ARRAY_FIELDS);
        assert_eq!(e.message(), "Please check the following values:");
        assert_eq!(e.fields().len(), 2);
        assert_eq!(
            e.fields().get(&FieldPath::index(0)).map(ErrorNode::kind),
            Some(kind::TYPE_STRING)
        );
        assert_eq!(
            e.fields().get(&FieldPath::index(2)).map(ErrorNode::kind),
            Some(kind::TYPE_STRING)
        );
        // The valid element produced no entry.
        assert!(e.fields().get(&FieldPath::index(1)).is_none());
    }

    #[test]
    fn test_mixed_failure_keys_by_index() {
        let v = ArrayValidator::new().of(Validator::string());
        let e = err(v.validate(&json!(["test", false])));

        assert_eq!(e.fields().len(), 1);
        assert_eq!(
            e.fields().get(&FieldPath::index(1)).map(ErrorNode::kind),
            Some(kind::TYPE_STRING)
        );
    }

    #[test]
    fn test_transformed_elements_in_output() {
        let v = ArrayValidator::new().of(Validator::string().uppercase());
        match v.validate(&json!(["a", "b"])) {
            Validation::Success(Some(out)) => assert_eq!(out, json!(["A", "B"])),
            _ => panic!("expected success"),
        }
    }

    #[test]
    fn test_chain_failure_is_returned_even_with_valid_elements() {
        let v = ArrayValidator::new().of(Validator::string()).max_length(1);
        let e = err(v.validate(&json!(["a", "b"])));
        // Both elements were fine; the chain error is the root.
        assert_eq!(e.kind(), kind::LENGTH_MAX);
        assert!(e.fields().is_empty());
    }

    #[test]
    fn test_chain_failure_carries_element_errors() {
        let v = ArrayValidator::new().of(Validator::string()).max_length(1);
        let e = err(v.validate(&json!(["a", 2])));
        assert_eq!(e.kind(), kind::LENGTH_MAX);
        assert_eq!(e.fields().len(), 1);
    }

    #[test]
    fn test_partial_accumulator_for_nested_objects() {
        let element = Validator::object()
            .field("s", Validator::string().uppercase())
            .field("n", Validator::number());
        let v = ArrayValidator::new().of(element);

        let mut out = Value::Array(Vec::new());
        let e = err(v.validate_into(&json!([{"s": "ok", "n": "x"}]), &mut out));
        assert_eq!(e.kind(), kind::ARRAY_FIELDS);

        // The failing object still left its valid half behind.
        assert_eq!(out, json!([{"s": "OK"}]));
    }

    #[test]
    fn test_holes_are_null_padded() {
        let v = ArrayValidator::new().of(Validator::string());

        let mut out = Value::Array(Vec::new());
        let _ = v.validate_into(&json!([1, "ok"]), &mut out);
        assert_eq!(out, json!([null, "ok"]));
    }

    #[test]
    #[should_panic]
    fn test_length_rejects_inverted_bounds() {
        let _ = ArrayValidator::new().length(3, 1);
    }
}
