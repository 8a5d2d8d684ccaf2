//! Object validation with per-field recursion.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::{kind, ErrorNode};
use crate::path::{is_valid_field_name, FieldPath};

use super::gate::{Gate, GateResult};
use super::named;
use super::traits::{Validate, Validated};

/// How an object validator treats input keys with no declared validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Unknown keys are errors (`NO_VALIDATION`).
    Strict,
    /// Unknown keys are copied through to the output untouched.
    Lenient,
}

/// Validates objects with a validator per declared field.
///
/// Field failures do not short-circuit: every declared field is validated
/// (absent fields are presented to their validator as null) and all
/// failures are collected into one error tree. Nested object and array
/// failures are additionally flattened into dotted paths on the root.
///
/// With no explicit strictness, a validator with declared fields is strict
/// and a field-less one is lenient.
pub struct ObjectValidator {
    name: Option<String>,
    gate: Gate,
    fields: IndexMap<String, Box<dyn Validate>>,
    strictness: Option<Strictness>,
}

impl ObjectValidator {
    pub fn new() -> Self {
        Self {
            name: None,
            gate: Gate::None,
            fields: IndexMap::new(),
            strictness: None,
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

    /// Declares a field and the validator applied to it.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty, contains a period, or begins with an
    /// underscore (the reserved identity fields `_id` and `__v` excepted).
    pub fn field(mut self, name: impl Into<String>, validator: impl Validate + 'static) -> Self {
        let name = name.into();
        if !is_valid_field_name(&name) {
            panic!(
                "ObjectValidator field cannot be empty, begin with an underscore, \
                 or contain a period: {:?}",
                name
            );
        }
        self.fields.insert(name, Box::new(validator));
        self
    }

    /// Makes unknown input keys errors. Overrides any lenient setting.
    pub fn strict(mut self) -> Self {
        self.strictness = Some(Strictness::Strict);
        self
    }

    /// Makes unknown input keys copy through, unless strictness was already
    /// requested — strict always wins.
    pub fn lenient(mut self) -> Self {
        if self.strictness.is_none() {
            self.strictness = Some(Strictness::Lenient);
        }
        self
    }

    fn effective_strictness(&self) -> Strictness {
        self.strictness.unwrap_or(if self.fields.is_empty() {
            Strictness::Lenient
        } else {
            Strictness::Strict
        })
    }
}

impl Default for ObjectValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validate for ObjectValidator {
    fn validate(&self, value: &Value) -> Validated {
        let mut out = Value::Object(Map::new());
        self.validate_into(value, &mut out)
    }

    fn validate_into(&self, value: &Value, out: &mut Value) -> Validated {
        let name = self.name.as_deref();
        let value = match self.gate.check(value, name) {
            GateResult::Proceed(v) => v,
            GateResult::Short(result) => return result,
        };

        let Some(input) = value.as_object() else {
            return Validation::Failure(named(
                ErrorNode::invalid(kind::TYPE_OBJECT, "Value must be an object."),
                name,
            ));
        };

        // Objects carry no transform chain, so the seed is always the
        // generic aggregate.
        let mut seed = named(
            ErrorNode::invalid(kind::OBJECT_FIELDS, "Please check the following values:"),
            name,
        )
        .generic();

        if !out.is_object() {
            *out = Value::Object(Map::new());
        }

        for (field, validator) in &self.fields {
            let item = input.get(field).cloned().unwrap_or(Value::Null);
            match validator.accumulator() {
                Some(mut acc) => match validator.validate_into(&item, &mut acc) {
                    Validation::Success(Some(v)) => set_field(out, field, v),
                    Validation::Success(None) => {}
                    Validation::Failure(err) => {
                        // Containers that failed per-child keep their
                        // partially valid accumulator.
                        let partial = err.kind() == kind::OBJECT_FIELDS
                            || err.kind() == kind::ARRAY_FIELDS;
                        seed = seed.combine_path(FieldPath::field(field), err);
                        if partial {
                            set_field(out, field, acc);
                        }
                    }
                },
                None => match validator.validate(&item) {
                    Validation::Success(Some(v)) => set_field(out, field, v),
                    Validation::Success(None) => {}
                    Validation::Failure(err) => {
                        seed = seed.combine_path(FieldPath::field(field), err);
                    }
                },
            }
        }

        match self.effective_strictness() {
            Strictness::Strict => {
                for key in input.keys() {
                    if self.fields.contains_key(key) {
                        continue;
                    }
                    // Unknown keys stay single path segments even when they
                    // contain periods; they name input, not structure.
                    seed = seed.combine_path(
                        FieldPath::field(key),
                        ErrorNode::invalid(kind::NO_VALIDATION, "Field has no validation defined.")
                            .with_friendly_name(key),
                    );
                }
            }
            Strictness::Lenient => {
                for (key, item) in input {
                    if self.fields.contains_key(key) {
                        continue;
                    }
                    set_field(out, key, item.clone());
                }
            }
        }

        if !seed.fields().is_empty() {
            return Validation::Failure(seed);
        }
        Validation::Success(Some(std::mem::take(out)))
    }

    fn accumulator(&self) -> Option<Value> {
        Some(Value::Object(Map::new()))
    }
}

fn set_field(out: &mut Value, field: &str, value: Value) {
    if let Some(map) = out.as_object_mut() {
        map.insert(field.to_string(), value);
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

    fn field<'a>(tree: &'a ErrorNode, path: &str) -> &'a ErrorNode {
        tree.fields()
            .get(&FieldPath::parse(path).unwrap())
            .unwrap_or_else(|| panic!("no field at {}", path))
    }

    #[test]
    fn test_type_check() {
        let v = ObjectValidator::new();
        for value in [json!("nope"), json!([1, 2]), json!(5)] {
            let e = err(v.validate(&value));
            assert_eq!(e.kind(), kind::TYPE_OBJECT);
            assert_eq!(e.message(), "Value must be an object.");
        }
    }

    #[test]
    fn test_all_field_failures_collected() {
        let v = ObjectValidator::new()
            .field("name", Validator::string().required())
            .field("age", Validator::number());

        let e = err(v.validate(&json!({"name": "", "age": "x"})));
        assert_eq!(e.kind(), kind::OBJECT_FIELDS);
        assert_eq!(e.fields().len(), 2);
        assert_eq!(field(&e, "name").kind(), kind::REQUIRED);
        assert_eq!(field(&e, "age").kind(), kind::TYPE_NUMBER);
    }

    #[test]
    fn test_absent_fields_are_presented_as_null() {
        let v = ObjectValidator::new().field("name", Validator::string().required());
        let e = err(v.validate(&json!({})));
        assert_eq!(field(&e, "name").kind(), kind::REQUIRED);

        // An optional absent field produces neither error nor output entry.
        let v = ObjectValidator::new().field("nick", Validator::string().optional());
        match v.validate(&json!({})) {
            Validation::Success(Some(out)) => assert_eq!(out, json!({})),
            _ => panic!("expected success"),
        }
    }

    #[test]
    fn test_declared_fields_default_strict() {
        let v = ObjectValidator::new().field("a", Validator::string().optional());
        let e = err(v.validate(&json!({"b": 1})));

        let unknown = field(&e, "b");
        assert_eq!(unknown.kind(), kind::NO_VALIDATION);
        assert_eq!(unknown.message(), "Field has no validation defined.");
        assert_eq!(unknown.friendly_name(), Some("b"));
    }

    #[test]
    fn test_no_fields_default_lenient() {
        let v = ObjectValidator::new();
        match v.validate(&json!({"anything": [1, 2]})) {
            Validation::Success(Some(out)) => assert_eq!(out, json!({"anything": [1, 2]})),
            _ => panic!("expected success"),
        }
    }

    #[test]
    fn test_strict_wins_over_lenient() {
        let v = ObjectValidator::new().lenient().strict();
        assert!(matches!(
            v.validate(&json!({"x": 1})),
            Validation::Failure(_)
        ));

        // lenient() after strict() does not downgrade.
        let v = ObjectValidator::new().strict().lenient();
        assert!(matches!(
            v.validate(&json!({"x": 1})),
            Validation::Failure(_)
        ));
    }

    #[test]
    fn test_lenient_copies_only_unknown_keys() {
        let v = ObjectValidator::new()
            .field("n", Validator::number())
            .lenient();

        let e = err(v.validate(&json!({"n": "x", "extra": true})));
        assert_eq!(field(&e, "n").kind(), kind::TYPE_NUMBER);

        let mut out = Value::Object(Map::new());
        let _ = v.validate_into(&json!({"n": "x", "extra": true}), &mut out);
        // The failed declared field is not copied through raw.
        assert_eq!(out, json!({"extra": true}));
    }

    #[test]
    fn test_unknown_dotted_key_stays_one_segment() {
        let v = ObjectValidator::new().field("a", Validator::string().optional());
        let e = err(v.validate(&json!({"weird.key": 1})));

        let paths: Vec<String> = e.fields().keys().map(ToString::to_string).collect();
        assert_eq!(paths, vec!["weird.key"]);
        assert_eq!(e.fields().keys().next().map(FieldPath::len), Some(1));
    }

    #[test]
    fn test_nested_failures_flatten_into_dotted_paths() {
        let inner = ObjectValidator::new().field("s", Validator::string().uppercase());
        let v = ObjectValidator::new()
            .field("o", inner)
            .field("s", Validator::string().lowercase());

        let input = json!({"s": "Hello", "o": {"s": "hello", "bad": "x"}});
        let mut out = Value::Object(Map::new());
        let e = err(v.validate_into(&input, &mut out));

        assert_eq!(e.kind(), kind::OBJECT_FIELDS);
        assert_eq!(field(&e, "o").kind(), kind::OBJECT_FIELDS);
        assert_eq!(field(&e, "o.bad").kind(), kind::NO_VALIDATION);

        // Partial validity: everything that passed is in the accumulator.
        assert_eq!(out, json!({"s": "hello", "o": {"s": "HELLO"}}));
    }

    #[test]
    #[should_panic]
    fn test_field_name_with_period_panics() {
        let _ = ObjectValidator::new().field("a.b", Validator::string());
    }

    #[test]
    #[should_panic]
    fn test_field_name_with_underscore_panics() {
        let _ = ObjectValidator::new().field("_private", Validator::string());
    }

    #[test]
    fn test_reserved_identity_fields_allowed() {
        let v = ObjectValidator::new()
            .field("_id", Validator::string().optional())
            .field("__v", Validator::number().optional());
        assert!(matches!(v.validate(&json!({})), Validation::Success(_)));
    }
}
