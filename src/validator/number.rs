//! Number validation with numeric-string coercion.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{kind, ErrorNode};

use super::chain::Chain;
use super::gate::{Gate, GateResult};
use super::named;
use super::traits::{Validate, Validated};

static REGEX_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]*\.?[0-9]*$").unwrap());

/// Validates numbers, coercing numeric strings.
///
/// A string input is trimmed and parsed when it matches a plain decimal
/// form (`-12`, `3.5`, `.5`); anything else is a `TYPE_NUMBER` failure.
/// Integral strings coerce to integer values, fractional strings to
/// floats. The chain then operates on the coerced number.
pub struct NumberValidator {
    name: Option<String>,
    gate: Gate,
    chain: Chain,
}

impl NumberValidator {
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

    /// Requires the value to have no fractional part.
    pub fn int(mut self) -> Self {
        self.chain.add(|value, name| {
            if as_f64(&value).fract() == 0.0 {
                Ok(value)
            } else {
                Err(fail(kind::INT, "Value must be an integer.", name))
            }
        });
        self
    }

    /// Requires the value to be at least `min`.
    pub fn min(mut self, min: f64) -> Self {
        self.chain.add(move |value, name| {
            if as_f64(&value) < min {
                Err(fail(kind::MIN, "Value too small.", name))
            } else {
                Ok(value)
            }
        });
        self
    }

    /// Requires the value to be at most `max`.
    pub fn max(mut self, max: f64) -> Self {
        self.chain.add(move |value, name| {
            if as_f64(&value) > max {
                Err(fail(kind::MAX, "Value too large.", name))
            } else {
                Ok(value)
            }
        });
        self
    }

    /// Requires the value to fall inside at least one `(min, max)` range,
    /// bounds inclusive.
    ///
    /// # Panics
    ///
    /// Panics if `ranges` is empty, or any range has a non-finite bound or
    /// a min greater than its max.
    pub fn range(mut self, ranges: &[(f64, f64)]) -> Self {
        if ranges.is_empty() {
            panic!("NumberValidator::range() requires at least one range.");
        }
        for &(min, max) in ranges {
            if !min.is_finite() || !max.is_finite() {
                panic!("NumberValidator::range() invalid number argument.");
            }
            if min > max {
                panic!("NumberValidator::range() min value is greater than max value.");
            }
        }
        let ranges = ranges.to_vec();
        self.chain.add(move |value, name| {
            let n = as_f64(&value);
            if ranges.iter().any(|&(min, max)| n >= min && n <= max) {
                Ok(value)
            } else {
                Err(fail(
                    kind::RANGE,
                    format!(
                        "Value outside allowed range{}.",
                        if ranges.len() > 1 { "s" } else { "" }
                    ),
                    name,
                ))
            }
        });
        self
    }
}

impl Default for NumberValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validate for NumberValidator {
    fn validate(&self, value: &Value) -> Validated {
        let name = self.name.as_deref();
        let value = match self.gate.check(value, name) {
            GateResult::Proceed(v) => v,
            GateResult::Short(result) => return result,
        };

        let Some(coerced) = coerce(&value) else {
            return Validation::Failure(named(
                ErrorNode::invalid(kind::TYPE_NUMBER, "Value must be a number."),
                name,
            ));
        };

        match self.chain.run(coerced, name) {
            Ok(v) => Validation::Success(Some(v)),
            Err(err) => Validation::Failure(err),
        }
    }
}

fn coerce(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || !REGEX_NUMBER.is_match(trimmed) {
                return None;
            }
            if let Ok(i) = trimmed.parse::<i64>() {
                return Some(Value::from(i));
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => Some(Value::from(f)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn fail(kind: &str, message: impl Into<String>, name: Option<&str>) -> ErrorNode {
    named(ErrorNode::invalid(kind, message), name)
}

// Chain steps only ever see numbers; the coercion runs first.
fn as_f64(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(validator: &NumberValidator, value: Value) -> Value {
        match validator.validate(&value) {
            Validation::Success(Some(v)) => v,
            Validation::Success(None) => panic!("expected a value, got absent"),
            Validation::Failure(err) => panic!("expected success, got {}", err),
        }
    }

    fn err(validator: &NumberValidator, value: Value) -> ErrorNode {
        match validator.validate(&value) {
            Validation::Failure(err) => err,
            Validation::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_numbers_pass_through() {
        let v = NumberValidator::new();
        assert_eq!(ok(&v, json!(42)), json!(42));
        assert_eq!(ok(&v, json!(-1.5)), json!(-1.5));
    }

    #[test]
    fn test_string_coercion() {
        let v = NumberValidator::new();
        assert_eq!(ok(&v, json!(" 42 ")), json!(42));
        assert_eq!(ok(&v, json!("-7")), json!(-7));
        assert_eq!(ok(&v, json!("3.5")), json!(3.5));
        assert_eq!(ok(&v, json!(".5")), json!(0.5));
    }

    #[test]
    fn test_rejects_non_numeric() {
        let v = NumberValidator::new();
        for value in [
            json!("12abc"),
            json!("1.2.3"),
            json!("-"),
            json!("1e5"),
            json!(true),
            json!([1]),
            Value::Null,
        ] {
            assert_eq!(err(&v, value).kind(), kind::TYPE_NUMBER);
        }
    }

    #[test]
    fn test_int() {
        let v = NumberValidator::new().int();
        assert_eq!(ok(&v, json!(5)), json!(5));
        assert_eq!(ok(&v, json!(5.0)), json!(5.0));
        let e = err(&v, json!(5.5));
        assert_eq!(e.kind(), kind::INT);
        assert_eq!(e.message(), "Value must be an integer.");
    }

    #[test]
    fn test_min_max() {
        let v = NumberValidator::new().min(0.0).max(10.0);
        assert_eq!(ok(&v, json!(0)), json!(0));
        assert_eq!(ok(&v, json!(10)), json!(10));
        assert_eq!(err(&v, json!(-1)).kind(), kind::MIN);
        assert_eq!(err(&v, json!(11)).kind(), kind::MAX);
    }

    #[test]
    fn test_range() {
        let v = NumberValidator::new().range(&[(0.0, 5.0), (10.0, 15.0)]);
        assert_eq!(ok(&v, json!(3)), json!(3));
        assert_eq!(ok(&v, json!(10)), json!(10));

        let e = err(&v, json!(7));
        assert_eq!(e.kind(), kind::RANGE);
        assert_eq!(e.message(), "Value outside allowed ranges.");

        let single = NumberValidator::new().range(&[(0.0, 5.0)]);
        assert_eq!(
            err(&single, json!(7)).message(),
            "Value outside allowed range."
        );
    }

    #[test]
    #[should_panic]
    fn test_range_rejects_empty() {
        let _ = NumberValidator::new().range(&[]);
    }

    #[test]
    #[should_panic]
    fn test_range_rejects_inverted_bounds() {
        let _ = NumberValidator::new().range(&[(5.0, 0.0)]);
    }

    #[test]
    fn test_required_empty_string() {
        let v = NumberValidator::new().required();
        assert_eq!(err(&v, json!("")).kind(), kind::REQUIRED);
        // Zero is not empty.
        assert_eq!(ok(&v, json!(0)), json!(0));
    }

    #[test]
    fn test_chain_runs_on_coerced_value() {
        let v = NumberValidator::new().min(10.0);
        assert_eq!(ok(&v, json!("12")), json!(12));
        assert_eq!(err(&v, json!("9")).kind(), kind::MIN);
    }
}
