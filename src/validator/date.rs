//! Date validation with multi-format parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use stillwater::Validation;

use crate::error::{kind, ErrorNode};

use super::chain::Chain;
use super::gate::{Gate, GateResult};
use super::named;
use super::traits::{Validate, Validated};

/// A point in time to compare against.
///
/// `Now` is resolved at validation time, so a validator built once and run
/// repeatedly always compares against the current clock.
#[derive(Debug, Clone, Copy)]
pub enum TimeRef {
    Now,
    At(DateTime<Utc>),
}

impl TimeRef {
    fn resolve(&self) -> DateTime<Utc> {
        match self {
            TimeRef::Now => Utc::now(),
            TimeRef::At(t) => *t,
        }
    }

    fn default_label(&self, before: bool) -> String {
        match (self, before) {
            (TimeRef::Now, true) => "in the past".to_string(),
            (TimeRef::Now, false) => "in the future".to_string(),
            (TimeRef::At(t), true) => format!("before {}", t.to_rfc3339()),
            (TimeRef::At(t), false) => format!("after {}", t.to_rfc3339()),
        }
    }
}

/// Validates dates, normalizing accepted inputs to RFC 3339 strings.
///
/// Accepted inputs are RFC 3339 strings, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD` strings (read as UTC), and numbers as milliseconds since
/// the Unix epoch. The output is always the canonical RFC 3339 rendering,
/// so downstream code never re-parses ambiguous forms.
pub struct DateValidator {
    name: Option<String>,
    gate: Gate,
    chain: Chain,
}

impl DateValidator {
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

    /// Requires the value to be strictly before `when`.
    pub fn before(self, when: TimeRef) -> Self {
        let label = when.default_label(true);
        self.before_labeled(when, label)
    }

    /// Requires the value to be strictly before `when`, with a custom label
    /// for the error message ("Value must be {label}.").
    pub fn before_labeled(mut self, when: TimeRef, label: impl Into<String>) -> Self {
        let label = label.into();
        self.chain.add(move |value, name| {
            let t = step_date(&value);
            if t >= when.resolve() {
                Err(named(
                    ErrorNode::invalid(kind::TIME_BEFORE, format!("Value must be {}.", label)),
                    name,
                ))
            } else {
                Ok(value)
            }
        });
        self
    }

    /// Requires the value to be at or after `when`.
    pub fn after(self, when: TimeRef) -> Self {
        let label = when.default_label(false);
        self.after_labeled(when, label)
    }

    /// Requires the value to be at or after `when`, with a custom label for
    /// the error message ("Value must be {label}.").
    pub fn after_labeled(mut self, when: TimeRef, label: impl Into<String>) -> Self {
        let label = label.into();
        self.chain.add(move |value, name| {
            let t = step_date(&value);
            if t < when.resolve() {
                Err(named(
                    ErrorNode::invalid(kind::TIME_AFTER, format!("Value must be {}.", label)),
                    name,
                ))
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
    /// Panics if `ranges` is empty or any range has a min after its max.
    pub fn range(mut self, ranges: &[(DateTime<Utc>, DateTime<Utc>)]) -> Self {
        if ranges.is_empty() {
            panic!("DateValidator::range() requires at least one range.");
        }
        for &(min, max) in ranges {
            if min > max {
                panic!("DateValidator::range() min value is greater than max value.");
            }
        }
        let ranges = ranges.to_vec();
        self.chain.add(move |value, name| {
            let t = step_date(&value);
            if ranges.iter().any(|&(min, max)| t >= min && t <= max) {
                Ok(value)
            } else {
                Err(named(
                    ErrorNode::invalid(
                        kind::RANGE,
                        format!(
                            "Value outside allowed range{}.",
                            if ranges.len() > 1 { "s" } else { "" }
                        ),
                    ),
                    name,
                ))
            }
        });
        self
    }
}

impl Default for DateValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validate for DateValidator {
    fn validate(&self, value: &Value) -> Validated {
        let name = self.name.as_deref();
        let value = match self.gate.check(value, name) {
            GateResult::Proceed(v) => v,
            GateResult::Short(result) => return result,
        };

        let Some(parsed) = coerce(&value) else {
            return Validation::Failure(named(
                ErrorNode::invalid(kind::TYPE_DATE, "Value must be a valid date."),
                name,
            ));
        };

        match self.chain.run(Value::String(parsed.to_rfc3339()), name) {
            Ok(v) => Validation::Success(Some(v)),
            Err(err) => Validation::Failure(err),
        }
    }
}

fn coerce(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

// Chain steps only ever see canonical RFC 3339 strings; the coercion runs
// first.
fn step_date(value: &Value) -> DateTime<Utc> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}
