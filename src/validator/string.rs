//! String validation and transforms.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{kind, ErrorNode};

use super::chain::Chain;
use super::gate::{Gate, GateResult};
use super::named;
use super::traits::{Validate, Validated};

static REGEX_ALPHA: LazyLock<Regex> = LazyLock::new(|| Regex::new("^[a-zA-Z]*$").unwrap());
static REGEX_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z0-9]*$").unwrap());
static REGEX_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .unwrap()
});
static REGEX_NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new("^[0-9]*$").unwrap());

/// Validates string values.
///
/// Transform steps (such as [`trim`](StringValidator::trim) or
/// [`uppercase`](StringValidator::uppercase)) rewrite the value; check steps
/// fail without changing it. Steps run in declaration order and the first
/// failure wins, so `trim().length(1, 10)` measures the trimmed string.
pub struct StringValidator {
    name: Option<String>,
    gate: Gate,
    chain: Chain,
}

impl StringValidator {
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

    /// Requires every character to be an ASCII letter.
    pub fn alpha(mut self) -> Self {
        self.chain.add(|value, name| {
            if REGEX_ALPHA.is_match(as_str(&value)) {
                Ok(value)
            } else {
                Err(fail(
                    kind::ALPHA,
                    "Value must be only alpha characters.",
                    name,
                ))
            }
        });
        self
    }

    /// Requires every character to be an ASCII letter or digit.
    pub fn alphanumeric(mut self) -> Self {
        self.chain.add(|value, name| {
            if REGEX_ALPHANUMERIC.is_match(as_str(&value)) {
                Ok(value)
            } else {
                Err(fail(
                    kind::ALPHANUMERIC,
                    "Value must be only alphanumeric characters.",
                    name,
                ))
            }
        });
        self
    }

    /// Rejects values containing any of `chars`.
    ///
    /// The error message lists the offending characters once each, escaped
    /// so control characters show up readably.
    ///
    /// # Panics
    ///
    /// Panics if `chars` is empty.
    pub fn blacklist(mut self, chars: &str) -> Self {
        if chars.is_empty() {
            panic!("StringValidator::blacklist() characters must be a non-empty string of blocked characters.");
        }
        let chars = chars.to_string();
        self.chain.add(move |value, name| {
            let mut bad = String::new();
            let mut seen: Vec<char> = Vec::new();
            for c in chars.chars() {
                if as_str(&value).contains(c) && !seen.contains(&c) {
                    seen.push(c);
                    bad.push_str(&escape_char(c));
                }
            }
            if bad.is_empty() {
                Ok(value)
            } else {
                Err(fail(
                    kind::CHARS_BLACKLIST,
                    format!("The following characters are not allowed: {}", bad),
                    name,
                ))
            }
        });
        self
    }

    /// Rejects values containing any character outside `chars`.
    ///
    /// # Panics
    ///
    /// Panics if `chars` is empty.
    pub fn whitelist(mut self, chars: &str) -> Self {
        if chars.is_empty() {
            panic!("StringValidator::whitelist() characters must be a non-empty string of allowed characters.");
        }
        let chars = chars.to_string();
        self.chain.add(move |value, name| {
            let mut bad = String::new();
            let mut seen: Vec<char> = Vec::new();
            for c in as_str(&value).chars() {
                if !chars.contains(c) && !seen.contains(&c) {
                    seen.push(c);
                    bad.push_str(&escape_char(c));
                }
            }
            if bad.is_empty() {
                Ok(value)
            } else {
                Err(fail(
                    kind::CHARS_WHITELIST,
                    format!("The following characters are not allowed: {}", bad),
                    name,
                ))
            }
        });
        self
    }

    /// Requires the value to look like an e-mail address.
    pub fn email(mut self) -> Self {
        self.chain.add(|value, name| {
            if REGEX_EMAIL.is_match(as_str(&value)) {
                Ok(value)
            } else {
                Err(fail(
                    kind::EMAIL,
                    "Please enter a valid e-mail address.",
                    name,
                ))
            }
        });
        self
    }

    /// Requires the value to be one of the given strings.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn one_of<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        let allowed: Vec<String> = values.into_iter().map(Into::into).collect();
        if allowed.is_empty() {
            panic!("StringValidator::one_of() requires at least one allowed value.");
        }
        self.chain.add(move |value, name| {
            if allowed.iter().any(|a| a == as_str(&value)) {
                Ok(value)
            } else {
                Err(fail(kind::ENUM, "Invalid value.", name))
            }
        });
        self
    }

    /// Requires the character count to fall within `min..=max`.
    ///
    /// # Panics
    ///
    /// Panics if `max` is less than `min`.
    pub fn length(mut self, min: usize, max: usize) -> Self {
        if max < min {
            panic!("StringValidator::length() invalid bounds.");
        }
        self.chain.add(move |value, name| {
            let count = as_str(&value).chars().count();
            if count < min {
                return Err(fail(
                    kind::LENGTH_MIN,
                    format!(
                        "Must be at least {} character{}.",
                        min,
                        if min > 1 { "s" } else { "" }
                    ),
                    name,
                ));
            }
            if count > max {
                return Err(fail(
                    kind::LENGTH_MAX,
                    format!(
                        "Cannot be more than {} character{}.",
                        max,
                        if max > 1 { "s" } else { "" }
                    ),
                    name,
                ));
            }
            Ok(value)
        });
        self
    }

    /// Requires the character count to be at most `max`.
    pub fn max_length(self, max: usize) -> Self {
        self.length(0, max)
    }

    /// Lowercases the value.
    pub fn lowercase(mut self) -> Self {
        self.chain
            .add(|value, _| Ok(Value::String(as_str(&value).to_lowercase())));
        self
    }

    /// Requires the value to already be lowercase, without transforming it.
    pub fn lowercase_only(mut self) -> Self {
        self.chain.add(|value, name| {
            let s = as_str(&value);
            if s == s.to_lowercase() {
                Ok(value)
            } else {
                Err(fail(kind::LOWERCASE, "Value must be lowercase.", name))
            }
        });
        self
    }

    /// Uppercases the value.
    pub fn uppercase(mut self) -> Self {
        self.chain
            .add(|value, _| Ok(Value::String(as_str(&value).to_uppercase())));
        self
    }

    /// Requires the value to already be uppercase, without transforming it.
    pub fn uppercase_only(mut self) -> Self {
        self.chain.add(|value, name| {
            let s = as_str(&value);
            if s == s.to_uppercase() {
                Ok(value)
            } else {
                Err(fail(kind::UPPERCASE, "Value must be uppercase.", name))
            }
        });
        self
    }

    /// Trims surrounding whitespace from the value.
    pub fn trim(mut self) -> Self {
        self.chain
            .add(|value, _| Ok(Value::String(as_str(&value).trim().to_string())));
        self
    }

    /// Requires the value to have no surrounding whitespace.
    pub fn trim_only(mut self) -> Self {
        self.chain.add(|value, name| {
            let s = as_str(&value);
            if s == s.trim() {
                Ok(value)
            } else {
                Err(fail(
                    kind::TRIM,
                    "Value must not have whitespace before or after value.",
                    name,
                ))
            }
        });
        self
    }

    /// Requires every character to be an ASCII digit.
    pub fn numeric(mut self) -> Self {
        self.chain.add(|value, name| {
            if REGEX_NUMERIC.is_match(as_str(&value)) {
                Ok(value)
            } else {
                Err(fail(kind::NUMERIC, "Value must be only numeric.", name))
            }
        });
        self
    }

    /// Strips every non-digit character from the value.
    pub fn numeric_strip(mut self) -> Self {
        self.chain.add(|value, _| {
            let digits: String = as_str(&value).chars().filter(char::is_ascii_digit).collect();
            Ok(Value::String(digits))
        });
        self
    }

    /// Checks the Luhn checksum over the digits of the value.
    ///
    /// Non-digit characters are skipped by the checksum but kept in the
    /// output, so formatted card numbers pass through unchanged.
    pub fn luhn(mut self) -> Self {
        self.chain.add(|value, name| luhn_step(value, name, false));
        self
    }

    /// Checks the Luhn checksum and strips non-digit characters.
    pub fn luhn_strip(mut self) -> Self {
        self.chain.add(|value, name| luhn_step(value, name, true));
        self
    }

    /// Strips non-digit characters and requires 10 to 15 digits.
    pub fn phone(mut self) -> Self {
        self.chain.add(|value, name| {
            let digits: String = as_str(&value).chars().filter(char::is_ascii_digit).collect();
            let count = digits.chars().count();
            if !(10..=15).contains(&count) {
                return Err(fail(
                    kind::PHONE,
                    "Please enter a valid phone number.",
                    name,
                ));
            }
            Ok(Value::String(digits))
        });
        self
    }

    /// Requires the value to match the given pattern.
    pub fn regex(mut self, pattern: Regex) -> Self {
        self.chain.add(move |value, name| {
            if pattern.is_match(as_str(&value)) {
                Ok(value)
            } else {
                Err(fail(kind::REGEX, "Invalid format.", name))
            }
        });
        self
    }
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validate for StringValidator {
    fn validate(&self, value: &Value) -> Validated {
        let name = self.name.as_deref();
        let value = match self.gate.check(value, name) {
            GateResult::Proceed(v) => v,
            GateResult::Short(result) => return result,
        };

        if !value.is_string() {
            return Validation::Failure(named(
                ErrorNode::invalid(kind::TYPE_STRING, "Value must be a string."),
                name,
            ));
        }

        match self.chain.run(value, name) {
            Ok(v) => Validation::Success(Some(v)),
            Err(err) => Validation::Failure(err),
        }
    }
}

fn fail(kind: &str, message: impl Into<String>, name: Option<&str>) -> ErrorNode {
    named(ErrorNode::invalid(kind, message), name)
}

// Chain steps only ever see string values; the type check runs first.
fn as_str(value: &Value) -> &str {
    value.as_str().unwrap_or("")
}

// JSON-style escape for a single character, used when listing offending
// characters in an error message.
fn escape_char(c: char) -> String {
    match c {
        '"' => "\\\"".to_string(),
        '\\' => "\\\\".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        c if (c as u32) < 0x20 => format!("\\u{:04x}", c as u32),
        c => c.to_string(),
    }
}

// Walks digits right to left, doubling every second one. Non-digits are
// skipped by the sum; `strip` controls whether they survive in the output.
fn luhn_step(value: Value, name: Option<&str>, strip: bool) -> Result<Value, ErrorNode> {
    let mut out: Vec<char> = Vec::new();
    let mut sum: u32 = 0;
    let mut double = false;

    for c in as_str(&value).chars().rev() {
        match c.to_digit(10) {
            Some(d) => {
                let mut n = d;
                if double {
                    n *= 2;
                    if n > 9 {
                        n -= 9;
                    }
                }
                double = !double;
                sum += n;
                out.push(c);
            }
            None => {
                if !strip {
                    out.push(c);
                }
            }
        }
    }

    if sum > 0 && sum % 10 == 0 {
        out.reverse();
        Ok(Value::String(out.into_iter().collect()))
    } else {
        Err(fail(kind::LUHN, "Invalid number.", name))
    }
}
