//! Field validation and type coercion for loaded configuration documents.
//!
//! Validation applies a fixed, declarative rule table to the flat document and
//! collects every failure rather than stopping at the first one. Coercion then
//! normalizes the two known fields to their declared types; it assumes a
//! document that already passed validation and never recovers from malformed
//! input.

use crate::models::{ConfigDocument, ConfigValue, FIELD_CONFIG_VERSION, FIELD_LANG};
use std::fmt;
use thiserror::Error;

/// A single field rule applied during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The field must be present in the document.
    Required,
    /// The value must be an integer (numeric strings are accepted and
    /// normalized later by [`coerce`]).
    Integer,
    /// The integer value must lie within the inclusive range.
    Range(i64, i64),
    /// The value must be a string.
    Text,
}

/// Rule table for the two fields the schema enforces. Additional keys are
/// unchecked by contract.
const RULES: &[(&str, &[Rule])] = &[
    (
        FIELD_CONFIG_VERSION,
        &[Rule::Required, Rule::Integer, Rule::Range(0, i64::MAX)],
    ),
    (FIELD_LANG, &[Rule::Required, Rule::Text]),
];

/// One failed field rule, aggregated into a [`ConfigValidationError`] by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// The field the rule was applied to.
    pub field: String,
    /// The rule that was violated.
    pub rule: Rule,
    /// Human-readable description for operator logs.
    pub message: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Fatal error raised when a loaded document fails validation.
///
/// The display form joins every individual failure so a single log line shows
/// the operator everything that is wrong with the file.
#[derive(Debug, Error)]
#[error("invalid config file: {}", format_failures(.failures))]
pub struct ConfigValidationError {
    pub failures: Vec<ValidationFailure>,
}

fn format_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Validates the document against the fixed rule table.
///
/// Returns an empty list on success; on failure, every violated rule is
/// reported, not just the first.
pub fn validate(doc: &ConfigDocument) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    for (field, rules) in RULES {
        let value = doc.get(*field);
        for rule in *rules {
            match rule {
                Rule::Required => {
                    if value.is_none() {
                        failures.push(ValidationFailure {
                            field: (*field).to_string(),
                            rule: *rule,
                            message: "required field is missing".to_string(),
                        });
                        break;
                    }
                }
                Rule::Integer => {
                    let Some(value) = value else { break };
                    if integer_value(value).is_none() {
                        failures.push(ValidationFailure {
                            field: (*field).to_string(),
                            rule: *rule,
                            message: format!("expected an integer, found {}", value.type_name()),
                        });
                        break;
                    }
                }
                Rule::Range(min, max) => {
                    let Some(n) = value.and_then(integer_value) else {
                        break;
                    };
                    if n < *min || n > *max {
                        failures.push(ValidationFailure {
                            field: (*field).to_string(),
                            rule: *rule,
                            message: format!("value {n} is outside the range {min}..={max}"),
                        });
                        break;
                    }
                }
                Rule::Text => {
                    let Some(value) = value else { break };
                    if !matches!(value, ConfigValue::Str(_)) {
                        failures.push(ValidationFailure {
                            field: (*field).to_string(),
                            rule: *rule,
                            message: format!("expected a string, found {}", value.type_name()),
                        });
                        break;
                    }
                }
            }
        }
    }

    failures
}

/// The integer a value represents for validation purposes. Numeric strings
/// count; everything else does not.
fn integer_value(value: &ConfigValue) -> Option<i64> {
    match value {
        ConfigValue::Int(n) => Some(*n),
        ConfigValue::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerces the two known fields to their declared types, leaving every other
/// key untouched.
///
/// Must run only after [`validate`] returned no failures. Idempotent:
/// `coerce(coerce(d)) == coerce(d)`.
pub fn coerce(mut doc: ConfigDocument) -> ConfigDocument {
    if let Some(value) = doc.get_mut(FIELD_CONFIG_VERSION)
        && let Some(n) = coerce_int(value)
    {
        *value = ConfigValue::Int(n);
    }
    if let Some(value) = doc.get_mut(FIELD_LANG)
        && let Some(s) = coerce_str(value)
    {
        *value = ConfigValue::Str(s);
    }
    doc
}

fn coerce_int(value: &ConfigValue) -> Option<i64> {
    match value {
        ConfigValue::Int(n) => Some(*n),
        ConfigValue::Str(s) => s.trim().parse().ok(),
        ConfigValue::Bool(b) => Some(i64::from(*b)),
        ConfigValue::Float(f) => Some(*f as i64),
        _ => None,
    }
}

fn coerce_str(value: &ConfigValue) -> Option<String> {
    match value {
        ConfigValue::Str(s) => Some(s.clone()),
        ConfigValue::Int(n) => Some(n.to_string()),
        ConfigValue::Float(f) => Some(f.to_string()),
        ConfigValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
