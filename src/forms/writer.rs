//! Field writer: applies one data value to one named form field.
//!
//! Nothing here propagates errors. Every failure becomes a [`FieldOutcome`] and a
//! `warn` log line, so a single drifted field name cannot abort a document.

use chrono::{DateTime, Utc};
use serde_json::{Number, Value};

use super::acroform::{AcroFieldKind, FieldAccess, FieldError};
use super::mapping::FieldType;

/// Result of a single write attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    Written,
    /// Nothing to write (null value, or a falsy value for an explicit radio option).
    Skipped,
    NotFound,
    WrongKind { actual: AcroFieldKind },
    OptionNotFound { available: Vec<String> },
    Failed(String),
}

impl FieldOutcome {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Written => "written",
            Self::Skipped => "skipped",
            Self::NotFound => "not_found",
            Self::WrongKind { .. } => "wrong_kind",
            Self::OptionNotFound { .. } => "option_not_found",
            Self::Failed(_) => "failed",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Written => "written".to_string(),
            Self::Skipped => "skipped".to_string(),
            Self::NotFound => "field not found in template".to_string(),
            Self::WrongKind { actual } => format!("template field is a {actual} field"),
            Self::OptionNotFound { available } => {
                format!("option not in radio group (available: {})", available.join(", "))
            }
            Self::Failed(reason) => reason.clone(),
        }
    }
}

impl From<FieldError> for FieldOutcome {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::NotFound(_) => Self::NotFound,
            FieldError::WrongKind { actual, .. } => Self::WrongKind { actual },
            FieldError::OptionNotFound { available, .. } => Self::OptionNotFound { available },
            FieldError::Pdf { reason, .. } => Self::Failed(reason),
        }
    }
}

/// Write `value` into `name` according to `kind`.
pub fn write_field<F: FieldAccess + ?Sized>(
    form: &mut F,
    name: &str,
    kind: FieldType,
    value: &Value,
    option: Option<&str>,
) -> FieldOutcome {
    let result = match kind {
        FieldType::Text => {
            if value.is_null() {
                return FieldOutcome::Skipped;
            }
            form.set_text(name, &to_text(value))
        }
        FieldType::Checkbox => form.set_checkbox(name, is_truthy(value)),
        FieldType::Radio => match option {
            Some(option) => {
                if !is_truthy(value) {
                    return FieldOutcome::Skipped;
                }
                form.select_radio(name, option)
            }
            None => {
                if value.is_null() {
                    return FieldOutcome::Skipped;
                }
                form.select_radio(name, &yes_no_option(value))
            }
        },
    };

    match result {
        Ok(()) => FieldOutcome::Written,
        Err(err) => {
            log::warn!(
                "Skipping {} field '{}' (value {}): {}",
                kind,
                name,
                value,
                err
            );
            err.into()
        }
    }
}

/// Text rendering of a data value.
///
/// RFC 3339 timestamps collapse to their UTC calendar date.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => match DateTime::parse_from_rfc3339(text) {
            Ok(timestamp) if text.contains('T') => timestamp
                .with_timezone(&Utc)
                .date_naive()
                .format("%Y-%m-%d")
                .to_string(),
            _ => text.clone(),
        },
        Value::Number(number) => match whole_number(number) {
            Some(whole) => whole.to_string(),
            None => number.to_string(),
        },
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// The integer a number denotes, if it has no fractional part. `2.0` reads as `2`.
pub fn whole_number(number: &Number) -> Option<i64> {
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    let float = number.as_f64()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as i64)
}

/// JavaScript-style truthiness.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Boolean radio convention: booleans become `Yes`/`No`; anything else is stringified.
pub fn yes_no_option(value: &Value) -> String {
    match value {
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(text) if text == "true" => "Yes".to_string(),
        Value::String(text) if text == "false" => "No".to_string(),
        other => to_text(other),
    }
}
