//! Common utilities for form generation.
//!
//! Name assembly, department resolution, entry selection and filename cleanup shared by
//! every generator.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map, Value};

use super::super::writer::{is_truthy, whole_number};
use super::super::{FormId, GeneratorError};

lazy_static! {
    static ref DEPARTMENTS: Vec<(Regex, u8)> = [
        (r"(?i)\b(1|1st|first)\b", 1),
        (r"(?i)\b(2|2nd|second)\b", 2),
        (r"(?i)\b(3|3rd|third)\b", 3),
        (r"(?i)\b(4|4th|fourth)\b", 4),
    ]
    .into_iter()
    .filter_map(|(pattern, number)| Regex::new(pattern).ok().map(|re| (re, number)))
    .collect();
}

/// Non-empty trimmed string at `key`.
pub fn text_at<'a>(entity: &'a Value, key: &str) -> Option<&'a str> {
    entity
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Join `<prefix>FirstName`, `MiddleName`, `LastName` and `Suffix` with single spaces.
///
/// An empty prefix reads `firstName`, `middleName` and so on.
pub fn full_name_with(entity: &Value, prefix: &str) -> String {
    const PARTS: [(&str, &str); 4] = [
        ("firstName", "FirstName"),
        ("middleName", "MiddleName"),
        ("lastName", "LastName"),
        ("suffix", "Suffix"),
    ];

    PARTS
        .iter()
        .filter_map(|(plain, capitalized)| {
            let key = if prefix.is_empty() {
                (*plain).to_string()
            } else {
                format!("{prefix}{capitalized}")
            };
            text_at(entity, &key).map(str::to_string)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn full_name(person: &Value) -> String {
    full_name_with(person, "")
}

/// `personalInfo` with its `fullName` filled in.
pub fn applicant(data: &Value) -> Value {
    let person = data.get("personalInfo").cloned().unwrap_or(Value::Null);
    let name = full_name(&person);
    let mut object = into_object(person);
    object.insert("fullName".to_string(), Value::String(name));
    Value::Object(object)
}

/// Judicial department 1-4 from `application.department`. Unrecognized values mean 1.
pub fn department_number(data: &Value) -> u8 {
    let raw = data.get("application").and_then(|app| app.get("department"));
    match raw {
        Some(Value::Number(number)) => whole_number(number)
            .filter(|n| (1..=4).contains(n))
            .map_or(1, |n| n as u8),
        Some(Value::String(text)) => DEPARTMENTS
            .iter()
            .find(|(pattern, _)| pattern.is_match(text))
            .map_or(1, |(_, number)| *number),
        _ => 1,
    }
}

/// `{"1": false, "2": true, ...}` for a 1-based choice among `count` options.
pub fn one_hot(selected: u8, count: u8) -> Value {
    let map = (1..=count)
        .map(|n| (n.to_string(), Value::Bool(n == selected)))
        .collect::<Map<String, Value>>();
    Value::Object(map)
}

/// Insert `departmentNumber` and the `department` selection map.
pub fn insert_department(target: &mut Map<String, Value>, data: &Value) {
    let number = department_number(data);
    target.insert("departmentNumber".to_string(), json!(number));
    target.insert("department".to_string(), one_hot(number, 4));
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

pub fn flag(entity: &Value, key: &str) -> bool {
    entity.get(key).is_some_and(is_truthy)
}

/// True for a non-empty list or object, or a truthy scalar.
pub fn has_entries(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(other) => is_truthy(other),
        None => false,
    }
}

pub fn count_of(data: &Value, key: &str) -> usize {
    data.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

pub fn require_object(data: &Value, form: FormId) -> Result<(), GeneratorError> {
    if data.is_object() {
        Ok(())
    } else {
        Err(GeneratorError::InvalidPayload { form })
    }
}

/// Entry `index` of the list at `collection`. A missing list has no entries.
pub fn select_entry<'a>(
    data: &'a Value,
    form: FormId,
    collection: &'static str,
    index: usize,
) -> Result<&'a Value, GeneratorError> {
    let entries = data
        .get(collection)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    entries
        .get(index)
        .ok_or(GeneratorError::SelectionOutOfRange {
            form,
            collection,
            index,
            available: entries.len(),
        })
}

/// Single-entity forms only have index 0.
pub fn require_single(
    form: FormId,
    collection: &'static str,
    index: usize,
) -> Result<(), GeneratorError> {
    if index == 0 {
        Ok(())
    } else {
        Err(GeneratorError::SelectionOutOfRange {
            form,
            collection,
            index,
            available: 1,
        })
    }
}

pub fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// `candidate`, or `"<title> <n>"` when it is blank.
pub fn display_name(candidate: &str, form: FormId, index: usize) -> String {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        format!("{} {}", form.title(), index + 1)
    } else {
        candidate.to_string()
    }
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_' || ch == '.' || ch == ',')
            && !last_dash
            && !result.is_empty()
        {
            result.push('-');
            last_dash = true;
        }
    }

    let result = result.trim_matches('-');
    if result.is_empty() {
        fallback.to_string()
    } else {
        result.to_string()
    }
}
