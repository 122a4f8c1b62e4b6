//! Traits for generator system standardization.

use serde_json::Value;

use super::super::{FormId, GeneratorError};

/// Applicant data reshaped for one form, ready for the mapping walk.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedForm {
    pub data: Value,
    pub display_name: String,
}

/// Trait for form generators.
///
/// A generator never touches the PDF. It selects the entity a document is about and
/// derives the computed values its mapping refers to.
pub trait Generator: Send + Sync {
    fn form(&self) -> FormId;

    /// Key of the repeated list this form is produced once per entry of.
    fn collection(&self) -> Option<&'static str> {
        None
    }

    /// Number of documents "generate all" produces for `data`.
    fn entry_count(&self, data: &Value) -> usize {
        match self.collection() {
            Some(key) => data.get(key).and_then(Value::as_array).map_or(0, Vec::len),
            None => 1,
        }
    }

    fn prepare(&self, data: &Value, selection: usize) -> Result<PreparedForm, GeneratorError>;
}
