//! Generator for the Employment Affirmation, one per entry in `employment`.

use serde_json::{json, Value};

use super::common::{
    applicant, display_name, flag, full_name_with, insert_department, into_object,
    require_object, select_entry, text_at, yes_no,
};
use super::traits::{Generator, PreparedForm};
use super::super::writer::to_text;
use super::super::{FormId, GeneratorError};

const COLLECTION: &str = "employment";

pub struct EmploymentAffirmationGenerator;

impl Generator for EmploymentAffirmationGenerator {
    fn form(&self) -> FormId {
        FormId::EmploymentAffirmation
    }

    fn collection(&self) -> Option<&'static str> {
        Some(COLLECTION)
    }

    fn prepare(&self, data: &Value, selection: usize) -> Result<PreparedForm, GeneratorError> {
        let form = self.form();
        require_object(data, form)?;
        let entry = select_entry(data, form, COLLECTION, selection)?;

        let current = flag(entry, "isCurrent");
        let end_date = if current {
            "Present".to_string()
        } else {
            entry.get("endDate").map(to_text).unwrap_or_default()
        };

        let mut employer = into_object(entry.clone());
        employer.insert(
            "supervisorFullName".to_string(),
            json!(full_name_with(entry, "supervisor")),
        );
        employer.insert("stillEmployed".to_string(), json!(yes_no(current)));
        employer.insert("endDateDisplay".to_string(), json!(end_date));

        let mut prepared = serde_json::Map::new();
        prepared.insert("applicant".to_string(), applicant(data));
        prepared.insert("employer".to_string(), Value::Object(employer));
        insert_department(&mut prepared, data);

        let name = text_at(entry, "employerName").unwrap_or_default();
        Ok(PreparedForm {
            data: Value::Object(prepared),
            display_name: display_name(name, form, selection),
        })
    }
}
