//! Generator for the Application for Admission questionnaire.
//!
//! The questionnaire covers the whole draft, so the mapping sees every section as-is plus
//! a `computed` block of derived answers.

use serde_json::{json, Value};

use super::common::{
    applicant, count_of, department_number, display_name, has_entries, one_hot,
    require_object, require_single,
};
use super::traits::{Generator, PreparedForm};
use super::super::{FormId, GeneratorError};

pub struct QuestionnaireGenerator;

impl Generator for QuestionnaireGenerator {
    fn form(&self) -> FormId {
        FormId::Questionnaire
    }

    fn prepare(&self, data: &Value, selection: usize) -> Result<PreparedForm, GeneratorError> {
        let form = self.form();
        require_object(data, form)?;
        require_single(form, "application", selection)?;

        let applicant = applicant(data);
        let full_name = applicant
            .get("fullName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let department = department_number(data);

        let mut prepared = data.clone();
        if let Some(map) = prepared.as_object_mut() {
            map.insert(
                "computed".to_string(),
                json!({
                    "applicantFullName": full_name,
                    "departmentNumber": department,
                    "department": one_hot(department, 4),
                    "hasOtherNames": has_entries(data.get("otherNames")),
                    "hasBarAdmissions": has_entries(data.get("barAdmissions")),
                    "hasMilitaryService": has_entries(data.get("militaryService")),
                    "hasDisciplinaryHistory": has_entries(data.get("disciplinaryHistory")),
                    "lawSchoolCount": count_of(data, "lawSchools"),
                    "employmentCount": count_of(data, "employment"),
                }),
            );
        }

        Ok(PreparedForm {
            data: prepared,
            display_name: display_name(&full_name, form, selection),
        })
    }
}
