//! Generator for the Law School Certificate of Attendance, one per entry in `lawSchools`.

use serde_json::{json, Value};

use super::common::{
    applicant, display_name, flag, insert_department, into_object, require_object,
    select_entry, text_at, yes_no,
};
use super::traits::{Generator, PreparedForm};
use super::super::{FormId, GeneratorError};

const COLLECTION: &str = "lawSchools";

pub struct LawSchoolCertificateGenerator;

impl Generator for LawSchoolCertificateGenerator {
    fn form(&self) -> FormId {
        FormId::LawSchoolCertificate
    }

    fn collection(&self) -> Option<&'static str> {
        Some(COLLECTION)
    }

    fn prepare(&self, data: &Value, selection: usize) -> Result<PreparedForm, GeneratorError> {
        let form = self.form();
        require_object(data, form)?;
        let entry = select_entry(data, form, COLLECTION, selection)?;

        let name = text_at(entry, "name").unwrap_or_default();
        // Schools renamed since graduation certify under the old name.
        let attended_as = text_at(entry, "nameWhileAttending").unwrap_or(name);

        let mut school = into_object(entry.clone());
        school.insert("nameWhileAttending".to_string(), json!(attended_as));
        school.insert(
            "degreeConferred".to_string(),
            json!(yes_no(flag(entry, "degreeReceived"))),
        );

        let mut prepared = serde_json::Map::new();
        prepared.insert("applicant".to_string(), applicant(data));
        prepared.insert("school".to_string(), Value::Object(school));
        insert_department(&mut prepared, data);

        Ok(PreparedForm {
            data: Value::Object(prepared),
            display_name: display_name(name, form, selection),
        })
    }
}
