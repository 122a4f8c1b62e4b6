//! Generator for the Pro Bono Affidavit, one per placement in `proBono`.

use serde_json::{json, Value};

use super::common::{
    applicant, display_name, flag, full_name_with, insert_department, into_object,
    require_object, select_entry, text_at, yes_no,
};
use super::traits::{Generator, PreparedForm};
use super::super::{FormId, GeneratorError};

const COLLECTION: &str = "proBono";

pub struct ProBonoAffidavitGenerator;

impl Generator for ProBonoAffidavitGenerator {
    fn form(&self) -> FormId {
        FormId::ProBonoAffidavit
    }

    fn collection(&self) -> Option<&'static str> {
        Some(COLLECTION)
    }

    fn prepare(&self, data: &Value, selection: usize) -> Result<PreparedForm, GeneratorError> {
        let form = self.form();
        require_object(data, form)?;
        let entry = select_entry(data, form, COLLECTION, selection)?;

        let mut placement = into_object(entry.clone());
        placement.insert(
            "supervisorFullName".to_string(),
            json!(full_name_with(entry, "supervisor")),
        );
        placement.insert(
            "lawSchoolProgram".to_string(),
            json!(yes_no(flag(entry, "throughLawSchool"))),
        );

        let mut prepared = serde_json::Map::new();
        prepared.insert("applicant".to_string(), applicant(data));
        prepared.insert("placement".to_string(), Value::Object(placement));
        insert_department(&mut prepared, data);

        let organization = text_at(entry, "organization").unwrap_or_default();
        Ok(PreparedForm {
            data: Value::Object(prepared),
            display_name: display_name(organization, form, selection),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_placement() {
        let data = json!({
            "application": { "department": "First" },
            "proBono": [
                { "organization": "Legal Aid Society", "supervisorFirstName": "Sam", "supervisorLastName": "Lee", "throughLawSchool": true },
                { "hours": 12 }
            ]
        });

        let first = ProBonoAffidavitGenerator.prepare(&data, 0).unwrap();
        assert_eq!(first.data["placement"]["supervisorFullName"], "Sam Lee");
        assert_eq!(first.data["placement"]["lawSchoolProgram"], "Yes");
        assert_eq!(first.display_name, "Legal Aid Society");

        let second = ProBonoAffidavitGenerator.prepare(&data, 1).unwrap();
        assert_eq!(second.data["placement"]["hours"], 12);
        assert_eq!(second.data["placement"]["lawSchoolProgram"], "No");
        assert_eq!(second.display_name, "Pro Bono Affidavit 2");
    }
}
