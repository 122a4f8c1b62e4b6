//! Generator for the Pro Bono Scholars Program completion affidavit.

use serde_json::{json, Value};

use super::common::{
    applicant, display_name, flag, full_name_with, insert_department, into_object,
    require_object, require_single, text_at, yes_no,
};
use super::traits::{Generator, PreparedForm};
use super::super::{FormId, GeneratorError};

const SECTION: &str = "proBonoScholars";

pub struct ProBonoScholarsGenerator;

impl Generator for ProBonoScholarsGenerator {
    fn form(&self) -> FormId {
        FormId::ProBonoScholars
    }

    fn prepare(&self, data: &Value, selection: usize) -> Result<PreparedForm, GeneratorError> {
        let form = self.form();
        require_object(data, form)?;
        require_single(form, SECTION, selection)?;

        let section = data.get(SECTION).cloned().unwrap_or(Value::Null);
        let mut program = into_object(section.clone());
        program.insert(
            "supervisorFullName".to_string(),
            json!(full_name_with(&section, "supervisor")),
        );
        program.insert(
            "completed".to_string(),
            json!(yes_no(flag(&section, "programCompleted"))),
        );

        let applicant = applicant(data);
        let name = text_at(&section, "organization")
            .or_else(|| text_at(&applicant, "fullName"))
            .unwrap_or_default()
            .to_string();

        let mut prepared = serde_json::Map::new();
        prepared.insert("applicant".to_string(), applicant);
        prepared.insert("program".to_string(), Value::Object(program));
        insert_department(&mut prepared, data);

        Ok(PreparedForm {
            data: Value::Object(prepared),
            display_name: display_name(&name, form, selection),
        })
    }
}
