//! Generator for the Skills Competency and Professional Values affidavit.
//!
//! The applicant satisfies the requirement through one of five pathways; the mapping
//! selects the matching radio option from `skills.pathway`.

use serde_json::Value;

use super::common::{
    applicant, display_name, insert_department, into_object, one_hot, require_object,
    require_single, text_at,
};
use super::traits::{Generator, PreparedForm};
use super::super::writer::whole_number;
use super::super::{FormId, GeneratorError};

const SECTION: &str = "skillsCompetency";
const PATHWAYS: u8 = 5;

pub struct SkillsCompetencyGenerator;

/// Pathway 1-5 given as a number or a digit string. Anything else selects nothing.
fn pathway(section: &Value) -> u8 {
    let raw = match section.get("pathway") {
        Some(Value::Number(number)) => whole_number(number),
        Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    raw.filter(|n| (1..=i64::from(PATHWAYS)).contains(n))
        .map_or(0, |n| n as u8)
}

impl Generator for SkillsCompetencyGenerator {
    fn form(&self) -> FormId {
        FormId::SkillsCompetency
    }

    fn prepare(&self, data: &Value, selection: usize) -> Result<PreparedForm, GeneratorError> {
        let form = self.form();
        require_object(data, form)?;
        require_single(form, SECTION, selection)?;

        let section = data.get(SECTION).cloned().unwrap_or(Value::Null);
        let mut skills = into_object(section.clone());
        skills.insert("pathway".to_string(), one_hot(pathway(&section), PATHWAYS));

        let applicant = applicant(data);
        let name = text_at(&applicant, "fullName")
            .unwrap_or_default()
            .to_string();

        let mut prepared = serde_json::Map::new();
        prepared.insert("applicant".to_string(), applicant);
        prepared.insert("skills".to_string(), Value::Object(skills));
        insert_department(&mut prepared, data);

        Ok(PreparedForm {
            data: Value::Object(prepared),
            display_name: display_name(&name, form, selection),
        })
    }
}
