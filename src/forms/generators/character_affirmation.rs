//! Generator for the Affirmation of Good Moral Character.
//!
//! One document per entry in `characterAffirmants`, each naming the applicant and the
//! person vouching for them.

use serde_json::{json, Value};

use super::common::{
    applicant, display_name, full_name, insert_department, into_object, require_object,
    select_entry,
};
use super::traits::{Generator, PreparedForm};
use super::super::{FormId, GeneratorError};

const COLLECTION: &str = "characterAffirmants";

pub struct CharacterAffirmationGenerator;

impl Generator for CharacterAffirmationGenerator {
    fn form(&self) -> FormId {
        FormId::CharacterAffirmation
    }

    fn collection(&self) -> Option<&'static str> {
        Some(COLLECTION)
    }

    fn prepare(&self, data: &Value, selection: usize) -> Result<PreparedForm, GeneratorError> {
        let form = self.form();
        require_object(data, form)?;
        let entry = select_entry(data, form, COLLECTION, selection)?;

        let affirmant_name = full_name(entry);
        let mut affirmant = into_object(entry.clone());
        affirmant.insert("fullName".to_string(), json!(affirmant_name));

        let mut prepared = serde_json::Map::new();
        prepared.insert("applicant".to_string(), applicant(data));
        prepared.insert("affirmant".to_string(), Value::Object(affirmant));
        prepared.insert("entryNumber".to_string(), json!(selection + 1));
        insert_department(&mut prepared, data);

        Ok(PreparedForm {
            data: Value::Object(prepared),
            display_name: display_name(&affirmant_name, form, selection),
        })
    }
}
