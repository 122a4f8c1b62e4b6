use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::forms::generators::generator_for;
use crate::forms::{FieldWarning, FormId, GeneratedDocument};

/// Applicant draft to fill a form from.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[schema(value_type = Object)]
    pub data: Value,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SelectionQuery {
    /// Zero-based entry of the form's repeated list. Defaults to 0.
    #[serde(default)]
    pub index: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormSummary {
    pub id: FormId,
    pub title: String,
    /// Whether one document is produced per list entry.
    pub repeated: bool,
    pub collection: Option<String>,
}

impl From<FormId> for FormSummary {
    fn from(form: FormId) -> Self {
        let collection = generator_for(form).collection();
        Self {
            id: form,
            title: form.title().to_string(),
            repeated: collection.is_some(),
            collection: collection.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntryCountResponse {
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub display_name: String,
    pub filename: String,
    pub pdf_base64: String,
    pub warnings: Vec<FieldWarning>,
}

impl From<GeneratedDocument> for DocumentPayload {
    fn from(doc: GeneratedDocument) -> Self {
        use base64::Engine;

        Self {
            pdf_base64: base64::engine::general_purpose::STANDARD.encode(&doc.pdf),
            display_name: doc.display_name,
            filename: doc.filename,
            warnings: doc.report.warnings,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateAllResponse {
    pub count: usize,
    pub documents: Vec<DocumentPayload>,
}
