//! AcroForm fill engine.
//!
//! Opens a fresh document from the template bytes, walks the mapping over the prepared
//! data and serializes the result.

use super::super::acroform::PdfForm;
use super::super::mapping::MappingNode;
use super::super::report::FillReport;
use super::super::walker;
use super::super::{FormId, GeneratedDocument, GeneratorError};
use super::common::sanitize_filename;
use super::traits::PreparedForm;
use crate::metrics;

/// Stateless engine for filling PDF templates.
pub struct PdfFillEngine;

impl PdfFillEngine {
    /// Fill `template` with `prepared.data` as directed by `mapping`.
    ///
    /// Field-level problems end up in the document's [`FillReport`]; only an unreadable
    /// template or a failed save is an error.
    pub fn render(
        form: FormId,
        template: &[u8],
        mapping: &MappingNode,
        prepared: PreparedForm,
    ) -> Result<GeneratedDocument, GeneratorError> {
        let mut pdf =
            PdfForm::open(template).map_err(|source| GeneratorError::Template { form, source })?;

        let mut report = FillReport::new();
        walker::fill(&mut pdf, mapping, Some(&prepared.data), &mut report);

        for warning in &report.warnings {
            metrics::FIELD_WARNINGS
                .with_label_values(&[form.slug(), warning.code.as_str()])
                .inc();
        }

        let bytes = pdf
            .save()
            .map_err(|source| GeneratorError::Serialize { form, source })?;

        log::info!(
            "Filled {} for '{}': {} written, {} skipped, {} warnings",
            form,
            prepared.display_name,
            report.written,
            report.skipped,
            report.warnings.len()
        );

        let filename = format!(
            "{}-{}.pdf",
            form.slug(),
            sanitize_filename(&prepared.display_name, "form")
        );

        Ok(GeneratedDocument {
            form,
            display_name: prepared.display_name,
            filename,
            pdf: bytes,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::test_support::{form_pdf, FixtureField};
    use serde_json::json;

    #[test]
    fn test_render_fills_and_names_document() {
        let template = form_pdf(&[
            FixtureField::Text("Applicant Name"),
            FixtureField::Checkbox("Agree"),
        ]);
        let mapping = MappingNode::from_json(&json!({
            "name": "Applicant Name",
            "agree": { "field": "Agree", "type": "checkbox" },
            "phone": "Phone"
        }))
        .unwrap();
        let prepared = PreparedForm {
            data: json!({ "name": "Jane Roe", "agree": true, "phone": "555" }),
            display_name: "Jane Roe".to_string(),
        };

        let doc = PdfFillEngine::render(FormId::Questionnaire, &template, &mapping, prepared)
            .unwrap();

        assert_eq!(doc.filename, "questionnaire-jane-roe.pdf");
        assert_eq!(doc.report.written, 2);
        assert_eq!(doc.report.warnings.len(), 1);

        let filled = PdfForm::open(&doc.pdf).unwrap();
        assert_eq!(filled.text_value("Applicant Name").as_deref(), Some("Jane Roe"));
        assert_eq!(filled.is_checked("Agree"), Some(true));
    }

    #[test]
    fn test_render_rejects_non_pdf_template() {
        let mapping = MappingNode::Empty;
        let prepared = PreparedForm {
            data: json!({}),
            display_name: String::new(),
        };
        let err = PdfFillEngine::render(FormId::Questionnaire, b"not a pdf", &mapping, prepared)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Template { .. }));
    }
}
