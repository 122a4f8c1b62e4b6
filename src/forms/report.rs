//! Per-document record of what happened to every field the mapping touched.

use serde::Serialize;
use utoipa::ToSchema;

use super::writer::FieldOutcome;

/// A field that could not be written. The rest of the document is unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldWarning {
    pub field: String,
    pub attempted: String,
    /// Machine-readable reason (`not_found`, `wrong_kind`, ...).
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FillReport {
    pub written: usize,
    pub skipped: usize,
    pub warnings: Vec<FieldWarning>,
}

impl FillReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, field: &str, attempted: &str, outcome: FieldOutcome) {
        match outcome {
            FieldOutcome::Written => self.written += 1,
            FieldOutcome::Skipped => self.skipped += 1,
            other => self.warnings.push(FieldWarning {
                field: field.to_string(),
                attempted: attempted.to_string(),
                code: other.label().to_string(),
                reason: other.describe(),
            }),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::acroform::AcroFieldKind;

    #[test]
    fn test_record_counts_and_collects_warnings() {
        let mut report = FillReport::new();
        report.record("A", "x", FieldOutcome::Written);
        report.record("B", "", FieldOutcome::Skipped);
        report.record(
            "C",
            "y",
            FieldOutcome::WrongKind {
                actual: AcroFieldKind::Signature,
            },
        );

        assert_eq!(report.written, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, "wrong_kind");
        assert!(report.warnings[0].reason.contains("signature"));
    }
}
