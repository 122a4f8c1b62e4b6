//! Forms module - mapping-driven filling of the admission packet's PDF forms.
//!
//! - `mapping` - parsed mapping documents
//! - `acroform` - AcroForm field access over lopdf
//! - `writer` / `walker` - per-field writes and the mapping traversal
//! - `generators` - one generator per document in the packet
//! - `assets` / `service` - template and mapping loading, generation entry points

pub mod acroform;
pub mod assets;
pub mod generators;
pub mod mapping;
pub mod report;
pub mod service;
pub mod walker;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

pub use acroform::{AcroFieldKind, FieldAccess, FieldInfo, PdfForm};
pub use assets::{AssetStore, FsAssetStore};
pub use mapping::{FieldType, MappingNode};
pub use report::{FillReport, FieldWarning};
pub use service::FormService;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use self::acroform::PdfFormError;
use self::assets::AssetError;
use self::mapping::MappingSourceError;

/// Every document the packet can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FormId {
    Questionnaire,
    CharacterAffirmation,
    EmploymentAffirmation,
    LawSchoolCertificate,
    ProBonoAffidavit,
    ProBonoScholars,
    SkillsCompetency,
}

impl FormId {
    pub const ALL: [FormId; 7] = [
        FormId::Questionnaire,
        FormId::CharacterAffirmation,
        FormId::EmploymentAffirmation,
        FormId::LawSchoolCertificate,
        FormId::ProBonoAffidavit,
        FormId::ProBonoScholars,
        FormId::SkillsCompetency,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Questionnaire => "questionnaire",
            Self::CharacterAffirmation => "character-affirmation",
            Self::EmploymentAffirmation => "employment-affirmation",
            Self::LawSchoolCertificate => "law-school-certificate",
            Self::ProBonoAffidavit => "pro-bono-affidavit",
            Self::ProBonoScholars => "pro-bono-scholars",
            Self::SkillsCompetency => "skills-competency",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Questionnaire => "Application for Admission Questionnaire",
            Self::CharacterAffirmation => "Affirmation of Good Moral Character",
            Self::EmploymentAffirmation => "Employment Affirmation",
            Self::LawSchoolCertificate => "Law School Certificate of Attendance",
            Self::ProBonoAffidavit => "Pro Bono Affidavit",
            Self::ProBonoScholars => "Pro Bono Scholars Completion Affidavit",
            Self::SkillsCompetency => "Skills Competency and Professional Values Affidavit",
        }
    }

    pub fn template_file(self) -> String {
        format!("{}.pdf", self.slug())
    }

    pub fn mapping_file(self) -> String {
        format!("{}.json", self.slug())
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FormId {
    type Err = GeneratorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        FormId::ALL
            .into_iter()
            .find(|form| form.slug() == raw)
            .ok_or_else(|| GeneratorError::UnknownForm(raw.to_string()))
    }
}

/// Structural failures. Each one aborts a single generation call with no output.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("unknown form '{0}'")]
    UnknownForm(String),
    #[error("{form}: applicant data must be a JSON object")]
    InvalidPayload { form: FormId },
    #[error("{form}: cannot select entry {index} from {collection} ({available} available)")]
    SelectionOutOfRange {
        form: FormId,
        collection: &'static str,
        index: usize,
        available: usize,
    },
    #[error("{form}: no {collection} entries to generate")]
    NoEntries {
        form: FormId,
        collection: &'static str,
    },
    #[error("{form}: {source}")]
    Asset {
        form: FormId,
        #[source]
        source: AssetError,
    },
    #[error("{form}: invalid mapping document: {source}")]
    Mapping {
        form: FormId,
        #[source]
        source: MappingSourceError,
    },
    #[error("{form}: unusable template: {source}")]
    Template {
        form: FormId,
        #[source]
        source: PdfFormError,
    },
    #[error("{form}: {source}")]
    Serialize {
        form: FormId,
        #[source]
        source: PdfFormError,
    },
}

impl GeneratorError {
    /// True when the caller supplied bad input rather than the server lacking assets.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownForm(_)
                | Self::InvalidPayload { .. }
                | Self::SelectionOutOfRange { .. }
                | Self::NoEntries { .. }
        )
    }
}

/// A filled form ready to hand back to the caller.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub form: FormId,
    pub display_name: String,
    pub filename: String,
    pub pdf: Vec<u8>,
    pub report: FillReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_id_parses_slugs() {
        for form in FormId::ALL {
            assert_eq!(form.slug().parse::<FormId>().unwrap(), form);
        }
        assert!(matches!(
            "tax-return".parse::<FormId>(),
            Err(GeneratorError::UnknownForm(_))
        ));
    }

    #[test]
    fn test_form_id_serializes_as_slug() {
        let json = serde_json::to_string(&FormId::LawSchoolCertificate).unwrap();
        assert_eq!(json, "\"law-school-certificate\"");
    }

    #[test]
    fn test_out_of_range_message_names_form_and_collection() {
        let err = GeneratorError::SelectionOutOfRange {
            form: FormId::LawSchoolCertificate,
            collection: "lawSchools",
            index: 2,
            available: 1,
        };
        let message = err.to_string();
        assert!(message.contains("law-school-certificate"));
        assert!(message.contains("lawSchools"));
        assert!(err.is_client_error());
    }
}
