//! Generators module - per-form preparation of applicant data.
//!
//! This module contains a generator for each document in the packet:
//! - `QuestionnaireGenerator` - Application for Admission questionnaire
//! - `CharacterAffirmationGenerator` - Affirmation of Good Moral Character (per affirmant)
//! - `EmploymentAffirmationGenerator` - Employment Affirmation (per employer)
//! - `LawSchoolCertificateGenerator` - Law School Certificate (per school)
//! - `ProBonoAffidavitGenerator` - Pro Bono Affidavit (per placement)
//! - `ProBonoScholarsGenerator` - Pro Bono Scholars completion affidavit
//! - `SkillsCompetencyGenerator` - Skills Competency affidavit

pub mod character_affirmation;
pub mod common;
pub mod employment_affirmation;
pub mod engine;
pub mod law_school_certificate;
pub mod pro_bono_affidavit;
pub mod pro_bono_scholars;
pub mod questionnaire;
pub mod skills_competency;
pub mod traits;

pub use character_affirmation::CharacterAffirmationGenerator;
pub use employment_affirmation::EmploymentAffirmationGenerator;
pub use engine::PdfFillEngine;
pub use law_school_certificate::LawSchoolCertificateGenerator;
pub use pro_bono_affidavit::ProBonoAffidavitGenerator;
pub use pro_bono_scholars::ProBonoScholarsGenerator;
pub use questionnaire::QuestionnaireGenerator;
pub use skills_competency::SkillsCompetencyGenerator;
pub use traits::{Generator, PreparedForm};

use super::FormId;

pub fn generator_for(form: FormId) -> &'static dyn Generator {
    match form {
        FormId::Questionnaire => &QuestionnaireGenerator,
        FormId::CharacterAffirmation => &CharacterAffirmationGenerator,
        FormId::EmploymentAffirmation => &EmploymentAffirmationGenerator,
        FormId::LawSchoolCertificate => &LawSchoolCertificateGenerator,
        FormId::ProBonoAffidavit => &ProBonoAffidavitGenerator,
        FormId::ProBonoScholars => &ProBonoScholarsGenerator,
        FormId::SkillsCompetency => &SkillsCompetencyGenerator,
    }
}
