//! Per-section completion status.
//!
//! Completion is guidance, not validation: an incomplete section never blocks
//! saving or export. Only personal info and the self introduction are marked
//! as required.

use crate::model::{Cv, Locale};

/// The editable sections of a CV, in editor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    PersonalInfo,
    CareerSummary,
    Skills,
    WorkExperience,
    Education,
    Certifications,
    Languages,
    SelfIntroduction,
    PortfolioLinks,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::PersonalInfo,
        Section::CareerSummary,
        Section::Skills,
        Section::WorkExperience,
        Section::Education,
        Section::Certifications,
        Section::Languages,
        Section::SelfIntroduction,
        Section::PortfolioLinks,
    ];

    /// Stable identifier, also accepted on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Section::PersonalInfo => "personal-info",
            Section::CareerSummary => "career-summary",
            Section::Skills => "skills",
            Section::WorkExperience => "work-experience",
            Section::Education => "education",
            Section::Certifications => "certifications",
            Section::Languages => "languages",
            Section::SelfIntroduction => "self-introduction",
            Section::PortfolioLinks => "portfolio-links",
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Section::PersonalInfo, Locale::English) => "Personal Info",
            (Section::PersonalInfo, Locale::Korean) => "개인정보",
            (Section::CareerSummary, Locale::English) => "Career Summary",
            (Section::CareerSummary, Locale::Korean) => "경력 요약",
            (Section::Skills, Locale::English) => "Skills",
            (Section::Skills, Locale::Korean) => "기술",
            (Section::WorkExperience, Locale::English) => "Work Experience",
            (Section::WorkExperience, Locale::Korean) => "경력 사항",
            (Section::Education, Locale::English) => "Education",
            (Section::Education, Locale::Korean) => "학력",
            (Section::Certifications, Locale::English) => "Certifications",
            (Section::Certifications, Locale::Korean) => "자격증",
            (Section::Languages, Locale::English) => "Languages",
            (Section::Languages, Locale::Korean) => "언어",
            (Section::SelfIntroduction, Locale::English) => "Self Introduction",
            (Section::SelfIntroduction, Locale::Korean) => "자기소개",
            (Section::PortfolioLinks, Locale::English) => "Portfolio Links",
            (Section::PortfolioLinks, Locale::Korean) => "포트폴리오 링크",
        }
    }

    pub fn required(self) -> bool {
        matches!(self, Section::PersonalInfo | Section::SelfIntroduction)
    }

    pub fn is_complete(self, cv: &Cv) -> bool {
        match self {
            Section::PersonalInfo => {
                let info = &cv.personal_info;
                !info.full_name_eng.trim().is_empty() && !info.email.trim().is_empty()
            }
            Section::CareerSummary => !cv.summary.trim().is_empty(),
            Section::Skills => !cv.skills.is_empty(),
            Section::WorkExperience => !cv.experiences.is_empty(),
            Section::Education => !cv.education.is_empty(),
            Section::Certifications => !cv.certifications.is_empty(),
            Section::Languages => !cv.languages.is_empty(),
            Section::SelfIntroduction => cv.self_intro.is_complete(),
            Section::PortfolioLinks => !cv.visible_links().is_empty(),
        }
    }
}

/// Completion state of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionStatus {
    pub section: Section,
    pub complete: bool,
}

/// Status of every section, in editor order.
pub fn completion(cv: &Cv) -> Vec<SectionStatus> {
    Section::ALL
        .iter()
        .map(|&section| SectionStatus {
            section,
            complete: section.is_complete(cv),
        })
        .collect()
}

/// Required sections that are still incomplete.
pub fn missing_required(cv: &Cv) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|s| s.required() && !s.is_complete(cv))
        .collect()
}
