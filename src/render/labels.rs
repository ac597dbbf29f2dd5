//! Static two-locale label dictionary.

use crate::model::Locale;

/// Every fixed string the document template prints.
#[derive(Debug)]
pub struct Labels {
    pub career_summary: &'static str,
    pub skills: &'static str,
    pub work_experience: &'static str,
    pub education: &'static str,
    pub certifications: &'static str,
    pub languages: &'static str,
    pub self_introduction: &'static str,
    pub portfolio_links: &'static str,

    pub intro: &'static str,
    pub intro_experiences: &'static str,
    pub intro_value: &'static str,
    pub intro_motivation: &'static str,

    pub email: &'static str,
    pub phone: &'static str,
    pub address: &'static str,
    pub country: &'static str,
    pub date_of_birth: &'static str,
    pub visa: &'static str,
    pub score: &'static str,

    pub present: &'static str,
    pub no_photo: &'static str,
    pub photo_alt: &'static str,
}

pub static ENGLISH: Labels = Labels {
    career_summary: "Career Summary",
    skills: "Skills",
    work_experience: "Work Experience",
    education: "Education",
    certifications: "Certifications",
    languages: "Languages",
    self_introduction: "Self Introduction",
    portfolio_links: "Portfolio & Links",

    intro: "Introduction",
    intro_experiences: "Experiences",
    intro_value: "Value Proposition",
    intro_motivation: "Motivation",

    email: "Email",
    phone: "Phone",
    address: "Address",
    country: "Country",
    date_of_birth: "Date of Birth",
    visa: "Visa",
    score: "Score",

    present: "Present",
    no_photo: "No Photo",
    photo_alt: "Profile photo",
};

pub static KOREAN: Labels = Labels {
    career_summary: "경력 요약",
    skills: "기술",
    work_experience: "경력 사항",
    education: "학력",
    certifications: "자격증",
    languages: "언어",
    self_introduction: "자기소개",
    portfolio_links: "포트폴리오 및 링크",

    intro: "소개",
    intro_experiences: "경험",
    intro_value: "가치 제안",
    intro_motivation: "지원 동기",

    email: "이메일",
    phone: "전화",
    address: "주소",
    country: "국적",
    date_of_birth: "생년월일",
    visa: "비자 유형",
    score: "점수",

    present: "현재",
    no_photo: "사진 없음",
    photo_alt: "프로필 사진",
};

pub fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::English => &ENGLISH,
        Locale::Korean => &KOREAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locales_have_distinct_present_labels() {
        assert_eq!(labels(Locale::English).present, "Present");
        assert_eq!(labels(Locale::Korean).present, "현재");
    }

    #[test]
    fn placeholder_text_is_localized() {
        assert_eq!(labels(Locale::English).no_photo, "No Photo");
        assert_eq!(labels(Locale::Korean).no_photo, "사진 없음");
    }
}
