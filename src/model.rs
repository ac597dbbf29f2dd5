//! The CV document model.
//!
//! The in-memory model and the persisted JSON are the same shape: field names
//! are camelCase on the wire and every field carries a serde default, so a
//! record written by an older build (no `photo`, no `order`, no `isKorean`)
//! still loads.
//!
//! ## Ordering
//!
//! List entries (experience, education, certifications, languages) carry an
//! explicit integer `order`. It is the only sequencing signal: storage position
//! is arbitrary, values need not be contiguous or start at zero, and every
//! consumer sorts with [`sorted_by_order`] before display. Reordering swaps
//! `order` values between neighbours ([`move_entry`]) instead of moving array
//! elements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Template identifier assigned to new records.
pub const DEFAULT_TEMPLATE: &str = "template1";

/// Which label dictionary and date locale a document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    English,
    Korean,
}

impl Locale {
    /// Short tag used on the command line and in the `lang` attribute.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Korean => "ko",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "ko" | "kr" | "korean" => Ok(Locale::Korean),
            other => Err(format!("unknown locale '{other}' (expected 'en' or 'ko')")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A résumé. Root persisted entity, one per document a user is authoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cv {
    pub id: String,
    /// Display name of the document (not the person's name).
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub skills: Vec<String>,
    pub experiences: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<LanguageEntry>,
    pub self_intro: SelfIntroduction,
    /// May contain blank placeholders left by the editor.
    pub portfolio_links: Vec<String>,
    pub selected_template: String,
    pub is_korean: bool,
}

impl Default for Cv {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
            personal_info: PersonalInfo::default(),
            summary: String::new(),
            skills: Vec::new(),
            experiences: Vec::new(),
            education: Vec::new(),
            certifications: Vec::new(),
            languages: Vec::new(),
            self_intro: SelfIntroduction::default(),
            portfolio_links: Vec::new(),
            selected_template: DEFAULT_TEMPLATE.to_string(),
            is_korean: false,
        }
    }
}

impl Cv {
    /// Empty record with a fresh identifier, both timestamps set to `now`.
    pub fn new(name: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id("cv"),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    pub fn locale(&self) -> Locale {
        if self.is_korean {
            Locale::Korean
        } else {
            Locale::English
        }
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.is_korean = locale == Locale::Korean;
    }

    /// Add a skill, trimmed. Returns `false` for blanks and duplicates.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, skill: &str) -> bool {
        let before = self.skills.len();
        self.skills.retain(|s| s != skill);
        self.skills.len() != before
    }

    /// Skills with blanks removed, in insertion order.
    pub fn visible_skills(&self) -> Vec<&str> {
        non_blank(&self.skills)
    }

    /// Portfolio links with blank placeholders removed.
    pub fn visible_links(&self) -> Vec<&str> {
        non_blank(&self.portfolio_links)
    }

    pub fn add_experience(&mut self) -> &mut WorkExperience {
        let entry = WorkExperience {
            id: new_id("exp"),
            order: next_order(&self.experiences),
            ..WorkExperience::default()
        };
        push_entry(&mut self.experiences, entry)
    }

    pub fn add_education(&mut self) -> &mut Education {
        let entry = Education {
            id: new_id("edu"),
            order: next_order(&self.education),
            ..Education::default()
        };
        push_entry(&mut self.education, entry)
    }

    pub fn add_certification(&mut self) -> &mut Certification {
        let entry = Certification {
            id: new_id("cert"),
            order: next_order(&self.certifications),
            ..Certification::default()
        };
        push_entry(&mut self.certifications, entry)
    }

    pub fn add_language(&mut self) -> &mut LanguageEntry {
        let entry = LanguageEntry {
            id: new_id("lang"),
            order: next_order(&self.languages),
            ..LanguageEntry::default()
        };
        push_entry(&mut self.languages, entry)
    }
}

fn non_blank(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

fn push_entry<T>(list: &mut Vec<T>, entry: T) -> &mut T {
    list.push(entry);
    let last = list.len() - 1;
    &mut list[last]
}

/// Generate a prefixed opaque identifier, e.g. `cv_3f2a…`.
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

/// Personal details shown in the document header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    /// Name in the primary (Hangul) script.
    pub full_name_kor: String,
    /// Name in Latin script.
    pub full_name_eng: String,
    pub dob: String,
    pub country: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub visa_type: VisaType,
    /// Free-text detail appended to the visa category.
    pub visa_other: String,
    /// `data:` URI of the cropped photo, or empty.
    pub photo: String,
}

impl PersonalInfo {
    pub fn has_photo(&self) -> bool {
        !self.photo.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub start_date: String,
    /// Empty while the role is ongoing.
    pub end_date: String,
    pub description: String,
    pub order: i64,
}

impl WorkExperience {
    /// No end date means the role is still held, whatever the start says.
    pub fn is_ongoing(&self) -> bool {
        self.end_date.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub school: String,
    pub start_date: String,
    pub end_date: String,
    pub notes: String,
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub description: String,
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageEntry {
    pub id: String,
    pub language: String,
    pub proficiency: Proficiency,
    pub score: String,
    pub order: i64,
}

/// Four-part self introduction. Complete only when every part is filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfIntroduction {
    pub intro: String,
    pub experiences: String,
    pub value: String,
    pub motivation: String,
}

impl SelfIntroduction {
    pub fn is_complete(&self) -> bool {
        [&self.intro, &self.experiences, &self.value, &self.motivation]
            .iter()
            .all(|s| !s.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        [&self.intro, &self.experiences, &self.value, &self.motivation]
            .iter()
            .all(|s| s.trim().is_empty())
    }
}

// ============================================================================
// Enumerations stored as their display strings
// ============================================================================

/// Visa category. Stored as its display string; values this build does not
/// know are kept verbatim in [`VisaType::Custom`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VisaType {
    #[default]
    Unset,
    D2Student,
    D4LanguageStudent,
    D10JobSeeker,
    E7ProfessionalWorker,
    F2,
    F4,
    F5,
    F6,
    Other,
    Custom(String),
}

impl VisaType {
    /// Selectable categories in display order.
    pub const CHOICES: [VisaType; 9] = [
        VisaType::D2Student,
        VisaType::D4LanguageStudent,
        VisaType::D10JobSeeker,
        VisaType::E7ProfessionalWorker,
        VisaType::F2,
        VisaType::F4,
        VisaType::F5,
        VisaType::F6,
        VisaType::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            VisaType::Unset => "",
            VisaType::D2Student => "D-2 (Student)",
            VisaType::D4LanguageStudent => "D-4 (Language Student)",
            VisaType::D10JobSeeker => "D-10 (Job Seeker)",
            VisaType::E7ProfessionalWorker => "E-7 (Professional Worker)",
            VisaType::F2 => "F-2",
            VisaType::F4 => "F-4",
            VisaType::F5 => "F-5",
            VisaType::F6 => "F-6",
            VisaType::Other => "Other",
            VisaType::Custom(s) => s,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl From<String> for VisaType {
    fn from(value: String) -> Self {
        if value.trim().is_empty() {
            return VisaType::Unset;
        }
        VisaType::CHOICES
            .into_iter()
            .find(|choice| choice.as_str() == value)
            .unwrap_or(VisaType::Custom(value))
    }
}

impl From<VisaType> for String {
    fn from(value: VisaType) -> Self {
        match value {
            VisaType::Custom(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// Language proficiency level, stored as its display string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Proficiency {
    #[default]
    Unset,
    Beginner,
    Intermediate,
    BusinessLevel,
    Native,
    Custom(String),
}

impl Proficiency {
    pub const CHOICES: [Proficiency; 4] = [
        Proficiency::Beginner,
        Proficiency::Intermediate,
        Proficiency::BusinessLevel,
        Proficiency::Native,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Proficiency::Unset => "",
            Proficiency::Beginner => "Beginner",
            Proficiency::Intermediate => "Intermediate",
            Proficiency::BusinessLevel => "Business Level",
            Proficiency::Native => "Native",
            Proficiency::Custom(s) => s,
        }
    }
}

impl From<String> for Proficiency {
    fn from(value: String) -> Self {
        if value.trim().is_empty() {
            return Proficiency::Unset;
        }
        Proficiency::CHOICES
            .into_iter()
            .find(|choice| choice.as_str() == value)
            .unwrap_or(Proficiency::Custom(value))
    }
}

impl From<Proficiency> for String {
    fn from(value: Proficiency) -> Self {
        match value {
            Proficiency::Custom(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

// ============================================================================
// Ordered list entries
// ============================================================================

/// A list entry sequenced by an explicit `order` key.
pub trait Ordered {
    fn id(&self) -> &str;
    fn order(&self) -> i64;
    fn set_order(&mut self, order: i64);
}

macro_rules! impl_ordered {
    ($($ty:ty),*) => {
        $(impl Ordered for $ty {
            fn id(&self) -> &str {
                &self.id
            }
            fn order(&self) -> i64 {
                self.order
            }
            fn set_order(&mut self, order: i64) {
                self.order = order;
            }
        })*
    };
}

impl_ordered!(WorkExperience, Education, Certification, LanguageEntry);

/// Entries sorted by `order` ascending. Stable: equal keys keep storage order.
pub fn sorted_by_order<T: Ordered>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| item.order());
    sorted
}

/// `order` for a newly appended entry: one past the current maximum.
pub fn next_order<T: Ordered>(items: &[T]) -> i64 {
    items
        .iter()
        .map(Ordered::order)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Remove the entry with `id`. Returns whether anything was removed.
pub fn remove_entry<T: Ordered>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Swap the `order` of entry `id` with its neighbour in sorted order.
///
/// Array positions are left untouched. Returns `false` when the entry is
/// missing or already first (`Up`) / last (`Down`).
pub fn move_entry<T: Ordered>(items: &mut [T], id: &str, direction: Direction) -> bool {
    let mut indices: Vec<usize> = (0..items.len()).collect();
    indices.sort_by_key(|&i| items[i].order());

    let Some(pos) = indices.iter().position(|&i| items[i].id() == id) else {
        return false;
    };
    let neighbour = match direction {
        Direction::Up if pos > 0 => pos - 1,
        Direction::Down if pos + 1 < indices.len() => pos + 1,
        _ => return false,
    };

    let (a, b) = (indices[pos], indices[neighbour]);
    let (order_a, order_b) = (items[a].order(), items[b].order());
    if order_a == order_b {
        // Equal keys would make the swap a no-op; separate them first.
        let (low, high) = match direction {
            Direction::Up => (a, b),
            Direction::Down => (b, a),
        };
        let (low_key, high_key) = match order_a.checked_sub(1) {
            Some(below) => (below, order_a),
            None => (order_a, order_a + 1),
        };
        items[low].set_order(low_key);
        items[high].set_order(high_key);
    } else {
        items[a].set_order(order_b);
        items[b].set_order(order_a);
    }
    true
}
