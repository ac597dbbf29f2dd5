//! CLI output formatting.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! 001 Backend roles (en)
//!     Id: cv_3f2a9c…
//!     Updated: 2024-03-02 14:05 UTC
//! 002 이력서 (ko)
//!     Id: cv_91bb04…
//!     Updated: 2024-02-27 09:12 UTC
//! ```
//!
//! ## Status
//!
//! ```text
//! Backend roles
//!     [x] Personal Info (required)
//!     [ ] Career Summary
//!     ...
//!     [ ] Self Introduction (required)
//! Missing required: Self Introduction
//! ```
//!
//! ## Notifications
//!
//! ```text
//! CV not found
//!     The requested CV could not be found
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use std::path::Path;

use crate::model::{Cv, Locale};
use crate::sections::{completion, missing_required};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

/// First line of free text, for one-line previews.
fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

fn display_name(cv: &Cv) -> &str {
    if cv.name.trim().is_empty() {
        "(untitled)"
    } else {
        cv.name.as_str()
    }
}

// ============================================================================
// Views
// ============================================================================

/// The CV list, newest first as given.
pub fn format_cv_list(cvs: &[Cv]) -> Vec<String> {
    if cvs.is_empty() {
        return vec!["No CVs yet. Create one with: cvpress new <name>".to_string()];
    }
    let mut lines = Vec::new();
    for (i, cv) in cvs.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            display_name(cv),
            cv.locale()
        ));
        lines.push(format!("{}Id: {}", indent(1), cv.id));
        lines.push(format!(
            "{}Updated: {}",
            indent(1),
            cv.updated_at.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    lines
}

/// Record overview for `show`.
pub fn format_cv_details(cv: &Cv) -> Vec<String> {
    let info = &cv.personal_info;
    let mut lines = vec![display_name(cv).to_string()];
    lines.push(format!("{}Id: {}", indent(1), cv.id));
    lines.push(format!(
        "{}Created: {}",
        indent(1),
        cv.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.push(format!(
        "{}Updated: {}",
        indent(1),
        cv.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.push(format!("{}Locale: {}", indent(1), cv.locale()));
    lines.push(format!("{}Template: {}", indent(1), cv.selected_template));

    let name = match (info.full_name_eng.trim(), info.full_name_kor.trim()) {
        ("", "") => None,
        (eng, "") => Some(eng.to_string()),
        ("", kor) => Some(kor.to_string()),
        (eng, kor) => Some(format!("{eng} ({kor})")),
    };
    if let Some(name) = name {
        lines.push(format!("{}Name: {}", indent(1), name));
    }
    if !info.email.trim().is_empty() {
        lines.push(format!("{}Email: {}", indent(1), info.email.trim()));
    }
    if info.has_photo() {
        lines.push(format!("{}Photo: yes", indent(1)));
    }
    if !cv.summary.trim().is_empty() {
        lines.push(format!(
            "{}Summary: {}",
            indent(1),
            truncate(first_line(&cv.summary), 60)
        ));
    }
    let skills = cv.visible_skills();
    if !skills.is_empty() {
        lines.push(format!("{}Skills: {}", indent(1), skills.join(", ")));
    }
    let counts = [
        ("Experience", cv.experiences.len()),
        ("Education", cv.education.len()),
        ("Certifications", cv.certifications.len()),
        ("Languages", cv.languages.len()),
    ];
    for (label, n) in counts {
        if n > 0 {
            lines.push(format!("{}{}: {} entries", indent(1), label, n));
        }
    }
    lines
}

/// Per-section completion checklist in the record's own locale.
pub fn format_status(cv: &Cv) -> Vec<String> {
    format_status_in(cv, cv.locale())
}

pub fn format_status_in(cv: &Cv, locale: Locale) -> Vec<String> {
    let mut lines = vec![display_name(cv).to_string()];
    for status in completion(cv) {
        let mark = if status.complete { "[x]" } else { "[ ]" };
        let required = if status.section.required() {
            " (required)"
        } else {
            ""
        };
        lines.push(format!(
            "{}{} {}{}",
            indent(1),
            mark,
            status.section.label(locale),
            required
        ));
    }
    let missing: Vec<&str> = missing_required(cv)
        .into_iter()
        .map(|s| s.label(locale))
        .collect();
    if !missing.is_empty() {
        lines.push(format!("Missing required: {}", missing.join(", ")));
    }
    lines
}

/// A user-facing notification: title plus an indented description.
pub fn format_notification(title: &str, description: &str) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    if !description.is_empty() {
        lines.push(format!("{}{}", indent(1), description));
    }
    lines
}

pub fn format_export_result(path: &Path, pages: usize) -> Vec<String> {
    let noun = if pages == 1 { "page" } else { "pages" };
    vec![format!("Exported {} {} → {}", pages, noun, path.display())]
}

// ============================================================================
// Printers
// ============================================================================

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_cv_list(cvs: &[Cv]) {
    print_lines(format_cv_list(cvs));
}

pub fn print_cv_details(cv: &Cv) {
    print_lines(format_cv_details(cv));
}

pub fn print_status(cv: &Cv) {
    print_lines(format_status(cv));
}

pub fn print_notification(title: &str, description: &str) {
    print_lines(format_notification(title, description));
}

pub fn print_export_result(path: &Path, pages: usize) {
    print_lines(format_export_result(path, pages));
}
