//! Document rendering.
//!
//! Turns a [`Cv`] plus a [`Locale`] into a complete, self-contained HTML
//! document: the markup that the preview shows and the rasterizer prints.
//! Rendering is pure; the same record and locale always give the same bytes.
//!
//! ## Layout
//!
//! Everything sits inside a single `.cv-page` container fixed at A4 width, so
//! the offscreen rasterizer can measure one element and capture it whole.
//!
//! ```text
//! .cv-page
//! ├── header.cv-header       name, contact lines, photo or placeholder
//! ├── section.summary
//! ├── section.skills
//! ├── section.experience     entries sorted by `order`
//! ├── section.education
//! ├── section.certifications
//! ├── section.languages
//! ├── section.self-intro
//! └── section.links
//! ```
//!
//! A section whose content is empty is omitted entirely, never printed with a
//! bare heading. Free text keeps its line breaks (see
//! [`format::text_with_breaks`]) and dates go through [`format::format_date`].
//!
//! ## Templates
//!
//! Records carry a `selectedTemplate` identifier. Only the classic layout is
//! implemented; any other identifier renders with it.
//!
//! ## CSS
//!
//! `static/document.css` is embedded at compile time and inlined into the
//! document head, so the output has no external references apart from the
//! photo, which is itself a `data:` URI.

pub mod format;
pub mod labels;

use maud::{DOCTYPE, Markup, html};

use crate::model::{Cv, Locale, sorted_by_order};
use format::{date_range, format_date, text_with_breaks};
use labels::{Labels, labels};

const CSS: &str = include_str!("../../static/document.css");

/// Identifiers that select the classic layout explicitly.
const CLASSIC_IDS: [&str; 2] = ["template1", "classic"];

/// Available document layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Classic,
}

impl Template {
    /// Resolve a stored template identifier, falling back to the classic layout.
    pub fn resolve(id: &str) -> Template {
        if !CLASSIC_IDS.contains(&id) {
            tracing::debug!(template = id, "unknown template, using classic layout");
        }
        Template::Classic
    }
}

/// Render `cv` as a full HTML document in `locale`.
pub fn render_document(cv: &Cv, locale: Locale) -> Markup {
    let body = match Template::resolve(&cv.selected_template) {
        Template::Classic => render_classic(cv, locale),
    };
    let title = if cv.name.trim().is_empty() {
        "CV"
    } else {
        cv.name.as_str()
    };
    base_document(title, locale, body)
}

fn base_document(title: &str, locale: Locale, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(locale.tag()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

// ============================================================================
// Classic layout
// ============================================================================

fn render_classic(cv: &Cv, locale: Locale) -> Markup {
    let l = labels(locale);
    html! {
        div.cv-page {
            (render_header(cv, l))
            (render_summary(cv, l))
            (render_skills(cv, l))
            (render_experience(cv, locale, l))
            (render_education(cv, locale, l))
            (render_certifications(cv, locale, l))
            (render_languages(cv, l))
            (render_self_intro(cv, l))
            (render_links(cv, l))
        }
    }
}

fn render_header(cv: &Cv, l: &Labels) -> Markup {
    let info = &cv.personal_info;
    let eng = info.full_name_eng.trim();
    let kor = info.full_name_kor.trim();

    let visa = if info.visa_type.is_unset() {
        String::new()
    } else if info.visa_other.trim().is_empty() {
        info.visa_type.as_str().to_string()
    } else {
        format!("{} - {}", info.visa_type.as_str(), info.visa_other.trim())
    };
    let contact = [
        (l.email, info.email.trim()),
        (l.phone, info.phone.trim()),
        (l.address, info.address.trim()),
        (l.country, info.country.trim()),
        (l.date_of_birth, info.dob.trim()),
        (l.visa, visa.as_str()),
    ];

    html! {
        header.cv-header {
            div.identity {
                h1.name {
                    @if !eng.is_empty() {
                        (eng)
                        @if !kor.is_empty() {
                            " "
                            span.name-secondary { "(" (kor) ")" }
                        }
                    } @else {
                        (kor)
                    }
                }
                div.contact {
                    @for (label, value) in contact {
                        @if !value.is_empty() {
                            div.contact-line {
                                strong { (label) ":" }
                                " " (value)
                            }
                        }
                    }
                }
            }
            @if info.has_photo() {
                img.photo src=(info.photo) alt=(l.photo_alt);
            } @else {
                div.photo-placeholder { (l.no_photo) }
            }
        }
    }
}

fn section(class: &str, heading: &str, content: Markup) -> Markup {
    html! {
        section class=(class) {
            h2 { (heading) }
            (content)
        }
    }
}

fn render_summary(cv: &Cv, l: &Labels) -> Markup {
    if cv.summary.trim().is_empty() {
        return html! {};
    }
    section(
        "summary",
        l.career_summary,
        html! { div.text { (text_with_breaks(&cv.summary)) } },
    )
}

fn render_skills(cv: &Cv, l: &Labels) -> Markup {
    let skills = cv.visible_skills();
    if skills.is_empty() {
        return html! {};
    }
    section(
        "skills",
        l.skills,
        html! {
            div.skill-list {
                @for skill in skills {
                    span.skill { (skill) }
                }
            }
        },
    )
}

/// One dated entry: heading, subtitle, date span and optional body text.
fn entry(title: &str, subtitle: &str, dates: &str, body: &str) -> Markup {
    html! {
        div.entry {
            div.entry-head {
                div {
                    h3 { (title) }
                    @if !subtitle.trim().is_empty() {
                        p.subtitle { (subtitle) }
                    }
                }
                @if !dates.is_empty() {
                    div.dates { (dates) }
                }
            }
            @if !body.trim().is_empty() {
                div.text { (text_with_breaks(body)) }
            }
        }
    }
}

fn render_experience(cv: &Cv, locale: Locale, l: &Labels) -> Markup {
    if cv.experiences.is_empty() {
        return html! {};
    }
    section(
        "experience",
        l.work_experience,
        html! {
            @for exp in sorted_by_order(&cv.experiences) {
                (entry(
                    &exp.title,
                    &exp.company,
                    &date_range(&exp.start_date, &exp.end_date, locale, Some(l.present)),
                    &exp.description,
                ))
            }
        },
    )
}

fn render_education(cv: &Cv, locale: Locale, l: &Labels) -> Markup {
    if cv.education.is_empty() {
        return html! {};
    }
    section(
        "education",
        l.education,
        html! {
            @for edu in sorted_by_order(&cv.education) {
                (entry(
                    &edu.degree,
                    &edu.school,
                    &date_range(&edu.start_date, &edu.end_date, locale, None),
                    &edu.notes,
                ))
            }
        },
    )
}

fn render_certifications(cv: &Cv, locale: Locale, l: &Labels) -> Markup {
    if cv.certifications.is_empty() {
        return html! {};
    }
    section(
        "certifications",
        l.certifications,
        html! {
            @for cert in sorted_by_order(&cv.certifications) {
                (entry(
                    &cert.name,
                    &cert.issuer,
                    &format_date(&cert.date, locale),
                    &cert.description,
                ))
            }
        },
    )
}

fn render_languages(cv: &Cv, l: &Labels) -> Markup {
    if cv.languages.is_empty() {
        return html! {};
    }
    section(
        "languages",
        l.languages,
        html! {
            div.language-grid {
                @for lang in sorted_by_order(&cv.languages) {
                    div.language {
                        div.language-head {
                            h3 { (lang.language) }
                            span.proficiency { (lang.proficiency.as_str()) }
                        }
                        @if !lang.score.trim().is_empty() {
                            p.score { (l.score) ": " (lang.score) }
                        }
                    }
                }
            }
        },
    )
}

fn render_self_intro(cv: &Cv, l: &Labels) -> Markup {
    let intro = &cv.self_intro;
    if intro.is_empty() {
        return html! {};
    }
    let parts = [
        (l.intro, &intro.intro),
        (l.intro_experiences, &intro.experiences),
        (l.intro_value, &intro.value),
        (l.intro_motivation, &intro.motivation),
    ];
    section(
        "self-intro",
        l.self_introduction,
        html! {
            @for (heading, text) in parts {
                @if !text.trim().is_empty() {
                    div.intro-part {
                        h3 { (heading) }
                        div.text { (text_with_breaks(text)) }
                    }
                }
            }
        },
    )
}

fn render_links(cv: &Cv, l: &Labels) -> Markup {
    let links = cv.visible_links();
    if links.is_empty() {
        return html! {};
    }
    section(
        "links",
        l.portfolio_links,
        html! {
            ul.link-list {
                @for link in links {
                    li { a href=(link) { (link) } }
                }
            }
        },
    )
}
