//! Text and date formatting for the document template.

use chrono::{DateTime, Datelike, NaiveDate};
use maud::{Markup, html};

use crate::model::Locale;

/// Long month + year, e.g. `March 2020` or `2020년 3월`.
///
/// Accepts `YYYY-MM`, `YYYY-MM-DD` and RFC 3339 timestamps. Empty input gives
/// an empty string; anything else that does not parse is returned verbatim.
pub fn format_date(value: &str, locale: Locale) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    match parse_date(value) {
        Some(date) => match locale {
            Locale::English => date.format("%B %Y").to_string(),
            Locale::Korean => format!("{}년 {}월", date.year(), date.month()),
        },
        None => value.to_string(),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Date span for an entry. With a `present` label, an empty end date reads as
/// ongoing even when the start is missing too.
pub fn date_range(start: &str, end: &str, locale: Locale, present: Option<&str>) -> String {
    let start = format_date(start, locale);
    let end = match (format_date(end, locale), present) {
        (end, Some(label)) if end.is_empty() => label.to_string(),
        (end, _) => end,
    };
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} – {end}"),
        (false, true) => start,
        (true, false) => end,
        (true, true) => String::new(),
    }
}

/// Escaped text with every newline turned into a hard `<br>`.
pub fn text_with_breaks(text: &str) -> Markup {
    let lines: Vec<&str> = text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    let last = lines.len().saturating_sub(1);
    html! {
        @for (i, line) in lines.iter().enumerate() {
            (line)
            @if i < last {
                br;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // format_date
    // =========================================================================

    #[test]
    fn month_input_formats_long_english() {
        assert_eq!(format_date("2020-03", Locale::English), "March 2020");
    }

    #[test]
    fn full_date_formats_korean() {
        assert_eq!(format_date("2020-03-15", Locale::Korean), "2020년 3월");
    }

    #[test]
    fn rfc3339_timestamp_formats() {
        assert_eq!(
            format_date("2021-11-02T09:30:00Z", Locale::English),
            "November 2021"
        );
    }

    #[test]
    fn empty_date_is_empty() {
        assert_eq!(format_date("", Locale::English), "");
        assert_eq!(format_date("   ", Locale::Korean), "");
    }

    #[test]
    fn unparseable_date_is_verbatim() {
        assert_eq!(format_date("Spring 2019", Locale::English), "Spring 2019");
    }

    // =========================================================================
    // date_range
    // =========================================================================

    #[test]
    fn ongoing_range_uses_present_label() {
        assert_eq!(
            date_range("2021-04", "", Locale::English, Some("Present")),
            "April 2021 – Present"
        );
    }

    #[test]
    fn closed_range_ignores_present_label() {
        assert_eq!(
            date_range("2019-01", "2020-06", Locale::English, Some("Present")),
            "January 2019 – June 2020"
        );
    }

    #[test]
    fn range_without_dates_is_empty() {
        assert_eq!(date_range("", "", Locale::English, None), "");
        assert_eq!(date_range("", "2020-06", Locale::English, None), "June 2020");
    }

    #[test]
    fn missing_end_reads_present_without_start() {
        assert_eq!(date_range("", "", Locale::English, Some("Present")), "Present");
        assert_eq!(date_range("", "  ", Locale::Korean, Some("현재")), "현재");
    }

    // =========================================================================
    // text_with_breaks
    // =========================================================================

    #[test]
    fn newlines_become_hard_breaks() {
        let html = text_with_breaks("line one\nline two\n\nline four").into_string();
        assert_eq!(html, "line one<br>line two<br><br>line four");
    }

    #[test]
    fn text_is_escaped() {
        let html = text_with_breaks("<b>bold</b> & co").into_string();
        assert_eq!(html, "&lt;b&gt;bold&lt;/b&gt; &amp; co");
    }

    #[test]
    fn crlf_input_does_not_leak_carriage_returns() {
        let html = text_with_breaks("a\r\nb").into_string();
        assert_eq!(html, "a<br>b");
    }
}
