//! Plain-text rendering for CLI output.

use std::fmt::Write as _;

use crate::config::DisplayConfig;
use crate::crime::{format_date, Crime};
use crate::storage::CrimeStats;
use crate::theme::Theme;

/// Lines of details shown under each list row.
const DETAIL_PREVIEW_LINES: usize = 2;

/// Render records as a list, one row per record plus a short details preview.
#[must_use]
pub fn render_list(crimes: &[Crime], display: &DisplayConfig) -> String {
    if crimes.is_empty() {
        return "No Crimes Recorded\nRun `crimes add --title <TITLE>` to add your first crime\n"
            .to_string();
    }

    let mut out = String::new();
    for crime in crimes {
        let solved = if crime.is_solved { "  [solved]" } else { "" };
        let _ = writeln!(
            out,
            "{}  {}  {}{solved}",
            crime.id,
            format_date(&crime.date, &display.date_format),
            crime.display_title(),
        );
        for line in crime.details.lines().take(DETAIL_PREVIEW_LINES) {
            let _ = writeln!(out, "    {line}");
        }
    }
    out
}

/// Render every field of one record.
#[must_use]
pub fn render_crime(crime: &Crime, display: &DisplayConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", crime.display_title());
    let _ = writeln!(out, "{}", "-".repeat(crime.display_title().chars().count()));
    let _ = writeln!(out, "Id:        {}", crime.id);
    let _ = writeln!(
        out,
        "Date:      {}",
        format_date(&crime.date, &display.date_format)
    );
    let _ = writeln!(
        out,
        "Solved:    {}",
        if crime.is_solved { "yes" } else { "no" }
    );
    if let Some(photo) = &crime.photo_uri {
        let _ = writeln!(out, "Photo:     {photo}");
    }
    let _ = writeln!(out, "Created:   {}", crime.created_at.to_rfc3339());
    let _ = writeln!(out, "Updated:   {}", crime.updated_at.to_rfc3339());
    if !crime.details.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", crime.details);
    }
    out
}

/// Render collection statistics.
#[must_use]
pub fn render_stats(stats: &CrimeStats, display: &DisplayConfig) -> String {
    let date = |d: Option<chrono::DateTime<chrono::Utc>>| {
        d.map_or_else(
            || "-".to_string(),
            |d| format_date(&d, &display.date_format),
        )
    };

    let mut out = String::new();
    let _ = writeln!(out, "Crimes:      {}", stats.total);
    let _ = writeln!(out, "Solved:      {}", stats.solved);
    let _ = writeln!(out, "Open:        {}", stats.open());
    let _ = writeln!(out, "With photo:  {}", stats.with_photo);
    let _ = writeln!(out, "Oldest:      {}", date(stats.oldest));
    let _ = writeln!(out, "Newest:      {}", date(stats.newest));
    out
}

/// Render the theme list grouped into light and dark, marking `current`.
#[must_use]
pub fn render_themes(themes: &[Theme], current: &Theme) -> String {
    let mut out = String::new();
    for (heading, dark) in [("Light Themes", false), ("Dark Themes", true)] {
        let _ = writeln!(out, "{heading}");
        for theme in themes.iter().filter(|t| t.is_dark == dark) {
            let marker = if theme.id == current.id { '*' } else { ' ' };
            let _ = writeln!(out, "  {marker} {:<10} {}", theme.id, theme.name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crime::CrimeFormData;
    use crate::theme::{find_theme, THEMES};
    use chrono::{TimeZone, Utc};

    fn crime(id: &str, title: &str, details: &str, solved: bool) -> Crime {
        let form = CrimeFormData {
            title: title.to_string(),
            details: details.to_string(),
            is_solved: solved,
            ..CrimeFormData::new(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap())
        };
        Crime::from_form(id, form, Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_render_empty_list() {
        let out = render_list(&[], &DisplayConfig::default());
        assert!(out.contains("No Crimes Recorded"));
    }

    #[test]
    fn test_render_list_rows() {
        let crimes = vec![
            crime("a", "Theft", "line one\nline two\nline three", true),
            crime("b", "", "", false),
        ];
        let out = render_list(&crimes, &DisplayConfig::default());

        assert!(out.contains("a  Fri, Jan 5, 2024  Theft  [solved]"));
        assert!(out.contains("    line two"));
        assert!(!out.contains("line three"));
        assert!(out.contains("b  Fri, Jan 5, 2024  Untitled Crime\n"));
    }

    #[test]
    fn test_render_crime() {
        let mut c = crime("a", "Theft", "Bike taken", false);
        c.photo_uri = Some("file:///bike.jpg".to_string());
        let out = render_crime(&c, &DisplayConfig::default());

        assert!(out.starts_with("Theft\n-----\n"));
        assert!(out.contains("Solved:    no"));
        assert!(out.contains("Photo:     file:///bike.jpg"));
        assert!(out.ends_with("Bike taken\n"));
    }

    #[test]
    fn test_render_stats() {
        let crimes = vec![crime("a", "A", "", true), crime("b", "B", "", false)];
        let out = render_stats(&CrimeStats::from_crimes(&crimes), &DisplayConfig::default());
        assert!(out.contains("Crimes:      2"));
        assert!(out.contains("Open:        1"));
        assert!(out.contains("Oldest:      Fri, Jan 5, 2024"));
    }

    #[test]
    fn test_render_stats_empty() {
        let out = render_stats(&CrimeStats::default(), &DisplayConfig::default());
        assert!(out.contains("Newest:      -"));
    }

    #[test]
    fn test_render_themes_marks_current() {
        let current = find_theme("dark").unwrap();
        let out = render_themes(THEMES, current);

        let light = out.find("Light Themes").unwrap();
        let dark = out.find("Dark Themes").unwrap();
        assert!(light < dark);
        assert!(out.contains("  * dark"));
        assert!(out.contains("    light"));
    }
}
