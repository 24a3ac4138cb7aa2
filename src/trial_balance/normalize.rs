//! Column label → canonical month conversion.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::trial_balance::model::{Cell, ColumnKey, first_of_month};

/// Month name (full or abbreviated) followed by a 4-digit year, anchored at
/// the start of the label.
static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?",
        r"|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\s+(\d{4})",
    ))
    .expect("month/year pattern is valid")
});

const MONTH_PREFIXES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Formats without a day component. They are parsed with a synthetic `1 `
/// prefix because chrono needs a day to build a date.
const MONTH_ONLY_FORMATS: [&str; 2] = ["%b %Y", "%B %Y"];

const FULL_DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y"];

/// Converts a header cell into a column key.
///
/// Dates pass through (moved to the first of their month), text is parsed
/// with [`parse_month`], and everything else is kept verbatim as a label
/// column.
pub fn normalize(label: &Cell) -> ColumnKey {
    match label {
        Cell::Date(date) => ColumnKey::month(*date),
        Cell::Text(text) => match parse_month(text) {
            Some(month) => ColumnKey::Month(month),
            None => ColumnKey::Label(text.clone()),
        },
        other => ColumnKey::Label(other.to_label()),
    }
}

/// Parses a date-like label into the first day of its month.
pub fn parse_month(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    match_month_year(text)
        .or_else(|| parse_strict(text))
        .map(first_of_month)
}

fn match_month_year(text: &str) -> Option<NaiveDate> {
    let captures = MONTH_YEAR.captures(text)?;
    let name = captures.get(1)?.as_str().to_ascii_lowercase();
    let month = MONTH_PREFIXES
        .iter()
        .position(|prefix| name.starts_with(prefix))?;
    let year = captures.get(2)?.as_str().parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month as u32 + 1, 1)
}

fn parse_strict(text: &str) -> Option<NaiveDate> {
    let with_day = format!("1 {text}");
    MONTH_ONLY_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&with_day, &format!("%d {format}")).ok())
        .or_else(|| {
            FULL_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn common_spellings_share_one_month() {
        let expected = Some(ymd(2023, 1, 1));
        for label in ["January 2023", "Jan 2023", "01/01/2023", "2023-01-01", "01-15-2023"] {
            assert_eq!(parse_month(label), expected, "label {label}");
        }
    }

    #[test]
    fn month_names_ignore_case_and_trailing_text() {
        assert_eq!(parse_month("MARCH 2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_month("sept 2022"), Some(ymd(2022, 9, 1)));
        assert_eq!(parse_month("December 2021 (Actual)"), Some(ymd(2021, 12, 1)));
    }

    #[test]
    fn day_is_forced_to_first() {
        assert_eq!(parse_month("12/31/2022"), Some(ymd(2022, 12, 1)));
        assert_eq!(normalize(&Cell::Date(ymd(2023, 6, 30))), ColumnKey::Month(ymd(2023, 6, 1)));
    }

    #[test]
    fn unrecognised_labels_are_kept_verbatim() {
        assert_eq!(normalize(&Cell::from("Notes")), ColumnKey::Label("Notes".into()));
        assert_eq!(normalize(&Cell::from("Total")), ColumnKey::Label("Total".into()));
        assert_eq!(normalize(&Cell::Number(2023.0)), ColumnKey::Label("2023".into()));
        assert_eq!(parse_month("13/01/2023"), None);
        assert_eq!(parse_month(""), None);
    }
}
