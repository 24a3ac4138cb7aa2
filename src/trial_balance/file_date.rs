//! Representative month of a workbook, derived from its filename.

use std::path::Path;

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::trial_balance::model::first_of_month;

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("year pattern is valid"));

static YEAR_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})-(\d{1,2})|(\d{1,2})-(\d{4})").expect("year/month pattern is valid")
});

/// Month tokens searched in this order; the first substring hit wins.
const MONTH_TOKENS: [(&str, u32); 12] = [
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Resolves the month a workbook covers from its file stem.
///
/// Filenames without a 4-digit year resolve to the current month.
pub fn resolve(path: &Path) -> NaiveDate {
    resolve_at(path, Local::now().date_naive())
}

/// Same as [`resolve`] with an explicit "today" for the fallback.
pub fn resolve_at(path: &Path, today: NaiveDate) -> NaiveDate {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Some(year) = YEAR
        .find(&stem)
        .and_then(|found| found.as_str().parse::<i32>().ok())
    else {
        warn!(file = %path.display(), "no year in filename, using the current month");
        return first_of_month(today);
    };

    if let Some(date) = numeric_year_month(&stem)
        .and_then(|(year, month)| NaiveDate::from_ymd_opt(year, month, 1))
    {
        return date;
    }

    let month = month_from_name(&stem).unwrap_or(1);
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_else(|| first_of_month(today))
}

fn numeric_year_month(stem: &str) -> Option<(i32, u32)> {
    let captures = YEAR_MONTH.captures(stem)?;
    let (year, month) = match (captures.get(1), captures.get(2)) {
        (Some(year), Some(month)) => (year, month),
        _ => (captures.get(4)?, captures.get(3)?),
    };
    Some((year.as_str().parse().ok()?, month.as_str().parse().ok()?))
}

fn month_from_name(stem: &str) -> Option<u32> {
    let lower = stem.to_lowercase();
    MONTH_TOKENS
        .iter()
        .find(|(token, _)| lower.contains(token))
        .map(|(_, month)| *month)
}
