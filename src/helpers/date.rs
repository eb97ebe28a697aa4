//! Date helper functions

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Russian month names in the genitive case ("1 января")
const MONTHS_RU: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Month name for a 1-based month in the given language
pub fn month_name(month: u32, language: &str) -> &'static str {
    let months = if language.starts_with("ru") {
        &MONTHS_RU
    } else {
        &MONTHS_EN
    };
    months[(month.clamp(1, 12) - 1) as usize]
}

/// Format a date for display
///
/// # Examples
/// ```ignore
/// format_date(&date, "ru") // -> "1 июня, 2023"
/// format_date(&date, "en") // -> "1 June, 2023"
/// ```
pub fn format_date<D: Datelike>(date: &D, language: &str) -> String {
    format!(
        "{} {}, {}",
        date.day(),
        month_name(date.month(), language),
        date.year()
    )
}

/// Format a serialized article date (`YYYY-MM-DD[THH:MM:SS]`)
///
/// Returns `None` if the string does not start with a date.
pub fn format_date_str(s: &str, language: &str) -> Option<String> {
    let date = s
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())?;
    Some(format_date(&date, language))
}

/// Format a date in ISO 8601 form for `<time datetime>` attributes
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}
