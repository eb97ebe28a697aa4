//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

const DELIMITER: &str = "---";

/// Errors raised while splitting a file into front-matter and body
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("missing `---` front-matter delimiter at the start of the file")]
    MissingDelimiter,

    #[error("front-matter block is not closed by a `---` line")]
    Unclosed,

    #[error("front-matter block is empty")]
    Empty,

    #[error("invalid front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("could not serialize front-matter: {0}")]
    Serialize(serde_yaml::Error),
}

/// Treat `tag:` and `tag: ""` the same as a missing tag
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Front-matter data of an article
///
/// Only the recognized keys are kept; anything else in the block is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: String,
    #[serde(with = "iso_date")]
    pub date: NaiveDateTime,
    pub description: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub tag: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut offset = 0;
        let mut block_start = None;

        for line in content.split_inclusive('\n') {
            let line_end = offset + line.len();
            let trimmed = line.trim_end();

            match block_start {
                // Leading blank lines are allowed before the opening delimiter
                None if trimmed.is_empty() => {}
                None if trimmed == DELIMITER => block_start = Some(line_end),
                None => return Err(FrontMatterError::MissingDelimiter),
                Some(start) if trimmed == DELIMITER => {
                    let front_matter = Self::from_yaml(&content[start..offset])?;
                    let body = content[line_end..].trim_start_matches(['\n', '\r']);
                    return Ok((front_matter, body));
                }
                Some(_) => {}
            }

            offset = line_end;
        }

        match block_start {
            Some(_) => Err(FrontMatterError::Unclosed),
            None => Err(FrontMatterError::MissingDelimiter),
        }
    }

    fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        if yaml.trim().is_empty() {
            return Err(FrontMatterError::Empty);
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serialize back into a `---` delimited block, ready to prepend to a body
    pub fn to_block(&self) -> Result<String, FrontMatterError> {
        let yaml = serde_yaml::to_string(self).map_err(FrontMatterError::Serialize)?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
    }
}

/// Parse a date string in the accepted ISO-8601 shapes
///
/// Offsets are folded into UTC so every article shares one timeline.
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Serde adapter for article dates
///
/// Midnight values are written as a bare `YYYY-MM-DD`.
pub(crate) mod iso_date {
    use chrono::{NaiveDateTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_date_string(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid date `{}`", s)))
    }

    pub fn format(date: &NaiveDateTime) -> String {
        if date.nanosecond() != 0 {
            date.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
        } else if date.num_seconds_from_midnight() == 0 {
            date.format("%Y-%m-%d").to_string()
        } else {
            date.format("%Y-%m-%dT%H:%M:%S").to_string()
        }
    }
}
