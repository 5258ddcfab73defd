//! Date rendering for feeds and markup.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised date `{input}`")]
pub struct DateParseError {
    pub input: String,
}

/// Render a date string as an ATOM timestamp (`2013-01-07T14:00:00+00:00`).
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (taken as UTC) and `YYYY-MM-DD`
/// (midnight UTC).
pub fn atom_date(input: &str) -> Result<String, DateParseError> {
    let raw = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.to_rfc3339_opts(SecondsFormat::Secs, false));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DateParseError {
            input: input.to_string(),
        })?;

    Ok(naive.and_utc().to_rfc3339_opts(SecondsFormat::Secs, false))
}

/// A `<time>` element at day resolution. The title is `year-dayOfYear` with
/// a zero-based day.
#[must_use]
pub fn time_element<D: Datelike>(date: &D) -> String {
    let ymd = format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day());
    format!(
        "<time datetime=\"{ymd}\" title=\"{}-{}\">{ymd}</time>",
        date.year(),
        date.ordinal0()
    )
}
