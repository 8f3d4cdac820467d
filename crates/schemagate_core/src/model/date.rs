//! ISO-8601 date string parsing for `datetime` columns.
//!
//! Accepted: extended-format calendar dates, optionally followed by a time
//! (`HH`, `HH:MM`, `HH:MM:SS[.fff]`) and an offset (`Z`, `+HH:MM`, `+HHMM`).
//! Basic-format (`20240301`), week and ordinal dates are rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const OFFSET_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601 date or date-time string.
///
/// Accepts RFC 3339 timestamps with an offset, naive date-times and plain
/// dates. Values without an offset are interpreted as UTC.
pub fn parse_date_string(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(trimmed, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    if let Some(naive) = parse_date_hour(trimmed) {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `YYYY-MM-DDTHH`, which chrono will not parse without minutes.
fn parse_date_hour(value: &str) -> Option<NaiveDateTime> {
    let (date, rest) = NaiveDate::parse_and_remainder(value, "%Y-%m-%d").ok()?;
    let hour = rest.strip_prefix('T')?;
    if hour.len() != 2 || !hour.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    date.and_hms_opt(hour.parse().ok()?, 0, 0)
}

/// Canonical storage form: RFC 3339, millisecond precision, `Z` suffix.
pub fn format_date_string(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{format_date_string, parse_date_string};
    use chrono::{TimeZone, Utc};

    #[test]
    fn accepts_common_iso_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

        assert_eq!(parse_date_string("2024-03-01T09:30:00Z"), Some(expected));
        assert_eq!(parse_date_string("2024-03-01T11:30:00+02:00"), Some(expected));
        assert_eq!(parse_date_string("2024-03-01T09:30:00"), Some(expected));
        assert_eq!(parse_date_string("2024-03-01 09:30:00.000"), Some(expected));
        assert_eq!(parse_date_string("2024-03-01T09:30"), Some(expected));
        assert_eq!(
            parse_date_string("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn accepts_compact_offsets_and_bare_hours() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        assert_eq!(parse_date_string("2024-03-01T11:00:00+0200"), Some(expected));
        assert_eq!(parse_date_string("2024-03-01T11:00+0200"), Some(expected));
        assert_eq!(parse_date_string("2024-03-01T09"), Some(expected));
        assert_eq!(parse_date_string("2024-03-01T24"), None);
        assert_eq!(parse_date_string("20240301"), None);
    }

    #[test]
    fn rejects_non_dates() {
        assert_eq!(parse_date_string(""), None);
        assert_eq!(parse_date_string("yesterday"), None);
        assert_eq!(parse_date_string("2024-13-01"), None);
        assert_eq!(parse_date_string("2024-02-30T00:00:00Z"), None);
        assert_eq!(parse_date_string("01/03/2024"), None);
    }

    #[test]
    fn storage_format_roundtrips() {
        let value = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let text = format_date_string(&value);

        assert_eq!(text, "2023-12-31T23:59:59.000Z");
        assert_eq!(parse_date_string(&text), Some(value));
    }
}
