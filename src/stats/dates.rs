//! Calendar date parsing used to put the date averages in time order.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%a %b %d %Y",
    "%a, %b %d, %Y",
];

/// Date-time forms without an offset; `%.f` also matches no fraction.
const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Drop a trailing parenthesised note such as `(Friday)` or `(UTC)`.
fn strip_comment(text: &str) -> &str {
    match (text.ends_with(')'), text.rfind('(')) {
        (true, Some(open)) => text[..open].trim_end(),
        _ => text,
    }
}

/// Parse the date column text into a calendar day.
///
/// Plain dates, long month names, date-times with or without fractional
/// seconds, and RFC 3339 / RFC 2822 timestamps are accepted. Anything with a
/// time of day is reduced to its date part.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let text = strip_comment(raw.trim());
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .or_else(|_| DateTime::parse_from_rfc2822(text))
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        assert_eq!(parse_calendar_date("2023-02-01"), Some(expected));
        assert_eq!(parse_calendar_date("2023/02/01"), Some(expected));
        assert_eq!(parse_calendar_date("02/01/2023"), Some(expected));
        assert_eq!(parse_calendar_date("2/1/2023"), Some(expected));
        assert_eq!(parse_calendar_date("2023-2-1"), Some(expected));
        assert_eq!(parse_calendar_date(" 2023-02-01 "), Some(expected));
        assert_eq!(parse_calendar_date("2023-02-01T08:30:00Z"), Some(expected));
    }

    #[test]
    fn parses_date_times_without_offset() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_calendar_date("2024-03-01T10:00:00"), Some(expected));
        assert_eq!(parse_calendar_date("2024-03-01T10:00:00.250"), Some(expected));
        assert_eq!(parse_calendar_date("2024-03-01 10:00:00"), Some(expected));
        assert_eq!(parse_calendar_date("2024-03-01 10:00:00.5"), Some(expected));
        assert_eq!(parse_calendar_date("2024-03-01T10:00"), Some(expected));
        assert_eq!(parse_calendar_date("3/1/2024 10:00"), Some(expected));
    }

    #[test]
    fn parses_long_form_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_calendar_date("March 1, 2024"), Some(expected));
        assert_eq!(parse_calendar_date("Mar 1, 2024"), Some(expected));
        assert_eq!(parse_calendar_date("1 March 2024"), Some(expected));
        assert_eq!(parse_calendar_date("Fri Mar 01 2024"), Some(expected));
        assert_eq!(parse_calendar_date("Fri, 01 Mar 2024 10:00:00 +0000"), Some(expected));
    }

    #[test]
    fn ignores_trailing_parenthesised_note() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_calendar_date("3/1/2024 (Friday)"), Some(expected));
        assert_eq!(parse_calendar_date("()"), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date("2023-13-01"), None);
        assert_eq!(parse_calendar_date("not-a-date"), None);
        assert_eq!(parse_calendar_date(""), None);
    }
}
