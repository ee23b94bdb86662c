//! Date formatting
//!
//! Locale-independent Gregorian formatting. ISO dates are always built from
//! the date's own calendar fields; a `DateTime` is never converted to UTC
//! first, which would shift the day for users east or west of Greenwich.

use chrono::{DateTime, NaiveDate, TimeZone};

use super::profile::{PlannerError, PlannerResult};

/// Short form, e.g. "Oct 19"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Long form, e.g. "October 19, 2026"
pub fn format_date_long(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// ISO form, e.g. "2026-10-19"
pub fn format_date_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// ISO date of a timestamp in its own time zone
pub fn format_datetime_iso<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String {
    format_date_iso(datetime.date_naive())
}

/// Parse a "YYYY-MM-DD" date
pub fn parse_date_iso(s: &str) -> PlannerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PlannerError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date(2026, 10, 19)), "Oct 19");
        assert_eq!(format_date(date(2026, 3, 5)), "Mar 5");
    }

    #[test]
    fn test_format_date_long() {
        assert_eq!(format_date_long(date(2026, 12, 28)), "December 28, 2026");
        assert_eq!(format_date_long(date(2027, 1, 2)), "January 2, 2027");
    }

    #[test]
    fn test_format_date_iso_pads() {
        assert_eq!(format_date_iso(date(2026, 3, 5)), "2026-03-05");
    }

    #[test]
    fn test_datetime_iso_uses_local_fields() {
        // 23:30 on Oct 19 in UTC-5 is already Oct 20 in UTC
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let late_evening = tz.with_ymd_and_hms(2026, 10, 19, 23, 30, 0).unwrap();
        assert_eq!(format_datetime_iso(&late_evening), "2026-10-19");

        // 00:30 on Oct 19 in UTC+9 is still Oct 18 in UTC
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let early_morning = tz.with_ymd_and_hms(2026, 10, 19, 0, 30, 0).unwrap();
        assert_eq!(format_datetime_iso(&early_morning), "2026-10-19");
    }

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(parse_date_iso("2026-10-19").unwrap(), date(2026, 10, 19));
        assert_eq!(parse_date_iso(" 2026-01-02 ").unwrap(), date(2026, 1, 2));
        assert!(matches!(
            parse_date_iso("2026-02-30"),
            Err(PlannerError::InvalidDate(_))
        ));
        assert!(parse_date_iso("10/19/2026").is_err());
    }
}
