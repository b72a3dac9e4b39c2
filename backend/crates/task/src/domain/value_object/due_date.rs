//! Date parsing for `dueDate` and the due-range filters

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse an ISO 8601 instant
///
/// Accepts RFC 3339 (`2025-03-01T09:30:00Z`, with offset), a local
/// date-time taken as UTC (`2025-03-01T09:30:00`), or a bare date
/// (`2025-03-01`, midnight UTC).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rfc3339() {
        let dt = parse_instant("2025-03-01T10:30:00+01:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_naive_datetime_is_utc() {
        let dt = parse_instant("2025-03-01T09:30:00.250").unwrap();
        assert_eq!(dt.timestamp(), Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap().timestamp());
    }

    #[test]
    fn test_bare_date() {
        assert_eq!(
            parse_instant("2025-03-01"),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse_instant("tomorrow"), None);
        assert_eq!(parse_instant("2025-13-01"), None);
        assert_eq!(parse_instant(""), None);
    }
}
