//! HTTP-date handling for `Last-Modified` and `If-Modified-Since`

use chrono::{DateTime, Utc};
use std::time::SystemTime;

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE).to_string()
}

/// Parse an HTTP-date; anything unparseable yields `None`
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Whether a conditional GET may be answered with 304.
///
/// `If-Modified-Since` is ignored when `If-None-Match` is present, and the
/// modification time is compared at whole-second precision.
pub fn is_not_modified(
    modified: SystemTime,
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // Sun, 06 Nov 1994 08:49:37 GMT
    fn sample() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777)
    }

    #[test]
    fn test_format() {
        assert_eq!(format_http_date(sample()), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_parse_round_trip() {
        let parsed = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(parsed.timestamp(), 784_111_777);
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_not_modified() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        // sub-second part of mtime is ignored
        let modified = sample() + Duration::from_millis(400);
        assert!(is_not_modified(modified, Some(header), false));
        assert!(!is_not_modified(sample() + Duration::from_secs(1), Some(header), false));
        assert!(!is_not_modified(sample(), Some(header), true));
        assert!(!is_not_modified(sample(), Some("garbage"), false));
        assert!(!is_not_modified(sample(), None, false));
    }
}
