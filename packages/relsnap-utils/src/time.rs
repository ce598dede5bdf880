use chrono::{DateTime, Utc};

/// Formats `time` as ISO-8601 with microseconds and a trailing `Z`.
pub fn format_utc(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

pub fn now_utc() -> String {
    format_utc(&Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_utc() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_utc(&time), "2024-01-02T03:04:05.000000Z");
    }

    #[test]
    fn test_now_utc_suffix() {
        let now = now_utc();
        assert!(now.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
