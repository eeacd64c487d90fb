use chrono::{DateTime, Utc};

pub fn now_ts() -> i64 {
    Utc::now().timestamp()
}

pub fn ts_to_rfc3339(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_utc() {
        assert_eq!(ts_to_rfc3339(0), "1970-01-01T00:00:00+00:00");
        assert_eq!(ts_to_rfc3339(1_767_225_600), "2026-01-01T00:00:00+00:00");
    }

    #[test]
    fn out_of_range_falls_back_to_epoch() {
        assert_eq!(ts_to_rfc3339(i64::MAX), "1970-01-01T00:00:00+00:00");
    }
}
