//! Time utilities.

use chrono::{DateTime, Local, TimeZone};

/// Layout of [`timestamp`]: `yyyyMMdd.HHmmss.SSS`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d.%H%M%S%.3f";

/// Current local time as a sortable timestamp, e.g. `20240116.093012.517`.
pub fn timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Format any date-time with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_timestamp_layout() {
        let at = NaiveDate::from_ymd_opt(2021, 1, 16)
            .unwrap()
            .and_hms_milli_opt(9, 5, 7, 42)
            .unwrap()
            .and_utc();
        assert_eq!(format_timestamp(&at), "20210116.090507.042");
    }

    #[test]
    fn test_timestamp_width_is_fixed() {
        assert_eq!(format_timestamp(&Utc::now()).len(), "yyyyMMdd.HHmmss.SSS".len());
        assert_eq!(timestamp().len(), "yyyyMMdd.HHmmss.SSS".len());
    }
}
