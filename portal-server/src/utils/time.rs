//! Clinic time zone helpers
//!
//! "Today" is always the calendar date in the clinic time zone. Repositories
//! take `YYYY-MM-DD` strings or Unix millis; conversions happen here.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use shared::error::{AppError, AppResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|_| {
        AppError::validation(format!("Invalid date format: {date}")).with_detail("date", date)
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's date in the clinic time zone
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Parse an optional date, defaulting to today
pub fn date_or_today(date: Option<&str>, tz: Tz) -> AppResult<NaiveDate> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => parse_date(d),
        None => Ok(today(tz)),
    }
}

/// Date start (00:00:00 local) as Unix millis
///
/// Falls back to UTC when the local midnight does not exist (DST gap).
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Next day's start as Unix millis; callers use `< end`
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(
            parse_date("2025-03-09").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
        assert!(parse_date("09/03/2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn taipei_day_bounds() {
        let tz: Tz = "Asia/Taipei".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        // 2025-01-02T00:00+08:00 == 2025-01-01T16:00Z
        assert_eq!(day_start_millis(date, tz), 1_735_747_200_000);
        let span = day_end_millis(date, tz) - day_start_millis(date, tz);
        assert_eq!(span, 86_400_000);
    }

    #[test]
    fn blank_date_means_today() {
        let tz: Tz = "Asia/Taipei".parse().unwrap();
        assert_eq!(date_or_today(Some("  "), tz).unwrap(), today(tz));
        let date = date_or_today(Some("2025-12-31"), tz).unwrap();
        assert_eq!(format_date(date), "2025-12-31");
    }
}
