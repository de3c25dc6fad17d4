//! Time helpers
//!
//! All date strings on the wire are `YYYY-MM-DD`; timestamps are Unix
//! millis. Conversions happen at the API handler layer, repositories only
//! see already-validated values.

use chrono::{NaiveDate, Utc};

use super::{AppError, AppResult};

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Today's date (UTC)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Validate that a date is not in the past
///
/// Orders are placed for delivery today or later; back-dated orders are
/// rejected at creation time.
pub fn validate_not_past(date: NaiveDate) -> AppResult<()> {
    let today = today();
    if date < today {
        return Err(AppError::validation(format!(
            "Date {} is in the past (today is {})",
            date, today
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso() {
        assert_eq!(
            parse_date("2026-08-27").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("27/08/2026").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn past_dates_rejected() {
        let yesterday = today().pred_opt().unwrap();
        assert!(validate_not_past(yesterday).is_err());
        assert!(validate_not_past(today()).is_ok());
    }
}
