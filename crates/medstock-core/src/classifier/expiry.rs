//! Expiry classification.
//!
//! Buckets (first match wins):
//! - d < 0: expired (priority 1)
//! - d == 0: expired today (priority 1)
//! - 1..=7: urgent (priority 2)
//! - 8..=30: critical (priority 3)
//! - 31..=90: warning (priority 4)
//! - > 90: ok (priority 5)

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::{EngineError, EngineResult};
use crate::models::{ExpiryLevel, ExpiryStatus};

/// Last day (inclusive) of the urgent bucket.
pub const URGENT_DAYS: i64 = 7;

/// Last day (inclusive) of the critical bucket.
pub const CRITICAL_DAYS: i64 = 30;

/// Last day (inclusive) of the warning bucket.
pub const WARNING_DAYS: i64 = 90;

/// Days per month when expressing long horizons in months.
const DAYS_PER_MONTH: i64 = 30;

/// Datetime layouts accepted besides plain dates and RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a stored expiration value into a calendar day.
///
/// Time of day is discarded. Values that do not parse are rejected rather
/// than compared as garbage.
pub fn parse_expiry_date(raw: &str) -> EngineResult<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(EngineError::InvalidDate("empty expiration date".into()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .ok_or_else(|| EngineError::InvalidDate(format!("unrecognized date: {:?}", raw)))
}

/// Strip the time of day from an instant, in its own timezone.
pub fn calendar_day<Tz: TimeZone>(at: &DateTime<Tz>) -> NaiveDate {
    at.date_naive()
}

/// Today's date in the local timezone; the default reference date.
pub fn today() -> NaiveDate {
    calendar_day(&Local::now())
}

/// Whole calendar days from `reference` to `expiration`.
pub fn days_until(expiration: NaiveDate, reference: NaiveDate) -> i64 {
    expiration.signed_duration_since(reference).num_days()
}

/// Classify a stored expiration value against a reference date.
pub fn classify_expiry(expiration_date: &str, reference: NaiveDate) -> EngineResult<ExpiryStatus> {
    let expiration = parse_expiry_date(expiration_date)?;
    Ok(classify_expiry_date(expiration, reference))
}

/// Classify an already-parsed expiration date against a reference date.
pub fn classify_expiry_date(expiration: NaiveDate, reference: NaiveDate) -> ExpiryStatus {
    classify_expiry_days(days_until(expiration, reference))
}

/// Map days-until-expiry to its bucket, message and action.
pub fn classify_expiry_days(days: i64) -> ExpiryStatus {
    let (level, message, action) = if days < 0 {
        (
            ExpiryLevel::Expired,
            format!("Expired {} ago", count_of(-days, "day")),
            Some("Remove from inventory"),
        )
    } else if days == 0 {
        (
            ExpiryLevel::ExpiredToday,
            "Expires today".to_string(),
            Some("Use today or remove from inventory"),
        )
    } else if days <= URGENT_DAYS {
        (
            ExpiryLevel::Urgent,
            format!("Expires in {}", count_of(days, "day")),
            Some("Use immediately"),
        )
    } else if days <= CRITICAL_DAYS {
        (
            ExpiryLevel::Critical,
            format!("Expires in {}", count_of(days, "day")),
            Some("Use with priority"),
        )
    } else if days <= WARNING_DAYS {
        (
            ExpiryLevel::Warning,
            format!("Expires in {}", count_of(months_ceil(days), "month")),
            Some("Monitor"),
        )
    } else {
        (
            ExpiryLevel::Ok,
            format!("Valid for {}", count_of(months_ceil(days), "month")),
            None,
        )
    };

    ExpiryStatus {
        level,
        days_until_expiry: days,
        message,
        recommended_action: action.map(str::to_string),
        priority: level.priority(),
    }
}

fn months_ceil(days: i64) -> i64 {
    (days + DAYS_PER_MONTH - 1) / DAYS_PER_MONTH
}

fn count_of(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
