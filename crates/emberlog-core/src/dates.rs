//! Calendar arithmetic for the streak engine and history windows.
//!
//! Everything here operates on `chrono::NaiveDate` (proleptic Gregorian,
//! no timezone, no locale), so gap and month computations come out the
//! same on every device. The single impure function is [`today`], which
//! reads the wall clock once at the call site; all downstream math takes
//! dates as arguments.

use chrono::{Datelike, Duration, Local, NaiveDate};

/// Whole calendar days from `from` to `to`. Negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Year-month key in `YYYYMM` form, e.g. `202403` for March 2024.
///
/// Used to detect month boundaries for the forgiveness budget without
/// caring how long the gap between two dates was.
pub fn year_month(date: NaiveDate) -> i32 {
    date.year() * 100 + date.month() as i32
}

/// Today's calendar date in the device's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Inclusive cutoff for a "last `n` days" window ending at `today`.
///
/// An entry belongs to the window when `entry.date >= recent_cutoff(..)`.
pub fn recent_cutoff(today: NaiveDate, n: u32) -> NaiveDate {
    today - Duration::days(i64::from(n))
}
