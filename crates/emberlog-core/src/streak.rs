//! Forgiveness-buffered check-in streak engine.
//!
//! ## Rules
//!
//! - Checking in on consecutive days grows the streak by one.
//! - A single missed day (a two-day gap) can be bridged by spending one
//!   forgiveness credit; the streak still grows by one.
//! - The credit budget is [`MAX_FORGIVENESS_PER_MONTH`] per calendar month
//!   and refills when the month key changes, never mid-month.
//! - A wider gap, or a two-day gap with no credit left, resets the streak
//!   to 1. Credits spent on the way are not refunded.
//!
//! Every function here is pure. Callers pass the relevant date in; nothing
//! reads the clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{days_between, year_month};

/// Missed days a user may bridge per calendar month.
pub const MAX_FORGIVENESS_PER_MONTH: u8 = 2;

/// Persistent streak counter state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// Consecutive (possibly bridged) check-in days. 0 before the first one.
    pub current_streak: u32,
    pub last_check_in: Option<NaiveDate>,
    pub forgiveness_used_this_month: u8,
    /// `YYYYMM` key of the month the budget was last reset for. The default
    /// of 0 matches no real month, which forces a rollover on first use.
    pub last_forgiveness_reset_month: i32,
    /// True while the current streak contains at least one bridged gap.
    pub used_forgiveness_in_current_streak: bool,
}

impl Default for StreakState {
    fn default() -> Self {
        Self {
            current_streak: 0,
            last_check_in: None,
            forgiveness_used_this_month: 0,
            last_forgiveness_reset_month: 0,
            used_forgiveness_in_current_streak: false,
        }
    }
}

impl StreakState {
    /// Credits still available this month.
    pub fn forgiveness_remaining(&self) -> u8 {
        MAX_FORGIVENESS_PER_MONTH.saturating_sub(self.forgiveness_used_this_month)
    }
}

/// Reset the monthly forgiveness budget when `today` falls in a different
/// calendar month than the last reset. Idempotent within a month; runs on
/// every state access so a device left untouched across a month boundary
/// still starts the new month with a full budget.
pub fn roll_month(state: &StreakState, today: NaiveDate) -> StreakState {
    let month = year_month(today);
    if state.last_forgiveness_reset_month == month {
        return state.clone();
    }
    let mut next = state.clone();
    next.forgiveness_used_this_month = 0;
    next.last_forgiveness_reset_month = month;
    next
}

/// Advance the streak for a check-in on `date`.
///
/// The month rollover keys off the check-in date itself, which is "today"
/// for every live caller, so the function stays deterministic. Same-day
/// repeats (the user editing today's answer) leave the streak untouched
/// and never consume forgiveness.
pub fn advance(state: &StreakState, date: NaiveDate) -> StreakState {
    let mut next = roll_month(state, date);

    let Some(last) = next.last_check_in else {
        next.current_streak = 1;
        next.last_check_in = Some(date);
        next.used_forgiveness_in_current_streak = false;
        return next;
    };

    match days_between(last, date) {
        0 => next,
        1 => {
            next.current_streak += 1;
            next.last_check_in = Some(date);
            next
        }
        2 if next.forgiveness_remaining() > 0 => {
            next.forgiveness_used_this_month += 1;
            next.used_forgiveness_in_current_streak = true;
            next.current_streak += 1;
            next.last_check_in = Some(date);
            next
        }
        // Wider gap, exhausted budget, or a clock that went backwards.
        _ => {
            next.current_streak = 1;
            next.last_check_in = Some(date);
            next.used_forgiveness_in_current_streak = false;
            next
        }
    }
}

/// Encouragement line for an active streak, if one applies.
///
/// The grace message wins over the length tiers so a bridged gap is
/// acknowledged even on long streaks.
pub fn message(state: &StreakState) -> Option<&'static str> {
    if state.current_streak == 0 {
        return None;
    }
    if state.used_forgiveness_in_current_streak {
        return Some("You gave yourself grace this week.");
    }
    if state.current_streak >= 14 {
        Some("You've made this a steady part of your rhythm.")
    } else if state.current_streak >= 7 {
        Some("You've been checking in regularly.")
    } else if state.current_streak >= 3 {
        Some("You're building a steady habit.")
    } else {
        None
    }
}

/// Reassurance line shown right after a streak has been lost.
///
/// Fires only when the last check-in is more than two days gone, the
/// streak has already collapsed to at most 1, and some forgiveness was
/// spent this month (evidence the user was trying to keep it alive).
pub fn reset_message(state: &StreakState, today: NaiveDate) -> Option<&'static str> {
    let last = state.last_check_in?;
    if days_between(last, today) > 2
        && state.current_streak <= 1
        && state.forgiveness_remaining() < MAX_FORGIVENESS_PER_MONTH
    {
        Some("You didn't lose progress. You're starting fresh.")
    } else {
        None
    }
}
