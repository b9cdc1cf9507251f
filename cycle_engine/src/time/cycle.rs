//! Cycle-day arithmetic over a period history.
//!
//! All functions take the history as a borrowed slice and work on local
//! copies of the period start dates, so the caller's records stay untouched.

use chrono::{Days, NaiveDate};
use std::cmp::Reverse;

use crate::models::CycleRecord;

/// Cycle length assumed when the history has no usable cycles.
pub const DEFAULT_CYCLE_LENGTH: i64 = 28;

/// Gaps between period starts must be strictly longer than this to count as a cycle.
pub const MIN_VALID_CYCLE_DAYS: i64 = 20;

/// Gaps between period starts must be strictly shorter than this to count as a cycle.
pub const MAX_VALID_CYCLE_DAYS: i64 = 40;

/// 1-indexed day of the cycle that started on `last_period_start`.
///
/// The start day itself is cycle day 1. A `target` before the period start
/// yields zero or a negative value; it is returned unchanged.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cycle_engine::time::cycle_day;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(cycle_day(start, start), 1);
/// assert_eq!(cycle_day(start, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()), 15);
/// assert_eq!(cycle_day(start, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()), 0);
/// ```
pub fn cycle_day(last_period_start: NaiveDate, target: NaiveDate) -> i64 {
    target.signed_duration_since(last_period_start).num_days() + 1
}

/// Folds `cycle_day` into `[1, cycle_length]`.
///
/// Uses a truncating remainder, so non-positive cycle days stay non-positive.
/// A non-positive `cycle_length` leaves the day as it is.
pub fn normalize_cycle_day(cycle_day: i64, cycle_length: i64) -> i64 {
    if cycle_length <= 0 {
        return cycle_day;
    }
    ((cycle_day - 1) % cycle_length) + 1
}

/// The record with the most recent period start.
///
/// Records without a period start are skipped. When several records share
/// the latest start, the first of them in history order wins.
pub fn last_period(history: &[CycleRecord]) -> Option<&CycleRecord> {
    history
        .iter()
        .filter(|record| record.period_start.is_some())
        .min_by_key(|record| Reverse(record.period_start))
}

/// Period start dates sorted ascending. Duplicates are kept.
pub fn period_starts(history: &[CycleRecord]) -> Vec<NaiveDate> {
    let mut starts: Vec<NaiveDate> = history.iter().filter_map(|r| r.period_start).collect();
    starts.sort();
    starts
}

/// Day gaps between consecutive period starts, in ascending start order.
pub fn cycle_lengths(history: &[CycleRecord]) -> Vec<i64> {
    period_starts(history)
        .windows(2)
        .map(|pair| pair[1].signed_duration_since(pair[0]).num_days())
        .collect()
}

/// Cycle lengths strictly between 20 and 40 days.
pub fn valid_cycle_lengths(history: &[CycleRecord]) -> Vec<i64> {
    cycle_lengths(history)
        .into_iter()
        .filter(|&len| is_valid_cycle_length(len))
        .collect()
}

pub fn is_valid_cycle_length(days: i64) -> bool {
    days > MIN_VALID_CYCLE_DAYS && days < MAX_VALID_CYCLE_DAYS
}

/// Mean of the valid cycle lengths, rounded to the nearest day.
///
/// Falls back to [`DEFAULT_CYCLE_LENGTH`] when no valid cycle exists.
pub fn average_cycle_length(history: &[CycleRecord]) -> i64 {
    let valid = valid_cycle_lengths(history);
    if valid.is_empty() {
        return DEFAULT_CYCLE_LENGTH;
    }
    let total: i64 = valid.iter().sum();
    (total as f64 / valid.len() as f64).round() as i64
}

/// Adds a (possibly negative) number of days to a date.
///
/// Returns `None` if the result falls outside chrono's supported range.
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}
