//! Cycle history validation with error and warning reporting.
//!
//! Validation is advisory. The estimator accepts any well-typed history;
//! this module only reports data quality issues so callers can surface
//! them (or log them) before trusting a forecast.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::CycleRecord;
use crate::time::{cycle_lengths, is_valid_cycle_length};

/// Lowest basal temperature (°C) accepted without a warning.
pub const MIN_PLAUSIBLE_BASAL_TEMP: f64 = 35.0;

/// Highest basal temperature (°C) accepted without a warning.
pub const MAX_PLAUSIBLE_BASAL_TEMP: f64 = 38.5;

/// Validation result with categorized issues and statistics.
///
/// Errors make `is_valid` false; warnings are informational.
///
/// # Examples
///
/// ```
/// use cycle_engine::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_error("Period ends before it starts".to_string());
/// assert!(!result.is_valid);
/// assert_eq!(result.errors.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary statistics computed during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_records: usize,
    pub period_records: usize,
    pub observation_records: usize,
    pub duplicate_period_starts: usize,
    pub invalid_period_ranges: usize,
    pub out_of_range_cycles: usize,
    pub implausible_temperatures: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Adds a non-critical warning without invalidating the result.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for cycle history.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cycle_engine::models::CycleRecord;
/// use cycle_engine::preprocessing::validator::HistoryValidator;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let history = vec![CycleRecord::period(start), CycleRecord::period(start)];
///
/// let result = HistoryValidator::validate(&history);
/// assert!(result.is_valid);
/// assert_eq!(result.stats.duplicate_period_starts, 1);
/// ```
pub struct HistoryValidator;

impl HistoryValidator {
    /// Validates a full history.
    ///
    /// Checks performed:
    /// - duplicate period starts (warning)
    /// - period end before period start (error)
    /// - gaps between period starts outside (20, 40) days (warning)
    /// - basal temperatures outside 35.0–38.5 °C (warning), non-finite (error)
    /// - no record carrying a period start at all (warning)
    pub fn validate(history: &[CycleRecord]) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.stats.total_records = history.len();

        result.stats.duplicate_period_starts = Self::check_duplicates(history, &mut result);

        for (idx, record) in history.iter().enumerate() {
            Self::validate_record(idx, record, &mut result);
        }

        Self::check_cycle_lengths(history, &mut result);

        if !history.is_empty() && result.stats.period_records == 0 {
            result.add_warning(
                "History has no period start; forecasts fall back to the uniform distribution"
                    .to_string(),
            );
        }

        result
    }

    fn validate_record(idx: usize, record: &CycleRecord, result: &mut ValidationResult) {
        if record.period_start.is_some() {
            result.stats.period_records += 1;
        } else {
            result.stats.observation_records += 1;
        }

        if let (Some(start), Some(end)) = (record.period_start, record.period_end) {
            if end < start {
                result.stats.invalid_period_ranges += 1;
                result.add_error(format!(
                    "Record {} ends ({}) before its period start ({})",
                    idx, end, start
                ));
            }
        }

        if let Some(temp) = record.basal_temp {
            if !temp.is_finite() {
                result.stats.implausible_temperatures += 1;
                result.add_error(format!("Record {} has a non-finite basal temperature", idx));
            } else if !(MIN_PLAUSIBLE_BASAL_TEMP..=MAX_PLAUSIBLE_BASAL_TEMP).contains(&temp) {
                result.stats.implausible_temperatures += 1;
                result.add_warning(format!(
                    "Record {} has an implausible basal temperature: {:.2} °C",
                    idx, temp
                ));
            }
        }
    }

    fn check_cycle_lengths(history: &[CycleRecord], result: &mut ValidationResult) {
        for gap in cycle_lengths(history) {
            // zero-day gaps are duplicates, already reported
            if gap > 0 && !is_valid_cycle_length(gap) {
                result.stats.out_of_range_cycles += 1;
                result.add_warning(format!(
                    "Cycle of {} days is outside the 21-39 day range and is ignored for averages",
                    gap
                ));
            }
        }
    }

    fn check_duplicates(history: &[CycleRecord], result: &mut ValidationResult) -> usize {
        let mut counts = HashMap::new();
        for start in history.iter().filter_map(|r| r.period_start) {
            *counts.entry(start).or_insert(0usize) += 1;
        }

        let mut duplicated: Vec<_> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
        duplicated.sort();

        let mut total = 0;
        for (start, count) in duplicated {
            total += count - 1;
            result.add_warning(format!(
                "Period start {} appears {} times",
                start, count
            ));
        }
        total
    }
}

/// Validate a history with [`HistoryValidator`].
pub fn validate_history(history: &[CycleRecord]) -> ValidationResult {
    HistoryValidator::validate(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_clean_history() {
        let history = vec![
            CycleRecord::period(date(2024, 1, 1)).with_period_end(date(2024, 1, 5)),
            CycleRecord::period(date(2024, 1, 29)).with_basal_temp(36.4),
            CycleRecord::observation(date(2024, 2, 10)),
        ];
        let result = HistoryValidator::validate(&history);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(result.stats.total_records, 3);
        assert_eq!(result.stats.period_records, 2);
        assert_eq!(result.stats.observation_records, 1);
    }

    #[test]
    fn test_period_end_before_start_is_error() {
        let history = vec![CycleRecord::period(date(2024, 1, 10)).with_period_end(date(2024, 1, 8))];
        let result = HistoryValidator::validate(&history);
        assert!(!result.is_valid);
        assert_eq!(result.stats.invalid_period_ranges, 1);
    }

    #[test]
    fn test_out_of_range_cycles_warn() {
        let history = vec![
            CycleRecord::period(date(2024, 1, 1)),
            CycleRecord::period(date(2024, 1, 11)),
            CycleRecord::period(date(2024, 3, 1)),
        ];
        let result = HistoryValidator::validate(&history);
        assert!(result.is_valid);
        assert_eq!(result.stats.out_of_range_cycles, 2);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_temperature_checks() {
        let history = vec![
            CycleRecord::observation(date(2024, 1, 1)).with_basal_temp(98.6),
            CycleRecord::observation(date(2024, 1, 2)).with_basal_temp(f64::NAN),
        ];
        let result = HistoryValidator::validate(&history);
        assert!(!result.is_valid);
        assert_eq!(result.stats.implausible_temperatures, 2);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("no period start")));
    }

    #[test]
    fn test_duplicates_counted_once_per_extra_copy() {
        let history = vec![
            CycleRecord::period(date(2024, 1, 1)),
            CycleRecord::period(date(2024, 1, 1)),
            CycleRecord::period(date(2024, 1, 1)),
            CycleRecord::period(date(2024, 1, 29)),
        ];
        let result = HistoryValidator::validate(&history);
        assert_eq!(result.stats.duplicate_period_starts, 2);
        assert_eq!(result.stats.out_of_range_cycles, 0);
    }

    #[test]
    fn test_empty_history_is_valid() {
        let result = HistoryValidator::validate(&[]);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }
}
