//! Historical cycle entries and the symptom observations attached to them.
//!
//! These types are the inputs of the phase estimator. They are plain data:
//! the estimator borrows them and never mutates a record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Self-reported symptom intensity on the 0–4 scale used by the tracker.
///
/// Serialized as its integer value; integers above 4 are rejected.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    #[default]
    None = 0,
    Mild = 1,
    Moderate = 2,
    Severe = 3,
    Critical = 4,
}

impl Severity {
    /// `true` for every level above [`Severity::None`].
    pub fn is_present(self) -> bool {
        self > Severity::None
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Severity::None),
            1 => Ok(Severity::Mild),
            2 => Ok(Severity::Moderate),
            3 => Ok(Severity::Severe),
            4 => Ok(Severity::Critical),
            other => Err(format!("severity must be between 0 and 4, got {}", other)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity as u8
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::None => "none",
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
            Severity::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// A single logged symptom.
///
/// `category` is free-form. The estimator only looks at a handful of
/// categories and name fragments, see [`SymptomObservation::name_contains`]
/// and [`SymptomObservation::has_category`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomObservation {
    pub name: String,
    pub severity: Severity,
    pub category: String,
    pub date: NaiveDate,
}

impl SymptomObservation {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
        date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            severity,
            category: category.into(),
            date,
        }
    }

    /// Case-insensitive substring match on the symptom name.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use cycle_engine::models::{Severity, SymptomObservation};
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
    /// let symptom = SymptomObservation::new("Pelvic Pain", "physical", Severity::Mild, date);
    /// assert!(symptom.name_contains("pain"));
    /// assert!(!symptom.name_contains("bloat"));
    /// ```
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Exact match on the category string.
    pub fn has_category(&self, category: &str) -> bool {
        self.category == category
    }

    /// Whether the symptom was actually experienced (severity above none).
    pub fn is_present(&self) -> bool {
        self.severity.is_present()
    }
}

/// One historical entry of the cycle log.
///
/// `period_start` is optional so that symptom-only entries can live in the
/// same history; period lookups skip records without it. Records with the
/// same `period_start` are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_length: Option<u32>,
    #[serde(default)]
    pub symptoms: Vec<SymptomObservation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basal_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lh_test_positive: Option<bool>,
    pub date: NaiveDate,
}

impl CycleRecord {
    /// Creates a record for a period that started on `period_start`.
    ///
    /// The reference date is set to the period start.
    pub fn period(period_start: NaiveDate) -> Self {
        Self {
            period_start: Some(period_start),
            period_end: None,
            cycle_length: None,
            symptoms: Vec::new(),
            basal_temp: None,
            lh_test_positive: None,
            date: period_start,
        }
    }

    /// Creates a record with no period start, e.g. a symptom-only log entry.
    pub fn observation(date: NaiveDate) -> Self {
        Self {
            period_start: None,
            period_end: None,
            cycle_length: None,
            symptoms: Vec::new(),
            basal_temp: None,
            lh_test_positive: None,
            date,
        }
    }

    pub fn with_period_end(mut self, period_end: NaiveDate) -> Self {
        self.period_end = Some(period_end);
        self
    }

    pub fn with_cycle_length(mut self, cycle_length: u32) -> Self {
        self.cycle_length = Some(cycle_length);
        self
    }

    pub fn with_symptom(mut self, symptom: SymptomObservation) -> Self {
        self.symptoms.push(symptom);
        self
    }

    pub fn with_basal_temp(mut self, basal_temp: f64) -> Self {
        self.basal_temp = Some(basal_temp);
        self
    }

    pub fn with_lh_test(mut self, positive: bool) -> Self {
        self.lh_test_positive = Some(positive);
        self
    }

    /// Length of the logged bleed in days (inclusive), when an end date exists.
    pub fn period_duration_days(&self) -> Option<i64> {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => Some(end.signed_duration_since(start).num_days() + 1),
            _ => None,
        }
    }
}
