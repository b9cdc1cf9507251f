//! Phase probability estimation for a target date.
//!
//! Pipeline: last-period lookup → cycle day and average cycle length →
//! base curve → evidence refinement (symptoms, basal temperature, LH test)
//! → normalization. The estimator is a pure function: history and target
//! date are explicit parameters and nothing is read from storage or the
//! wall clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CycleRecord, PhaseDistribution, SymptomObservation};
use crate::time::{average_cycle_length, cycle_day, last_period, normalize_cycle_day};

use super::base_curve::{scores_for_day, PhaseScores};
use super::normalization::normalize;
use super::refinement::{refine_with_basal_temp, refine_with_lh_test, refine_with_symptoms};

/// Optional same-day evidence supplied alongside the history.
///
/// Only the refinement steps whose input is present are run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseEvidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<SymptomObservation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basal_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lh_test_positive: Option<bool>,
}

impl PhaseEvidence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symptoms(mut self, symptoms: Vec<SymptomObservation>) -> Self {
        self.symptoms = Some(symptoms);
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
}

/// Intermediate values of one estimation, kept for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseEstimate {
    pub last_period_start: NaiveDate,
    /// Days since the last period start, 1-indexed, before folding.
    pub cycle_day: i64,
    pub average_cycle_length: i64,
    /// `cycle_day` folded into the average cycle.
    pub normalized_day: i64,
    pub base_scores: PhaseScores,
    pub refined_scores: PhaseScores,
    pub distribution: PhaseDistribution,
}

/// Runs the full pipeline and keeps the intermediate values.
///
/// Returns `None` when the history holds no period start.
pub fn estimate_phase(
    history: &[CycleRecord],
    target_date: NaiveDate,
    evidence: &PhaseEvidence,
) -> Option<PhaseEstimate> {
    let last_period_start = last_period(history)?.period_start?;

    let day = cycle_day(last_period_start, target_date);
    let cycle_length = average_cycle_length(history);
    let d = normalize_cycle_day(day, cycle_length);

    let base_scores = scores_for_day(d);
    let mut refined_scores = base_scores;

    if let Some(symptoms) = &evidence.symptoms {
        refine_with_symptoms(&mut refined_scores, d, symptoms);
    }
    if let Some(basal_temp) = evidence.basal_temp {
        refine_with_basal_temp(&mut refined_scores, d, basal_temp);
    }
    if let Some(lh_test_positive) = evidence.lh_test_positive {
        refine_with_lh_test(&mut refined_scores, d, lh_test_positive);
    }

    Some(PhaseEstimate {
        last_period_start,
        cycle_day: day,
        average_cycle_length: cycle_length,
        normalized_day: d,
        base_scores,
        refined_scores,
        distribution: normalize(&refined_scores),
    })
}

/// Probability of each cycle phase on `target_date`.
///
/// Never fails: an empty history, or one without any period start, yields
/// the uniform distribution.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cycle_engine::algorithms::{predict_phase, PhaseEvidence};
/// use cycle_engine::models::{CycleRecord, Phase};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let target = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// let history = vec![CycleRecord::period(start)];
///
/// let phases = predict_phase(&history, target, &PhaseEvidence::default());
/// assert_eq!(phases.most_likely().phase, Phase::Menstrual);
/// assert!((phases.total() - 1.0).abs() < 1e-9);
/// ```
pub fn predict_phase(
    history: &[CycleRecord],
    target_date: NaiveDate,
    evidence: &PhaseEvidence,
) -> PhaseDistribution {
    if history.is_empty() {
        return PhaseDistribution::uniform();
    }
    estimate_phase(history, target_date, evidence)
        .map(|estimate| estimate.distribution)
        .unwrap_or_else(PhaseDistribution::uniform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, Phase, Severity};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn single_period() -> Vec<CycleRecord> {
        vec![CycleRecord::period(date(2024, 1, 1))]
    }

    #[test]
    fn test_empty_history_is_uniform() {
        let dist = predict_phase(&[], date(2024, 1, 3), &PhaseEvidence::default());
        assert!(dist.is_uniform());
    }

    #[test]
    fn test_history_without_period_start_is_uniform() {
        let history = vec![CycleRecord::observation(date(2024, 1, 1))];
        let evidence = PhaseEvidence::new().with_lh_test(true);
        let dist = predict_phase(&history, date(2024, 1, 15), &evidence);
        assert!(dist.is_uniform());
        assert!(estimate_phase(&history, date(2024, 1, 15), &evidence).is_none());
    }

    #[test]
    fn test_early_cycle_is_menstrual() {
        let dist = predict_phase(&single_period(), date(2024, 1, 3), &PhaseEvidence::default());

        // raw: menstrual 0.6, follicular 0.2
        assert!((dist.probability(Phase::Menstrual) - 0.75).abs() < 1e-9);
        assert!((dist.probability(Phase::Follicular) - 0.25).abs() < 1e-9);
        assert_eq!(dist.probability(Phase::Ovulation), 0.0);
        assert_eq!(dist.probability(Phase::Luteal), 0.0);
        assert_eq!(dist.most_likely().phase, Phase::Menstrual);
        assert_eq!(dist.get(Phase::Menstrual).confidence, Confidence::High);
    }

    #[test]
    fn test_lh_surge_makes_ovulation_most_likely() {
        let evidence = PhaseEvidence::new().with_lh_test(true);
        let dist = predict_phase(&single_period(), date(2024, 1, 15), &evidence);

        // d = 15: ovulation 0.6 + 0.5 capped at 1.0, everything else 0
        assert_eq!(dist.most_likely().phase, Phase::Ovulation);
        assert!((dist.probability(Phase::Ovulation) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_lh_test_changes_nothing() {
        let plain = predict_phase(&single_period(), date(2024, 1, 14), &PhaseEvidence::default());
        let negative = predict_phase(
            &single_period(),
            date(2024, 1, 14),
            &PhaseEvidence::new().with_lh_test(false),
        );
        assert_eq!(plain, negative);
    }

    #[test]
    fn test_estimate_exposes_intermediate_values() {
        let history = vec![
            CycleRecord::period(date(2024, 1, 1)),
            CycleRecord::period(date(2024, 1, 31)),
        ];
        let evidence = PhaseEvidence::new()
            .with_symptoms(vec![SymptomObservation::new(
                "cramps",
                "bleeding",
                Severity::Moderate,
                date(2024, 2, 2),
            )])
            .with_basal_temp(36.3);
        let estimate = estimate_phase(&history, date(2024, 2, 2), &evidence).unwrap();

        assert_eq!(estimate.last_period_start, date(2024, 1, 31));
        assert_eq!(estimate.cycle_day, 3);
        assert_eq!(estimate.average_cycle_length, 30);
        assert_eq!(estimate.normalized_day, 3);
        assert!((estimate.refined_scores.menstrual - 0.9).abs() < 1e-12);
        assert_eq!(estimate.refined_scores.follicular, estimate.base_scores.follicular);
    }

    #[test]
    fn test_cycle_wraps_after_average_length() {
        // 28-day default: day 31 folds to day 3
        let wrapped = predict_phase(&single_period(), date(2024, 1, 31), &PhaseEvidence::default());
        let direct = predict_phase(&single_period(), date(2024, 1, 3), &PhaseEvidence::default());
        assert_eq!(wrapped, direct);
    }

    #[test]
    fn test_target_before_last_period_still_normalizes() {
        let dist = predict_phase(&single_period(), date(2023, 12, 31), &PhaseEvidence::default());
        // d = 0: menstrual 1.2, follicular 0.2
        assert!((dist.total() - 1.0).abs() < 1e-9);
        assert_eq!(dist.most_likely().phase, Phase::Menstrual);
    }
}
