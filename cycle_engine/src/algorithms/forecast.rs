//! Auxiliary cycle outputs: next-period estimate, regularity, and the
//! combined forecast report consumed by callers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CycleRecord, Phase, PhaseDistribution};
use crate::time::{average_cycle_length, last_period, period_starts, shift_days, valid_cycle_lengths};

use super::estimator::{estimate_phase, PhaseEvidence};

/// Regularity reported when the history is too short to judge.
pub const NEUTRAL_REGULARITY: f64 = 0.5;

/// Minimum number of recorded period starts before regularity is computed.
pub const MIN_PERIODS_FOR_REGULARITY: usize = 3;

/// Expected start of the next period: last start plus the average cycle length.
pub fn next_period_date(history: &[CycleRecord]) -> Option<NaiveDate> {
    let last_start = last_period(history)?.period_start?;
    shift_days(last_start, average_cycle_length(history))
}

/// Cycle regularity in `[0, 1]`, where 1 means identical cycle lengths.
///
/// Computed as `1 - cv` over the valid cycle lengths, `cv` being the
/// coefficient of variation (population standard deviation over mean).
/// Fewer than three period records, or no valid cycle at all, give
/// [`NEUTRAL_REGULARITY`]. A single valid cycle has no spread and scores 1.
pub fn regularity_score(history: &[CycleRecord]) -> f64 {
    if period_starts(history).len() < MIN_PERIODS_FOR_REGULARITY {
        return NEUTRAL_REGULARITY;
    }

    let lengths = valid_cycle_lengths(history);
    if lengths.is_empty() {
        return NEUTRAL_REGULARITY;
    }

    let count = lengths.len() as f64;
    let mean = lengths.iter().sum::<i64>() as f64 / count;
    let variance = lengths
        .iter()
        .map(|&len| {
            let diff = len as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / count;
    let cv = variance.sqrt() / mean;

    (1.0 - cv).clamp(0.0, 1.0)
}

/// Everything a caller shows for one target date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleForecast {
    pub target_date: NaiveDate,
    pub phases: PhaseDistribution,
    pub most_likely_phase: Phase,
    /// `None` when the history holds no period start.
    pub cycle_day: Option<i64>,
    pub average_cycle_length: i64,
    pub next_period_date: Option<NaiveDate>,
    pub days_until_next_period: Option<i64>,
    pub regularity: f64,
}

/// Builds the forecast report for `target_date`.
pub fn forecast_cycle(
    history: &[CycleRecord],
    target_date: NaiveDate,
    evidence: &PhaseEvidence,
) -> CycleForecast {
    let estimate = if history.is_empty() {
        None
    } else {
        estimate_phase(history, target_date, evidence)
    };

    let phases = estimate
        .as_ref()
        .map(|e| e.distribution)
        .unwrap_or_else(PhaseDistribution::uniform);
    let next_period = next_period_date(history);

    CycleForecast {
        target_date,
        most_likely_phase: phases.most_likely().phase,
        phases,
        cycle_day: estimate.as_ref().map(|e| e.cycle_day),
        average_cycle_length: average_cycle_length(history),
        next_period_date: next_period,
        days_until_next_period: next_period
            .map(|next| next.signed_duration_since(target_date).num_days()),
        regularity: regularity_score(history),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::DEFAULT_CYCLE_LENGTH;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history(starts: &[NaiveDate]) -> Vec<CycleRecord> {
        starts.iter().copied().map(CycleRecord::period).collect()
    }

    #[test]
    fn test_next_period_uses_average_length() {
        let records = history(&[date(2024, 1, 1), date(2024, 1, 31)]);
        assert_eq!(next_period_date(&records), Some(date(2024, 3, 1)));

        let single = history(&[date(2024, 1, 1)]);
        assert_eq!(next_period_date(&single), Some(date(2024, 1, 29)));

        assert_eq!(next_period_date(&[]), None);
    }

    #[test]
    fn test_regularity_needs_three_periods() {
        assert_eq!(regularity_score(&[]), 0.5);
        assert_eq!(regularity_score(&history(&[date(2024, 1, 1)])), 0.5);
        assert_eq!(
            regularity_score(&history(&[date(2024, 1, 1), date(2024, 1, 29)])),
            0.5
        );
    }

    #[test]
    fn test_regularity_of_identical_cycles_is_one() {
        let records = history(&[date(2024, 1, 1), date(2024, 1, 29), date(2024, 2, 26)]);
        assert_eq!(regularity_score(&records), 1.0);
    }

    #[test]
    fn test_regularity_drops_with_variation() {
        // gaps 22 and 38: mean 30, std 8, cv 0.2667
        let records = history(&[date(2024, 1, 1), date(2024, 1, 23), date(2024, 3, 1)]);
        let score = regularity_score(&records);
        assert!((score - (1.0 - 8.0 / 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_regularity_ignores_invalid_cycles() {
        // gaps 10 and 45 are both outside (20, 40)
        let records = history(&[date(2024, 1, 1), date(2024, 1, 11), date(2024, 2, 25)]);
        assert_eq!(regularity_score(&records), NEUTRAL_REGULARITY);
    }

    #[test]
    fn test_regularity_with_single_valid_cycle() {
        // gap 10 is ignored, gap 28 is the only valid cycle
        let records = history(&[date(2024, 1, 1), date(2024, 1, 11), date(2024, 2, 8)]);
        assert_eq!(regularity_score(&records), 1.0);
    }

    #[test]
    fn test_forecast_for_empty_history() {
        let forecast = forecast_cycle(&[], date(2024, 5, 1), &PhaseEvidence::default());
        assert!(forecast.phases.is_uniform());
        assert_eq!(forecast.cycle_day, None);
        assert_eq!(forecast.average_cycle_length, DEFAULT_CYCLE_LENGTH);
        assert_eq!(forecast.next_period_date, None);
        assert_eq!(forecast.regularity, NEUTRAL_REGULARITY);
    }

    #[test]
    fn test_forecast_report() {
        let records = history(&[date(2024, 1, 1), date(2024, 1, 29), date(2024, 2, 26)]);
        let forecast = forecast_cycle(&records, date(2024, 3, 10), &PhaseEvidence::default());

        assert_eq!(forecast.cycle_day, Some(14));
        assert_eq!(forecast.most_likely_phase, Phase::Ovulation);
        assert_eq!(forecast.next_period_date, Some(date(2024, 3, 25)));
        assert_eq!(forecast.days_until_next_period, Some(15));
        assert_eq!(forecast.regularity, 1.0);

        let json = serde_json::to_value(&forecast).unwrap();
        assert_eq!(json["mostLikelyPhase"], "ovulation");
        assert_eq!(json["nextPeriodDate"], "2024-03-25");
    }
}
