//! Evidence refinement of the raw phase scores.
//!
//! Each step boosts exactly one phase per rule and never lowers a score
//! below what the base curve produced (apart from the 1.0 cap). The
//! estimator applies them in a fixed order: symptoms, basal temperature,
//! LH test.

use crate::models::{Phase, SymptomObservation};

use super::base_curve::PhaseScores;

/// Resting temperature (°C) the basal readings are compared against.
pub const BASELINE_TEMP_C: f64 = 36.5;

/// Rise above baseline that indicates the post-ovulatory shift.
pub const LUTEAL_TEMP_RISE_C: f64 = 0.3;

/// Distance from baseline still treated as the pre-ovulatory nadir.
pub const OVULATION_TEMP_BAND_C: f64 = 0.2;

const BLEEDING_BOOST: f64 = 0.3;
const OVULATION_SYMPTOM_BOOST: f64 = 0.4;
const LUTEAL_SYMPTOM_BOOST: f64 = 0.3;
const TEMP_LUTEAL_BOOST: f64 = 0.2;
const TEMP_OVULATION_BOOST: f64 = 0.15;
const LH_SURGE_BOOST: f64 = 0.5;

fn in_ovulation_window(d: i64) -> bool {
    (12..=16).contains(&d)
}

/// Applies the symptom rules for normalized cycle day `d`.
pub fn refine_with_symptoms(scores: &mut PhaseScores, d: i64, symptoms: &[SymptomObservation]) {
    let bleeding = symptoms
        .iter()
        .any(|s| s.has_category("bleeding") && s.is_present());
    if bleeding && d <= 7 {
        scores.boost(Phase::Menstrual, BLEEDING_BOOST);
    }

    let ovulatory = symptoms
        .iter()
        .any(|s| (s.name_contains("pain") || s.name_contains("discharge")) && s.is_present());
    if ovulatory && in_ovulation_window(d) {
        scores.boost(Phase::Ovulation, OVULATION_SYMPTOM_BOOST);
    }

    let premenstrual = symptoms
        .iter()
        .any(|s| (s.has_category("mood") || s.name_contains("bloat")) && s.is_present());
    if premenstrual && d > 20 {
        scores.boost(Phase::Luteal, LUTEAL_SYMPTOM_BOOST);
    }
}

/// Applies the basal body temperature rules for normalized cycle day `d`.
pub fn refine_with_basal_temp(scores: &mut PhaseScores, d: i64, basal_temp: f64) {
    let delta = basal_temp - BASELINE_TEMP_C;

    if delta > LUTEAL_TEMP_RISE_C && d > 14 {
        scores.boost(Phase::Luteal, TEMP_LUTEAL_BOOST);
    }

    if delta.abs() < OVULATION_TEMP_BAND_C && in_ovulation_window(d) {
        scores.boost(Phase::Ovulation, TEMP_OVULATION_BOOST);
    }
}

/// Applies the LH-surge rule for normalized cycle day `d`.
pub fn refine_with_lh_test(scores: &mut PhaseScores, d: i64, lh_test_positive: bool) {
    if lh_test_positive && in_ovulation_window(d) {
        scores.boost(Phase::Ovulation, LH_SURGE_BOOST);
    }
}
