use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::algorithms::{forecast_cycle, predict_phase, regularity_score, PhaseEvidence};
use crate::models::CycleRecord;
use crate::parsing::{parse_history_json_str, parse_symptoms_json_str};

fn value_error(context: &str, err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(format!("{}: {}", context, err))
}

fn parse_date(date: &str) -> PyResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| value_error(&format!("Invalid date '{}'", date), e))
}

fn parse_history(history_json: &str) -> PyResult<Vec<CycleRecord>> {
    parse_history_json_str(history_json).map_err(|e| value_error("Invalid history", format!("{:#}", e)))
}

fn build_evidence(
    target: NaiveDate,
    symptoms_json: Option<&str>,
    basal_temp: Option<f64>,
    lh_test_positive: Option<bool>,
) -> PyResult<PhaseEvidence> {
    let symptoms = symptoms_json
        .map(|json| parse_symptoms_json_str(json, target))
        .transpose()
        .map_err(|e| value_error("Invalid symptoms", format!("{:#}", e)))?;

    Ok(PhaseEvidence {
        symptoms,
        basal_temp,
        lh_test_positive,
    })
}

/// Phase probabilities for a target date.
///
/// Args:
///     history_json: History document (array or `{"records": [...]}`)
///     target_date: Date as YYYY-MM-DD
///     symptoms_json: Optional JSON list of symptom observations
///     basal_temp: Optional basal temperature in °C
///     lh_test_positive: Optional LH test result
///
/// Returns:
///     str: JSON array of four phase probabilities
#[pyfunction]
#[pyo3(signature = (history_json, target_date, symptoms_json=None, basal_temp=None, lh_test_positive=None))]
pub fn predict_phase_json(
    history_json: &str,
    target_date: &str,
    symptoms_json: Option<&str>,
    basal_temp: Option<f64>,
    lh_test_positive: Option<bool>,
) -> PyResult<String> {
    let history = parse_history(history_json)?;
    let target = parse_date(target_date)?;
    let evidence = build_evidence(target, symptoms_json, basal_temp, lh_test_positive)?;

    let distribution = predict_phase(&history, target, &evidence);
    serde_json::to_string(&distribution).map_err(|e| value_error("Serialization failed", e))
}

/// Full forecast report (phases, cycle day, next period, regularity).
///
/// Takes the same arguments as `predict_phase_json`.
#[pyfunction]
#[pyo3(signature = (history_json, target_date, symptoms_json=None, basal_temp=None, lh_test_positive=None))]
pub fn forecast_json(
    history_json: &str,
    target_date: &str,
    symptoms_json: Option<&str>,
    basal_temp: Option<f64>,
    lh_test_positive: Option<bool>,
) -> PyResult<String> {
    let history = parse_history(history_json)?;
    let target = parse_date(target_date)?;
    let evidence = build_evidence(target, symptoms_json, basal_temp, lh_test_positive)?;

    let report = forecast_cycle(&history, target, &evidence);
    serde_json::to_string(&report).map_err(|e| value_error("Serialization failed", e))
}

/// Cycle regularity in [0, 1]; 0.5 when the history is too short.
#[pyfunction]
pub fn regularity_score_json(history_json: &str) -> PyResult<f64> {
    Ok(regularity_score(&parse_history(history_json)?))
}
