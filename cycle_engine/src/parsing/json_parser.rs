use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{CycleRecord, Severity, SymptomObservation};

/// Raw JSON structure for a symptom entry
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSymptom {
    name: String,
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    category: String,
    date: Option<NaiveDate>,
}

/// Raw JSON structure for a history entry; `date` may be omitted
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCycleRecord {
    period_start: Option<NaiveDate>,
    period_end: Option<NaiveDate>,
    cycle_length: Option<u32>,
    #[serde(default)]
    symptoms: Vec<RawSymptom>,
    basal_temp: Option<f64>,
    lh_test_positive: Option<bool>,
    date: Option<NaiveDate>,
}

/// Container for the `{"records": [...]}` document shape
#[derive(Debug, Deserialize)]
struct HistoryDocument {
    records: Vec<RawCycleRecord>,
}

/// Shape written by [`history_to_json`]
#[derive(Serialize)]
struct HistoryDocumentOut<'a> {
    records: &'a [CycleRecord],
}

/// Parse a history JSON file into cycle records
pub fn parse_history_json(json_path: &Path) -> Result<Vec<CycleRecord>> {
    let json_content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {}", json_path.display()))?;

    parse_history_json_str(&json_content)
        .with_context(|| format!("Failed to parse history file: {}", json_path.display()))
}

/// Parse a history JSON document from a string.
///
/// Accepts a bare array of records or an object with a `records` array.
pub fn parse_history_json_str(json_str: &str) -> Result<Vec<CycleRecord>> {
    let json_value: serde_json::Value = serde_json::from_str(json_str).with_context(|| {
        let preview: String = json_str.chars().take(200).collect();
        format!("Invalid JSON syntax. First 200 chars: {}", preview)
    })?;

    let raw_records = if json_value.is_array() {
        deserialize_with_path::<Vec<RawCycleRecord>>(json_value)?
    } else if json_value.get("records").is_some() {
        deserialize_with_path::<HistoryDocument>(json_value)?.records
    } else {
        anyhow::bail!(
            "History JSON must be an array of records or an object with a 'records' key, found: {}",
            json_kind(&json_value)
        );
    };

    raw_records
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| convert_raw_record(raw, idx))
        .collect()
}

/// Parse a bare JSON list of symptom observations.
///
/// Symptoms without a `date` take `default_date`.
pub fn parse_symptoms_json_str(
    json_str: &str,
    default_date: NaiveDate,
) -> Result<Vec<SymptomObservation>> {
    let json_value: serde_json::Value =
        serde_json::from_str(json_str).context("Invalid symptom JSON syntax")?;
    let raw: Vec<RawSymptom> = deserialize_with_path(json_value)?;
    Ok(raw
        .into_iter()
        .map(|s| convert_raw_symptom(s, default_date))
        .collect())
}

/// Serialize records as a `{"records": [...]}` document
pub fn history_to_json(records: &[CycleRecord]) -> serde_json::Result<String> {
    serde_json::to_string(&HistoryDocumentOut { records })
}

fn deserialize_with_path<T>(value: serde_json::Value) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        anyhow::anyhow!("JSON deserialization error at '{}': {}", path, err.into_inner())
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object without 'records'",
    }
}

/// Convert raw JSON structure to domain model
fn convert_raw_record(raw: RawCycleRecord, idx: usize) -> Result<CycleRecord> {
    let date = raw.date.or(raw.period_start).with_context(|| {
        format!(
            "Record at index {} has neither 'date' nor 'periodStart'",
            idx
        )
    })?;

    Ok(CycleRecord {
        period_start: raw.period_start,
        period_end: raw.period_end,
        cycle_length: raw.cycle_length,
        symptoms: raw
            .symptoms
            .into_iter()
            .map(|s| convert_raw_symptom(s, date))
            .collect(),
        basal_temp: raw.basal_temp,
        lh_test_positive: raw.lh_test_positive,
        date,
    })
}

fn convert_raw_symptom(raw: RawSymptom, default_date: NaiveDate) -> SymptomObservation {
    SymptomObservation {
        name: raw.name,
        severity: raw.severity,
        category: raw.category,
        date: raw.date.unwrap_or(default_date),
    }
}
