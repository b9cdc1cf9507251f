//! High-level storage service layer.
//!
//! Repository-agnostic operations on a stored cycle history. These functions
//! own the rules that must hold regardless of backend: the history document
//! is kept in the encrypted namespace, its SHA-256 checksum in the
//! non-sensitive namespace, and every forecast is preceded by validation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (CLI, Python bindings)               │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                             │
//! │  - Checksum bookkeeping                                  │
//! │  - Validation before forecasting                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  KeyValueRepository (repository/store.rs)                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                 │
//! ┌───▼──────────────┐     ┌──────────▼──────────────┐
//! │ File Repository  │     │ Local Repository        │
//! │ (JSON files)     │     │ (in-memory)             │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use cycle_engine::algorithms::PhaseEvidence;
//! use cycle_engine::db::{services, LocalRepository};
//! use cycle_engine::models::CycleRecord;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let repo = LocalRepository::new();
//! let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! services::store_history(&repo, "history", &[CycleRecord::period(start)]).await.unwrap();
//!
//! let target = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
//! let report = services::forecast(&repo, "history", target, &PhaseEvidence::new())
//!     .await
//!     .unwrap();
//! assert_eq!(report.cycle_day, Some(3));
//! # });
//! ```

use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use super::checksum::{calculate_checksum, checksum_key, verify_checksum};
use super::repository::{KeyValueRepository, Namespace, RepositoryError, RepositoryResult};
use crate::algorithms::{forecast_cycle, CycleForecast, PhaseEvidence};
use crate::models::CycleRecord;
use crate::parsing::{history_to_json, parse_history_json_str};
use crate::preprocessing::validate_history;

type HistoryLock = Arc<tokio::sync::Mutex<()>>;

/// Per-key write locks shared by every history writer in the process.
static HISTORY_LOCKS: OnceLock<Mutex<HashMap<String, HistoryLock>>> = OnceLock::new();

fn history_lock(key: &str) -> RepositoryResult<HistoryLock> {
    let mut locks = HISTORY_LOCKS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .map_err(|e| RepositoryError::InternalError(format!("History lock poisoned: {}", e)))?;
    Ok(Arc::clone(locks.entry(key.to_string()).or_default()))
}

fn check_key(key: &str) -> RepositoryResult<()> {
    if key.trim().is_empty() {
        return Err(RepositoryError::ValidationError(
            "History key must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Check if the repository is reachable.
pub async fn health_check<R: KeyValueRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Store a full history under `key`, replacing any previous one.
///
/// Writes to the same key are serialized with [`append_record`].
///
/// # Returns
/// * `Ok(String)` - checksum of the stored document
pub async fn store_history<R: KeyValueRepository + ?Sized>(
    repo: &R,
    key: &str,
    records: &[CycleRecord],
) -> RepositoryResult<String> {
    check_key(key)?;
    let lock = history_lock(key)?;
    let _guard = lock.lock().await;
    write_history(repo, key, records).await
}

async fn write_history<R: KeyValueRepository + ?Sized>(
    repo: &R,
    key: &str,
    records: &[CycleRecord],
) -> RepositoryResult<String> {
    let document = history_to_json(records)?;
    let checksum = calculate_checksum(&document);

    repo.set(Namespace::Encrypted, key, &document).await?;
    repo.set(Namespace::NonSensitive, &checksum_key(key), &checksum)
        .await?;

    info!(
        "Service layer: stored {} records under '{}' (checksum {})",
        records.len(),
        key,
        &checksum[..12]
    );
    Ok(checksum)
}

/// Load the history stored under `key`.
///
/// A missing key yields an empty history. A checksum mismatch is logged
/// but does not fail the load.
pub async fn load_history<R: KeyValueRepository + ?Sized>(
    repo: &R,
    key: &str,
) -> RepositoryResult<Vec<CycleRecord>> {
    let Some(document) = repo.get(Namespace::Encrypted, key).await? else {
        debug!("Service layer: no history under '{}'", key);
        return Ok(Vec::new());
    };

    match repo.get(Namespace::NonSensitive, &checksum_key(key)).await? {
        Some(expected) if !verify_checksum(&document, &expected) => {
            warn!(
                "Service layer: checksum mismatch for '{}', stored history may have been modified",
                key
            );
        }
        Some(_) => {}
        None => warn!("Service layer: no checksum stored for '{}'", key),
    }

    let records = parse_history_json_str(&document).map_err(|e| {
        RepositoryError::ValidationError(format!("Stored history '{}' is unreadable: {:#}", key, e))
    })?;
    debug!("Service layer: loaded {} records from '{}'", records.len(), key);
    Ok(records)
}

/// Append one record to the history under `key`.
///
/// The read-modify-write holds the key's write lock, so concurrent appends
/// within one process never drop records.
///
/// # Returns
/// * `Ok(usize)` - number of records after the append
pub async fn append_record<R: KeyValueRepository + ?Sized>(
    repo: &R,
    key: &str,
    record: CycleRecord,
) -> RepositoryResult<usize> {
    check_key(key)?;
    let lock = history_lock(key)?;
    let _guard = lock.lock().await;

    let mut records = load_history(repo, key).await?;
    records.push(record);
    write_history(repo, key, &records).await?;
    Ok(records.len())
}

/// Load the history under `key`, validate it and forecast for `target`.
///
/// Validation findings are logged; they never block the forecast.
pub async fn forecast<R: KeyValueRepository + ?Sized>(
    repo: &R,
    key: &str,
    target: NaiveDate,
    evidence: &PhaseEvidence,
) -> RepositoryResult<CycleForecast> {
    let history = load_history(repo, key).await?;

    let validation = validate_history(&history);
    for warning in &validation.warnings {
        warn!("History '{}': {}", key, warning);
    }
    for error in &validation.errors {
        warn!("History '{}' (invalid): {}", key, error);
    }

    let report = forecast_cycle(&history, target, evidence);
    info!(
        "Service layer: forecast for {} from {} records: {} ({:.2})",
        target,
        history.len(),
        report.most_likely_phase,
        report.phases.probability(report.most_likely_phase)
    );
    Ok(report)
}
