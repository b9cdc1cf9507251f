//! Cycle-phase inference.
//!
//! This module turns a period history and optional same-day evidence into
//! a probability for each of the four cycle phases.
//!
//! # Components
//!
//! - [`base_curve`]: piecewise-linear raw scores per cycle day
//! - [`refinement`]: symptom, basal temperature and LH-test boosts
//! - [`normalization`]: raw scores to probabilities with confidence bands
//! - [`estimator`]: the [`predict_phase`] pipeline
//! - [`forecast`]: next-period estimate, regularity and the combined report
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use cycle_engine::algorithms::{forecast_cycle, PhaseEvidence};
//! use cycle_engine::models::CycleRecord;
//!
//! let history = vec![CycleRecord::period(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())];
//! let target = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let forecast = forecast_cycle(&history, target, &PhaseEvidence::new().with_lh_test(true));
//! println!("Most likely phase: {}", forecast.most_likely_phase);
//! ```

pub mod base_curve;
pub mod estimator;
pub mod forecast;
pub mod normalization;
pub mod refinement;

pub use base_curve::{base_probabilities, scores_for_day, PhaseScores};
pub use estimator::{estimate_phase, predict_phase, PhaseEstimate, PhaseEvidence};
pub use forecast::{
    forecast_cycle, next_period_date, regularity_score, CycleForecast, NEUTRAL_REGULARITY,
};
pub use normalization::normalize;
pub use refinement::{refine_with_basal_temp, refine_with_lh_test, refine_with_symptoms};
