//! Menstrual cycle phase inference.
//!
//! Given a history of period records, a target date and optional same-day
//! evidence (symptoms, basal temperature, LH test), the engine produces a
//! probability for each of the four cycle phases together with a confidence
//! label and interval.
//!
//! - [`algorithms`]: the pure inference pipeline ([`algorithms::predict_phase`])
//! - [`models`]: history records and phase distributions
//! - [`time`]: cycle-day arithmetic
//! - [`parsing`]: JSON history documents
//! - [`preprocessing`]: advisory history validation
//! - [`db`]: key-value storage seam and service layer

pub mod algorithms;
pub mod db;
pub mod models;
pub mod parsing;
pub mod preprocessing;
pub mod time;

#[cfg(feature = "python")]
pub mod python;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Cycle phase engine exposed to Python.
#[cfg(feature = "python")]
#[pymodule]
fn cycle_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    python::register_functions(m)
}
